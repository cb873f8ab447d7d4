//! Queue handle management over the `mq_*(3)` syscall surface.
//!
//! A [`MessageQueue`] is a process-local capability bound to one open queue
//! with the access mode and blocking mode it was opened with. The kernel
//! namespace is shared system-wide, so nothing here caches queue state:
//! every query goes back to the kernel.

use super::error::{Op, QueueError};
use nix::mqueue::{
    mq_close, mq_getattr, mq_open, mq_receive, mq_send, mq_unlink, MQ_OFlag, MqAttr, MqdT,
};
use nix::poll::{poll, PollFd, PollFlags};
use nix::sys::stat::Mode;
use std::fmt;
use std::os::fd::{AsRawFd, BorrowedFd};
use tracing::{debug, warn};

/// Name of a queue in the kernel namespace. Always carries the leading
/// slash required by `mq_open(3)`; a missing one is prepended at parse
/// time. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueName(String);

impl QueueName {
    pub fn parse(raw: &str) -> Result<Self, QueueError> {
        if raw.is_empty() {
            return Err(QueueError::InvalidName);
        }
        if raw.starts_with('/') {
            Ok(Self(raw.to_string()))
        } else {
            Ok(Self(format!("/{raw}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Queue attributes as reported by `mq_getattr(3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueAttributes {
    pub max_messages: i64,
    pub max_message_size: i64,
    pub current_messages: i64,
}

/// An open queue descriptor. Explicit [`close`](MessageQueue::close)
/// consumes the handle on success paths; `Drop` releases the descriptor on
/// every other exit path, so the kernel-side reference never leaks.
#[derive(Debug)]
pub struct MessageQueue {
    name: QueueName,
    mqd: Option<MqdT>,
}

impl MessageQueue {
    /// Create a new queue with exclusive-creation semantics. Fails with
    /// `AlreadyExists` if the name is taken and `InvalidArgument` if the
    /// capacity is non-positive or beyond system limits.
    pub fn create(name: QueueName, maxmsg: i64, msgsize: i64) -> Result<Self, QueueError> {
        if maxmsg <= 0 || msgsize <= 0 {
            return Err(QueueError::InvalidCapacity { maxmsg, msgsize });
        }
        let attr = MqAttr::new(0, maxmsg, msgsize, 0);
        let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
        debug!("opening mq {} (O_CREAT, O_RDWR, O_EXCL, 0644)", name);
        let mqd = mq_open(
            name.as_str(),
            MQ_OFlag::O_CREAT | MQ_OFlag::O_RDWR | MQ_OFlag::O_EXCL,
            mode,
            Some(&attr),
        )
        .map_err(|e| QueueError::from_errno(Op::Open, e))?;
        Ok(Self {
            name,
            mqd: Some(mqd),
        })
    }

    /// Open an existing queue read-only. Fails with `NotFound` if the
    /// queue does not exist.
    pub fn open_read(name: QueueName, non_blocking: bool) -> Result<Self, QueueError> {
        Self::open(name, MQ_OFlag::O_RDONLY, non_blocking)
    }

    /// Open an existing queue write-only. Fails with `NotFound` if the
    /// queue does not exist.
    pub fn open_write(name: QueueName, non_blocking: bool) -> Result<Self, QueueError> {
        Self::open(name, MQ_OFlag::O_WRONLY, non_blocking)
    }

    fn open(name: QueueName, access: MQ_OFlag, non_blocking: bool) -> Result<Self, QueueError> {
        let mut oflag = access;
        if non_blocking {
            oflag |= MQ_OFlag::O_NONBLOCK;
        }
        debug!("opening mq {} ({:?})", name, oflag);
        let mqd = mq_open(name.as_str(), oflag, Mode::empty(), None)
            .map_err(|e| QueueError::from_errno(Op::Open, e))?;
        Ok(Self {
            name,
            mqd: Some(mqd),
        })
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    fn mqd(&self) -> &MqdT {
        // Vacated only by close() and Drop, both of which consume the handle.
        match &self.mqd {
            Some(mqd) => mqd,
            None => unreachable!("message queue descriptor already released"),
        }
    }

    /// Query the queue's attributes. Available on any open handle
    /// regardless of access mode.
    pub fn attributes(&self) -> Result<QueueAttributes, QueueError> {
        let attr = mq_getattr(self.mqd()).map_err(|e| QueueError::from_errno(Op::GetAttr, e))?;
        Ok(QueueAttributes {
            max_messages: attr.maxmsg() as i64,
            max_message_size: attr.msgsize() as i64,
            current_messages: attr.curmsgs() as i64,
        })
    }

    /// Send one message. `EAGAIN` (non-blocking, full queue) surfaces as
    /// `WouldBlock`, an oversize payload as `InvalidArgument`.
    pub fn send(&self, payload: &[u8], priority: u32) -> Result<(), QueueError> {
        mq_send(self.mqd(), payload, priority).map_err(|e| QueueError::from_errno(Op::Send, e))
    }

    /// Receive one message into `buf`, which must be at least the queue's
    /// maximum message size. Returns the payload length and its priority.
    pub fn receive(&self, buf: &mut [u8]) -> Result<(usize, u32), QueueError> {
        let mut priority = 0u32;
        let len = mq_receive(self.mqd(), buf, &mut priority)
            .map_err(|e| QueueError::from_errno(Op::Receive, e))?;
        Ok((len, priority))
    }

    /// Block until the queue reports read-readiness (poll with no
    /// timeout). Only a plain `POLLIN` result is accepted; any other
    /// reported condition is a protocol violation and fatal to the caller.
    pub fn wait_readable(&self) -> Result<(), QueueError> {
        // The descriptor is owned by self and stays open for the borrow.
        let fd = unsafe { BorrowedFd::borrow_raw(self.mqd().as_raw_fd()) };
        let mut fds = [PollFd::new(&fd, PollFlags::POLLIN)];
        poll(&mut fds, -1).map_err(|e| QueueError::from_errno(Op::Wait, e))?;
        match fds[0].revents() {
            Some(revents) if revents == PollFlags::POLLIN => Ok(()),
            Some(revents) => Err(QueueError::Unsupported(Op::Wait, format!("{revents:?}"))),
            None => Err(QueueError::Unsupported(Op::Wait, "none".to_string())),
        }
    }

    /// Release the kernel-side reference, reporting any failure.
    pub fn close(mut self) -> Result<(), QueueError> {
        match self.mqd.take() {
            Some(mqd) => mq_close(mqd).map_err(|e| QueueError::from_errno(Op::Close, e)),
            None => Ok(()),
        }
    }

    /// Remove the named queue from the kernel namespace. Does not require
    /// a prior open; fails with `NotFound` if the queue is absent.
    pub fn unlink(name: &QueueName) -> Result<(), QueueError> {
        debug!("deleting mq {}", name);
        mq_unlink(name.as_str()).map_err(|e| QueueError::from_errno(Op::Unlink, e))
    }
}

impl Drop for MessageQueue {
    fn drop(&mut self) {
        if let Some(mqd) = self.mqd.take() {
            if let Err(e) = mq_close(mqd) {
                warn!("failed to close mq {}: {}", self.name, e);
            }
        }
    }
}
