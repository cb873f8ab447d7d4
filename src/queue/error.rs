//! Error taxonomy for the queue-operations engine.
//!
//! Every error carries the system-level operation that failed so that the
//! message printed to stderr has the stable `<operation> error: <reason>`
//! form regardless of where the failure was detected.

use nix::errno::Errno;
use std::fmt;
use thiserror::Error;

/// The failing system-level operation, used to prefix error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Open,
    GetAttr,
    Send,
    Receive,
    Close,
    Unlink,
    Wait,
    Read,
    Write,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Open => "mq_open",
            Op::GetAttr => "mq_getattr",
            Op::Send => "mq_send",
            Op::Receive => "mq_receive",
            Op::Close => "mq_close",
            Op::Unlink => "mq_unlink",
            Op::Wait => "poll",
            Op::Read => "read",
            Op::Write => "write",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the queue engine. No operation retries on error;
/// every failure is reported verbatim to the caller.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The named queue does not exist.
    #[error("{0} error: {1}")]
    NotFound(Op, Errno),

    /// Exclusive creation hit a queue that already exists.
    #[error("{0} error: {1}")]
    AlreadyExists(Op, Errno),

    /// Bad size, count, priority, or an oversize payload.
    #[error("{0} error: {1}")]
    InvalidArgument(Op, Errno),

    /// Non-blocking send against a full queue or receive against an empty
    /// one. Retry policy is the operator's decision, not ours.
    #[error("{0} error: {1}")]
    WouldBlock(Op, Errno),

    /// Any other syscall failure (close, poll, interrupted wait, ...).
    #[error("{0} error: {1}")]
    Resource(Op, Errno),

    /// Standard stream failure. Fatal: a torn, undelimited message on
    /// stdout would corrupt downstream framing.
    #[error("{0} error: {1}")]
    Io(Op, #[source] std::io::Error),

    /// The readiness wait reported something other than plain
    /// read-readiness.
    #[error("{0} error: unexpected readiness state {1}")]
    Unsupported(Op, String),

    /// Queue names must be non-empty.
    #[error("invalid queue name: name must not be empty")]
    InvalidName,

    /// Creation parameters out of range, rejected before the syscall.
    #[error("mq_open error: maxmsg and msgsize must be positive (got maxmsg={maxmsg}, msgsize={msgsize})")]
    InvalidCapacity { maxmsg: i64, msgsize: i64 },
}

impl QueueError {
    /// Map an errno from a failed queue syscall into the taxonomy.
    pub fn from_errno(op: Op, errno: Errno) -> Self {
        match errno {
            Errno::ENOENT => QueueError::NotFound(op, errno),
            Errno::EEXIST => QueueError::AlreadyExists(op, errno),
            Errno::EINVAL | Errno::EMSGSIZE | Errno::ENAMETOOLONG => {
                QueueError::InvalidArgument(op, errno)
            }
            Errno::EAGAIN => QueueError::WouldBlock(op, errno),
            _ => QueueError::Resource(op, errno),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_classification() {
        assert!(matches!(
            QueueError::from_errno(Op::Open, Errno::ENOENT),
            QueueError::NotFound(Op::Open, Errno::ENOENT)
        ));
        assert!(matches!(
            QueueError::from_errno(Op::Open, Errno::EEXIST),
            QueueError::AlreadyExists(..)
        ));
        assert!(matches!(
            QueueError::from_errno(Op::Send, Errno::EMSGSIZE),
            QueueError::InvalidArgument(..)
        ));
        assert!(matches!(
            QueueError::from_errno(Op::Receive, Errno::EAGAIN),
            QueueError::WouldBlock(..)
        ));
        assert!(matches!(
            QueueError::from_errno(Op::Wait, Errno::EINTR),
            QueueError::Resource(..)
        ));
    }

    #[test]
    fn test_error_message_format() {
        let err = QueueError::from_errno(Op::Open, Errno::ENOENT);
        let message = err.to_string();
        assert!(message.starts_with("mq_open error: "));

        let err = QueueError::from_errno(Op::Unlink, Errno::ENOENT);
        assert!(err.to_string().starts_with("mq_unlink error: "));
    }
}
