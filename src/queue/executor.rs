//! One-shot executors for the five queue commands.
//!
//! Each executor acquires a handle, performs its operation, and releases
//! the handle on every exit path: explicitly via `close` on success, via
//! `Drop` on error.

use super::codec;
use super::error::{Op, QueueError};
use super::follow;
use super::handle::{MessageQueue, QueueName};
use crate::logging::hex_dump;
use std::io::Write;
use tracing::debug;

/// Create a queue with the given capacity. The queue must not already
/// exist.
pub fn create(qname: &str, maxmsg: i64, msgsize: i64) -> Result<(), QueueError> {
    let name = QueueName::parse(qname)?;
    let queue = MessageQueue::create(name, maxmsg, msgsize)?;
    queue.close()
}

/// Print the attributes of an existing queue in the stable
/// `NAME: maxmsg=M, msgsize=S, curmsgs=C` form.
pub fn info(qname: &str, out: &mut impl Write) -> Result<(), QueueError> {
    let name = QueueName::parse(qname)?;
    let queue = MessageQueue::open_read(name, false)?;
    let attrs = queue.attributes()?;
    writeln!(
        out,
        "{}: maxmsg={}, msgsize={}, curmsgs={}",
        queue.name(),
        attrs.max_messages,
        attrs.max_message_size,
        attrs.current_messages
    )
    .map_err(|e| QueueError::Io(Op::Write, e))?;
    queue.close()
}

/// Remove a queue from the kernel namespace.
pub fn unlink(qname: &str) -> Result<(), QueueError> {
    let name = QueueName::parse(qname)?;
    MessageQueue::unlink(&name)
}

/// Send one message, taken from the argument or read from stdin until
/// end-of-stream. An oversize payload is rejected by the kernel on send;
/// there is no pre-validation round trip.
pub fn send(
    qname: &str,
    message: Option<String>,
    priority: u32,
    non_blocking: bool,
) -> Result<(), QueueError> {
    let name = QueueName::parse(qname)?;
    let queue = MessageQueue::open_write(name, non_blocking)?;
    let payload = codec::outbound_payload(message)?;
    debug!(
        "sending to mq {} (prio {}): {}",
        queue.name(),
        priority,
        hex_dump(&payload)
    );
    queue.send(&payload, priority)?;
    queue.close()
}

/// Receive one message and print it, or follow the queue indefinitely.
/// The receive buffer is sized from the queue's own attributes.
pub fn recv(
    qname: &str,
    non_blocking: bool,
    follow_queue: bool,
    delimiter: Option<u8>,
    out: &mut impl Write,
) -> Result<(), QueueError> {
    let name = QueueName::parse(qname)?;
    let queue = MessageQueue::open_read(name, non_blocking)?;
    if follow_queue {
        // Only terminates on error; the handle is released on the way out.
        return Err(follow::run(&queue, delimiter, out));
    }
    let attrs = queue.attributes()?;
    let mut buf = vec![0u8; attrs.max_message_size as usize];
    let (len, priority) = queue.receive(&mut buf)?;
    debug!(
        "received {} bytes from mq {} (prio {}): {}",
        len,
        queue.name(),
        priority,
        hex_dump(&buf[..len])
    );
    codec::write_message(out, &buf[..len], delimiter)?;
    queue.close()
}
