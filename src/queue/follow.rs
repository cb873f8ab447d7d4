//! Continuous-receive loop: print every message as it arrives until the
//! queue becomes unusable or the process is interrupted.
//!
//! The loop alternates between a blocking readiness wait and exactly one
//! receive per wakeup. Wrapping the receive in a poll keeps the structure
//! uniform with the one-shot path and leaves room for timeout or
//! cancellation support without touching the receive call itself.

use super::codec;
use super::error::QueueError;
use super::handle::MessageQueue;
use crate::logging::hex_dump;
use std::io::Write;
use tracing::debug;

enum State {
    /// Blocked on the readiness wait.
    Waiting,
    /// The queue reported data; receive and print exactly one message.
    Draining,
    /// The loop is over; carries the terminating error.
    Terminated(QueueError),
}

/// Run the follow loop on an open read handle. Termination is always an
/// error by design: there is no stop command, so the loop ends only when
/// the queue is unlinked out from under it, the process is interrupted,
/// or an I/O failure occurs.
pub fn run(queue: &MessageQueue, delimiter: Option<u8>, out: &mut impl Write) -> QueueError {
    let attrs = match queue.attributes() {
        Ok(attrs) => attrs,
        Err(err) => return err,
    };
    let mut buf = vec![0u8; attrs.max_message_size as usize];
    let mut state = State::Waiting;
    loop {
        state = match state {
            State::Waiting => match queue.wait_readable() {
                Ok(()) => State::Draining,
                Err(err) => State::Terminated(err),
            },
            State::Draining => match queue.receive(&mut buf) {
                Ok((len, priority)) => {
                    debug!(
                        "received {} bytes from mq {} (prio {}): {}",
                        len,
                        queue.name(),
                        priority,
                        hex_dump(&buf[..len])
                    );
                    match codec::write_message(out, &buf[..len], delimiter) {
                        Ok(()) => State::Waiting,
                        Err(err) => State::Terminated(err),
                    }
                }
                Err(err) => State::Terminated(err),
            },
            State::Terminated(err) => return err,
        };
    }
}
