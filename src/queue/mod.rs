//! Queue-operations engine over POSIX message queues.
//!
//! This module provides:
//! - Handle management with explicit access and blocking modes
//! - Message framing between queue payloads and the standard streams
//! - One-shot executors for the five commands
//! - A continuous-receive loop for `recv --follow`

pub mod codec;
pub mod error;
pub mod executor;
pub mod follow;
pub mod handle;

pub use error::{Op, QueueError};
pub use handle::{MessageQueue, QueueAttributes, QueueName};
