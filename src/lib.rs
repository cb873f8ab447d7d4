//! `mq` — a command line tool to use POSIX message queues from the shell.
//!
//! The library surface exists so integration tests can drive the
//! queue-operations engine directly; the binary in `main.rs` is a thin
//! dispatcher over it.

pub mod cli;
pub mod logging;
pub mod queue;
