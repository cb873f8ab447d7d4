//! Command-line surface: parsed invocations handed to the queue engine.

pub mod args;

pub use args::{Cli, Commands, CreateArgs, Delimiter, InfoArgs, RecvArgs, SendArgs, UnlinkArgs};
