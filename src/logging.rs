//! Diagnostic logging setup and helpers.
//!
//! Diagnostics go to stderr only; stdout is reserved for message payloads,
//! so verbose output can never interleave with the primary data stream.

use tracing::Level;

/// Initialize the tracing subscriber. `--verbose` raises the level to
/// DEBUG; `--timestamp` keeps the subscriber's timestamp field on each
/// diagnostic line.
pub fn init(verbose: bool, timestamp: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if timestamp {
        builder.init();
    } else {
        builder.without_time().init();
    }
}

/// Render a payload as space-separated hexadecimal bytes for verbose
/// diagnostics.
pub fn hex_dump(payload: &[u8]) -> String {
    payload
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
