//! Message framing between queue payloads and the standard streams.
//!
//! Outbound: a literal argument's bytes, or stdin read to end-of-stream.
//! Inbound: the payload written with a partial-write retry loop, followed
//! by at most one delimiter byte so downstream consumers can split
//! messages reliably.

use super::error::{Op, QueueError};
use std::io::{self, Read, Write};

/// Build the outbound payload. Payloads are exact-length byte sequences;
/// no trailing terminator is appended on send.
pub fn outbound_payload(message: Option<String>) -> Result<Vec<u8>, QueueError> {
    match message {
        Some(text) => Ok(text.into_bytes()),
        None => {
            let mut payload = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut payload)
                .map_err(|e| QueueError::Io(Op::Read, e))?;
            Ok(payload)
        }
    }
}

/// Write one received message to `out`, retrying until every byte is
/// flushed, then append the delimiter byte if one is configured. Any
/// failure is fatal to the invoking operation: a torn, undelimited message
/// would corrupt downstream framing.
pub fn write_message(
    out: &mut impl Write,
    payload: &[u8],
    delimiter: Option<u8>,
) -> Result<(), QueueError> {
    write_all_retrying(out, payload).map_err(|e| QueueError::Io(Op::Write, e))?;
    if let Some(byte) = delimiter {
        write_all_retrying(out, &[byte]).map_err(|e| QueueError::Io(Op::Write, e))?;
    }
    out.flush().map_err(|e| QueueError::Io(Op::Write, e))
}

// Partial writes are legal on pipes; keep writing the unwritten remainder.
fn write_all_retrying(out: &mut impl Write, payload: &[u8]) -> io::Result<()> {
    let mut remaining = payload;
    while !remaining.is_empty() {
        match out.write(remaining) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole message",
                ));
            }
            Ok(written) => remaining = &remaining[written..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that accepts at most one byte per call, forcing the retry
    /// loop to account for the remainder.
    struct TrickleWriter {
        written: Vec<u8>,
    }

    impl Write for TrickleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match buf.first() {
                Some(byte) => {
                    self.written.push(*byte);
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_partial_writes_are_retried() {
        let mut out = TrickleWriter { written: Vec::new() };
        write_message(&mut out, b"hello", Some(b'\n')).unwrap();
        assert_eq!(out.written, b"hello\n");
    }

    #[test]
    fn test_nul_delimiter() {
        let mut out = Vec::new();
        write_message(&mut out, b"msg", Some(0)).unwrap();
        assert_eq!(out, b"msg\0");
    }

    #[test]
    fn test_no_delimiter() {
        let mut out = Vec::new();
        write_message(&mut out, b"msg", None).unwrap();
        assert_eq!(out, b"msg");
    }

    #[test]
    fn test_empty_payload_still_delimited() {
        let mut out = Vec::new();
        write_message(&mut out, b"", Some(b'\n')).unwrap();
        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_write_zero_is_an_error() {
        let err = write_message(&mut BrokenWriter, b"msg", None).unwrap_err();
        assert!(matches!(err, QueueError::Io(Op::Write, _)));
    }

    #[test]
    fn test_write_to_file_backed_sink() {
        use std::io::{Seek, SeekFrom};

        let mut file = tempfile::tempfile().unwrap();
        write_message(&mut file, b"payload", Some(b'\n')).unwrap();

        file.seek(SeekFrom::Start(0)).unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"payload\n");
    }

    #[test]
    fn test_literal_argument_is_payload() {
        let payload = outbound_payload(Some("hello".to_string())).unwrap();
        assert_eq!(payload, b"hello");
    }
}
