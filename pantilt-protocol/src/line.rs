//! Line reassembly for byte-stream channels
//!
//! Both channels deliver bytes, not lines; [`LineReader`] accumulates
//! bytes until a newline and hands back complete lines. Carriage returns
//! are ignored so CRLF and bare-LF terminals both work. A line longer
//! than [`MAX_LINE_LEN`] is discarded and the reader resynchronizes at
//! the next newline.

use heapless::String;

/// Longest accepted input or status line, in bytes
pub const MAX_LINE_LEN: usize = 64;

/// One complete line of channel text
pub type Line = String<MAX_LINE_LEN>;

/// Incremental newline-terminated line parser
#[derive(Debug, Clone, Default)]
pub struct LineReader {
    buf: Line,
    overflowed: bool,
}

impl LineReader {
    /// Create an empty reader
    pub const fn new() -> Self {
        Self {
            buf: String::new(),
            overflowed: false,
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Some(line)` when the byte completes a non-empty line.
    /// Empty lines (and lines that overflowed the buffer) produce `None`.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\n' => {
                let overflowed = self.overflowed;
                self.overflowed = false;
                let line = core::mem::take(&mut self.buf);
                if overflowed || line.is_empty() {
                    None
                } else {
                    Some(line)
                }
            }
            b'\r' => None,
            _ => {
                if self.buf.push(char::from(byte)).is_err() {
                    self.overflowed = true;
                }
                None
            }
        }
    }

    /// Drop any partially accumulated line
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;

    fn feed_all(reader: &mut LineReader, bytes: &[u8]) -> std::vec::Vec<Line> {
        bytes.iter().filter_map(|&b| reader.feed(b)).collect()
    }

    #[test]
    fn test_lf_terminated_line() {
        let mut reader = LineReader::new();
        let lines = feed_all(&mut reader, b"AUTOPAN\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "AUTOPAN");
    }

    #[test]
    fn test_crlf_terminated_line() {
        let mut reader = LineReader::new();
        let lines = feed_all(&mut reader, b"LEFT\r\nRIGHT\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_str(), "LEFT");
        assert_eq!(lines[1].as_str(), "RIGHT");
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let mut reader = LineReader::new();
        let lines = feed_all(&mut reader, b"\n\r\n\nP90\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "P90");
    }

    #[test]
    fn test_split_across_reads() {
        let mut reader = LineReader::new();
        assert!(feed_all(&mut reader, b"CAL_").is_empty());
        let lines = feed_all(&mut reader, b"DZ:60\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "CAL_DZ:60");
    }

    #[test]
    fn test_oversize_line_discarded_with_resync() {
        let mut reader = LineReader::new();
        let mut noise = std::vec::Vec::new();
        noise.extend_from_slice(&[b'x'; MAX_LINE_LEN + 10]);
        noise.push(b'\n');
        noise.extend_from_slice(b"INFO\n");

        let lines = feed_all(&mut reader, &noise);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "INFO");
    }

    #[test]
    fn test_reset_drops_partial_line() {
        let mut reader = LineReader::new();
        feed_all(&mut reader, b"LEF");
        reader.reset();
        let lines = feed_all(&mut reader, b"T\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "T");
    }

    proptest! {
        #[test]
        fn prop_reassembles_any_printable_line(text in "[ -~]{1,63}") {
            let mut reader = LineReader::new();
            let mut lines = std::vec::Vec::new();
            for b in text.bytes() {
                prop_assert!(reader.feed(b).is_none());
            }
            if let Some(line) = reader.feed(b'\n') {
                lines.push(line);
            }
            prop_assert_eq!(lines.len(), 1);
            prop_assert_eq!(lines[0].as_str(), text.as_str());
        }
    }
}
