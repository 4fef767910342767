//! Line accumulation for the telemetry stream.
//!
//! Bytes are collected until a `\n` or `\r` terminator. The buffer is
//! bounded: bytes arriving once it is full are dropped and only counted,
//! so an oversized record arrives truncated and then fails to decode.

use heapless::Vec;

/// Receive buffer size, including the slot the terminator would occupy
pub const LINE_CAPACITY: usize = 1024;

/// Largest payload kept for a single line
pub const MAX_LINE_LEN: usize = LINE_CAPACITY - 1;

/// Minimum accumulated length (terminator included) for a line to count
///
/// `{}` plus its terminator is the smallest record worth decoding; shorter
/// runs are stray line endings such as the `\n` of a `\r\n` pair.
pub const MIN_LINE_LEN: usize = 3;

/// Outcome of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineStatus {
    /// Byte stored (or dropped on overflow); line not complete yet
    Pending,
    /// Terminator seen but too little content; buffer discarded
    Noise,
    /// A complete line is available through [`LineBuffer::line`]
    Ready,
}

/// Bounded accumulator turning a byte stream into lines
#[derive(Debug, Clone)]
pub struct LineBuffer {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Bytes dropped from the current line because the buffer was full
    truncated: usize,
    ready: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            truncated: 0,
            ready: false,
        }
    }

    /// Discard any partial or completed line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.truncated = 0;
        self.ready = false;
    }

    /// Feed a single byte
    ///
    /// After [`LineStatus::Ready`] the line stays readable until the next
    /// call to `feed` or `reset`.
    pub fn feed(&mut self, byte: u8) -> LineStatus {
        if self.ready {
            self.reset();
        }

        if byte == b'\n' || byte == b'\r' {
            // The terminator counts towards the length when it still fits
            let accumulated = self.buffer.len() + usize::from(!self.buffer.is_full());
            if accumulated >= MIN_LINE_LEN {
                self.ready = true;
                return LineStatus::Ready;
            }
            self.reset();
            return LineStatus::Noise;
        }

        if self.buffer.push(byte).is_err() {
            self.truncated = self.truncated.saturating_add(1);
        }
        LineStatus::Pending
    }

    /// The completed line, without its terminator
    pub fn line(&self) -> Option<&[u8]> {
        if self.ready {
            Some(&self.buffer)
        } else {
            None
        }
    }

    /// Number of bytes dropped from the current line
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Number of bytes currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(buf: &mut LineBuffer, bytes: &[u8]) -> LineStatus {
        let mut status = LineStatus::Pending;
        for &b in bytes {
            status = buf.feed(b);
        }
        status
    }

    #[test]
    fn test_complete_line() {
        let mut buf = LineBuffer::new();
        assert_eq!(feed_all(&mut buf, b"{\"a\":1}\n"), LineStatus::Ready);
        assert_eq!(buf.line(), Some(&b"{\"a\":1}"[..]));
    }

    #[test]
    fn test_empty_record_is_decodable_length() {
        let mut buf = LineBuffer::new();
        assert_eq!(feed_all(&mut buf, b"{}\r"), LineStatus::Ready);
        assert_eq!(buf.line(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_short_line_is_noise() {
        let mut buf = LineBuffer::new();
        assert_eq!(feed_all(&mut buf, b"x\n"), LineStatus::Noise);
        assert!(buf.line().is_none());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_crlf_yields_one_line() {
        let mut buf = LineBuffer::new();
        assert_eq!(feed_all(&mut buf, b"{}"), LineStatus::Pending);
        assert_eq!(buf.feed(b'\r'), LineStatus::Ready);
        assert_eq!(buf.feed(b'\n'), LineStatus::Noise);
        assert!(buf.line().is_none());
    }

    #[test]
    fn test_next_feed_clears_ready_line() {
        let mut buf = LineBuffer::new();
        feed_all(&mut buf, b"abc\n");
        assert_eq!(buf.feed(b'd'), LineStatus::Pending);
        assert!(buf.line().is_none());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_overflow_truncates_silently() {
        let mut buf = LineBuffer::new();
        for _ in 0..(LINE_CAPACITY + 10) {
            assert_eq!(buf.feed(b'x'), LineStatus::Pending);
        }
        assert_eq!(buf.len(), MAX_LINE_LEN);
        assert_eq!(buf.truncated(), 11);

        assert_eq!(buf.feed(b'\n'), LineStatus::Ready);
        assert_eq!(buf.line().map(|l| l.len()), Some(MAX_LINE_LEN));
    }

    #[test]
    fn test_reset_discards_partial_line() {
        let mut buf = LineBuffer::new();
        feed_all(&mut buf, b"{\"cpu\":");
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(feed_all(&mut buf, b"{}\n"), LineStatus::Ready);
        assert_eq!(buf.line(), Some(&b"{}"[..]));
    }

    proptest! {
        #[test]
        fn prop_lines_never_exceed_capacity(bytes in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let mut buf = LineBuffer::new();
            for b in bytes {
                if buf.feed(b) == LineStatus::Ready {
                    let line = buf.line().unwrap();
                    prop_assert!(line.len() <= MAX_LINE_LEN);
                    prop_assert!(!line.contains(&b'\n') && !line.contains(&b'\r'));
                    prop_assert!(line.len() + 1 >= MIN_LINE_LEN);
                }
            }
        }
    }
}
