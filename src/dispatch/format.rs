//! Bounded, stack-allocated formatting buffer for `Logger::log_fmt`.
//!
//! Output beyond the capacity is cut at the last complete UTF-8 character and the
//! rest is discarded; formatting itself never fails.

use std::fmt;

/// Capacity of the formatting buffer in bytes.
pub const FORMAT_CAPACITY: usize = 256;

pub(crate) struct ScratchBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize> ScratchBuffer<N> {
    pub(crate) fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            truncated: false,
        }
    }

    /// Renders `args`, truncating on overflow.
    pub(crate) fn format(args: fmt::Arguments<'_>) -> Self {
        let mut scratch = Self::new();
        // write_str never reports an error; a failing Display impl only shortens output.
        let _ = fmt::write(&mut scratch, args);
        scratch
    }

    pub(crate) fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    pub(crate) fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<const N: usize> fmt::Write for ScratchBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let room = N - self.len;
        let take = if s.len() <= room {
            s.len()
        } else {
            self.truncated = true;
            (0..=room).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
        };
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_untouched() {
        let buf = ScratchBuffer::<32>::format(format_args!("rssi={} ch={}", -61, 6));
        assert_eq!(buf.as_str(), "rssi=-61 ch=6");
        assert!(!buf.is_truncated());
    }

    #[test]
    fn test_long_message_is_truncated_to_capacity() {
        let buf = ScratchBuffer::<8>::format(format_args!("{}", "abcdefghijkl"));
        assert_eq!(buf.as_str(), "abcdefgh");
        assert!(buf.is_truncated());
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // "é" is two bytes; only one byte of room is left after "abcd".
        let buf = ScratchBuffer::<5>::format(format_args!("abcd{}", "éz"));
        assert_eq!(buf.as_str(), "abcd");
        assert!(buf.is_truncated());
    }

    #[test]
    fn test_nothing_written_after_truncation() {
        let buf = ScratchBuffer::<4>::format(format_args!("{}{}", "abcdé", "x"));
        assert_eq!(buf.as_str(), "abcd");
    }
}
