//! Character-at-a-time UTF-8 input.
//!
//! The `i` command consumes exactly one character, so the reader pulls bytes
//! one at a time and never reads ahead of the character it returns.

use std::io::{self, ErrorKind, Read};

/// Decodes UTF-8 characters from a byte stream, one at a time.
///
/// ```
/// use merry_interpreter::input::CharReader;
///
/// let mut reader = CharReader::new("a↊".as_bytes());
/// assert_eq!(reader.read_char().unwrap(), Some('a'));
/// assert_eq!(reader.read_char().unwrap(), Some('↊'));
/// assert_eq!(reader.read_char().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct CharReader<R> {
    inner: R,
}

impl<R: Read> CharReader<R> {
    /// Wraps a byte reader.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads the next character, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidData`] error for malformed UTF-8 and
    /// propagates errors from the underlying reader.
    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(lead);
        if width == 0 {
            return Err(invalid_utf8());
        }

        let mut buf = [lead, 0, 0, 0];
        if let Err(err) = self.inner.read_exact(&mut buf[1..width]) {
            return Err(match err.kind() {
                ErrorKind::UnexpectedEof => invalid_utf8(),
                _ => err,
            });
        }

        std::str::from_utf8(&buf[..width])
            .map_err(|_| invalid_utf8())
            .map(|s| s.chars().next())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }

    /// Unwraps the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Encoded length implied by a UTF-8 lead byte, or 0 if it cannot lead.
const fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(bytes: &[u8]) -> io::Result<Vec<char>> {
        let mut reader = CharReader::new(bytes);
        let mut chars = Vec::new();
        while let Some(c) = reader.read_char()? {
            chars.push(c);
        }
        Ok(chars)
    }

    #[test]
    fn test_ascii_and_multibyte() {
        assert_eq!(read_all("hé↊😀".as_bytes()).unwrap(), vec!['h', 'é', '↊', '😀']);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(read_all(b"").unwrap(), Vec::<char>::new());
    }

    #[test]
    fn test_does_not_read_ahead() {
        let mut reader = CharReader::new(&b"ab"[..]);
        assert_eq!(reader.read_char().unwrap(), Some('a'));
        assert_eq!(reader.into_inner(), b"b");
    }

    #[test]
    fn test_invalid_lead_byte() {
        let err = read_all(&[0xFF]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_sequence() {
        let err = read_all(&[0xE2, 0x86]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_bad_continuation() {
        let err = read_all(&[0xC3, 0x41]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_utf8_width() {
        assert_eq!(utf8_width(b'a'), 1);
        assert_eq!(utf8_width(0xC3), 2);
        assert_eq!(utf8_width(0xE2), 3);
        assert_eq!(utf8_width(0xF0), 4);
        assert_eq!(utf8_width(0x80), 0);
        assert_eq!(utf8_width(0xC0), 0);
    }
}
