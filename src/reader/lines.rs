//! Line scanning inside one byte range.

use std::io::{self, BufRead, Read};

/// Why a [`LineScanner`] stopped early.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A line exceeded the configured maximum length.
    #[error("line longer than {max} bytes")]
    LineTooLong {
        /// The configured limit.
        max: usize,
    },
}

/// Splits a byte stream into trimmed, non-empty keys.
///
/// Lines end at `\n`; a final line without a terminator still counts. Each line
/// is trimmed with [`trim_key`] and skipped if nothing remains.
///
/// ```
/// use ipcount::reader::lines::LineScanner;
///
/// let mut scanner = LineScanner::new(&b" 1.1.1.1 \r\n\n2.2.2.2"[..], 1024);
/// assert_eq!(scanner.next_key().unwrap().as_deref(), Some(&b"1.1.1.1"[..]));
/// assert_eq!(scanner.next_key().unwrap().as_deref(), Some(&b"2.2.2.2"[..]));
/// assert_eq!(scanner.next_key().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    max_line_len: usize,
    consumed: u64,
}

impl<R: BufRead> LineScanner<R> {
    /// Scan `reader`, rejecting lines longer than `max_line_len` bytes.
    pub fn new(reader: R, max_line_len: usize) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            max_line_len,
            consumed: 0,
        }
    }

    /// Bytes consumed from the reader so far.
    #[must_use]
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Next non-empty trimmed key, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// [`ScanError::Io`] on a read failure, [`ScanError::LineTooLong`] if a
    /// line exceeds the limit. The scanner should not be used afterwards.
    pub fn next_key(&mut self) -> Result<Option<Box<[u8]>>, ScanError> {
        loop {
            self.buf.clear();
            let limit = (self.max_line_len as u64).saturating_add(1);
            let read = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut self.buf)?;
            if read == 0 {
                return Ok(None);
            }
            self.consumed += read as u64;

            let line = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf[..]);
            if line.len() > self.max_line_len {
                return Err(ScanError::LineTooLong {
                    max: self.max_line_len,
                });
            }

            let key = trim_key(line);
            if !key.is_empty() {
                return Ok(Some(Box::from(key)));
            }
        }
    }
}

/// Strip surrounding whitespace from a raw line.
///
/// Unicode whitespace for valid UTF-8, ASCII whitespace otherwise.
///
/// ```
/// use ipcount::reader::lines::trim_key;
///
/// assert_eq!(trim_key(b"\t10.0.0.1\r"), b"10.0.0.1");
/// assert_eq!(trim_key("\u{a0}x\u{2003}".as_bytes()), b"x");
/// assert_eq!(trim_key(b" \xff\xfe "), b"\xff\xfe");
/// ```
#[must_use]
pub fn trim_key(line: &[u8]) -> &[u8] {
    match std::str::from_utf8(line) {
        Ok(text) => text.trim().as_bytes(),
        Err(_) => line.trim_ascii(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8], max: usize) -> Result<Vec<Vec<u8>>, ScanError> {
        let mut scanner = LineScanner::new(input, max);
        let mut keys = Vec::new();
        while let Some(key) = scanner.next_key()? {
            keys.push(key.into_vec());
        }
        Ok(keys)
    }

    #[test]
    fn test_basic_lines() {
        let keys = collect(b"1.1.1.1\n2.2.2.2\n1.1.1.1\n3.3.3.3\n", 64).unwrap();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[3], b"3.3.3.3");
    }

    #[test]
    fn test_skips_blank_and_whitespace_lines() {
        let keys = collect(b"\n   \n\t\r\n1.1.1.1\n\n", 64).unwrap();
        assert_eq!(keys, vec![b"1.1.1.1".to_vec()]);
    }

    #[test]
    fn test_unterminated_last_line() {
        let keys = collect(b"a\nb", 64).unwrap();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_crlf() {
        let keys = collect(b"a\r\nb\r\n", 64).unwrap();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"", 64).unwrap().is_empty());
    }

    #[test]
    fn test_line_at_limit_is_accepted() {
        let keys = collect(b"abcd\nabcd", 4).unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_line_over_limit_is_rejected() {
        let mut scanner = LineScanner::new(&b"ok\ntoolong\nafter\n"[..], 4);
        assert_eq!(scanner.next_key().unwrap().as_deref(), Some(&b"ok"[..]));
        assert!(matches!(
            scanner.next_key(),
            Err(ScanError::LineTooLong { max: 4 })
        ));
    }

    #[test]
    fn test_unterminated_line_over_limit() {
        assert!(matches!(
            collect(b"abcde", 4),
            Err(ScanError::LineTooLong { max: 4 })
        ));
    }

    #[test]
    fn test_consumed_counts_raw_bytes() {
        let mut scanner = LineScanner::new(&b" a \n\nb\n"[..], 64);
        while scanner.next_key().unwrap().is_some() {}
        assert_eq!(scanner.consumed(), 7);
    }

    #[test]
    fn test_unbounded_line_length() {
        let keys = collect(b"1.1.1.1\n2.2.2.2", usize::MAX).unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_a_key() {
        let keys = collect(b"\xff\xfe\n", 64).unwrap();
        assert_eq!(keys, vec![vec![0xff, 0xfe]]);
    }
}
