//! Delimiter-terminated token ("word") scanning.
//!
//! Identifiers and strings in the grid header carry no length prefix. A token
//! is a run of bytes that are neither zero nor in the control range `1..=20`;
//! any such byte ends the token.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::cursor::ByteCursor;
use crate::error::{ParseError, Result};

/// Default number of bytes a single scan may consume.
pub const DEFAULT_MAX_TOKEN_ATTEMPTS: usize = 256;

/// Returns true if `byte` ends a token.
pub fn is_delimiter(byte: u8) -> bool {
    byte <= 20
}

/// A non-empty run of non-delimiter bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(Vec<u8>);

impl Token {
    /// Returns the raw bytes of the token.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes the token as UTF-8, replacing invalid sequences.
    pub fn decode(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Returns the token length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; tokens are never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the token bytes equal `s`.
    pub fn eq_str(&self, s: &str) -> bool {
        self.0 == s.as_bytes()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.decode())
    }
}

/// Extracts tokens from a [`ByteCursor`].
#[derive(Debug)]
pub struct WordScanner<'c, 'a> {
    cursor: &'c mut ByteCursor<'a>,
    max_attempts: usize,
}

impl<'c, 'a> WordScanner<'c, 'a> {
    /// Creates a scanner with the default attempt bound.
    pub fn new(cursor: &'c mut ByteCursor<'a>) -> Self {
        Self::with_max_attempts(cursor, DEFAULT_MAX_TOKEN_ATTEMPTS)
    }

    /// Creates a scanner that consumes at most `max_attempts` bytes per token.
    pub fn with_max_attempts(cursor: &'c mut ByteCursor<'a>, max_attempts: usize) -> Self {
        Self {
            cursor,
            max_attempts,
        }
    }

    /// Scans the next token.
    ///
    /// Leading delimiters are skipped. The delimiter that ends the token is
    /// left unread so the next scan skips it. The end of the buffer also ends
    /// a non-empty token.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::BufferUnderrun`] if the buffer ends before any
    /// token byte is seen, or [`ParseError::TokenScanExhausted`] if the
    /// attempt bound is used up before the token is terminated.
    pub fn scan_token(&mut self) -> Result<Token> {
        let start = self.cursor.position();
        let mut word = Vec::new();
        let mut consumed = 0;

        loop {
            match self.cursor.peek_byte() {
                Some(byte) if is_delimiter(byte) && !word.is_empty() => return Ok(Token(word)),
                None if !word.is_empty() => return Ok(Token(word)),
                _ => {}
            }

            if consumed == self.max_attempts {
                return Err(ParseError::TokenScanExhausted {
                    position: start,
                    attempts: consumed,
                });
            }

            let byte = self.cursor.read_byte()?;
            consumed += 1;
            if !is_delimiter(byte) {
                word.push(byte);
            }
        }
    }

    /// Returns the position of the underlying cursor.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns true once the rest of the buffer holds no token bytes.
    pub fn at_end(&self) -> bool {
        self.cursor.rest().iter().all(|&b| is_delimiter(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(data: &[u8]) -> Vec<String> {
        let mut cursor = ByteCursor::new(data);
        let mut scanner = WordScanner::new(&mut cursor);
        let mut out = Vec::new();
        while !scanner.at_end() {
            out.push(scanner.scan_token().unwrap().to_string());
        }
        out
    }

    #[test]
    fn test_scan_tokens() {
        assert_eq!(
            scan_all(b"\x00grid0\x05Tree_float_5_4_3\x00\x00\x00\x14name"),
            vec!["grid0", "Tree_float_5_4_3", "name"]
        );
    }

    #[test]
    fn test_terminator_not_consumed() {
        let data = b"\x00abc\x00def";
        let mut cursor = ByteCursor::new(data);
        let token = WordScanner::new(&mut cursor).scan_token().unwrap();
        assert!(token.eq_str("abc"));
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.peek_byte(), Some(0));
    }

    #[test]
    fn test_control_range_boundary() {
        // 20 terminates, 21 does not
        let data = [21u8, 21, 20, 22];
        let mut cursor = ByteCursor::new(&data);
        let token = WordScanner::new(&mut cursor).scan_token().unwrap();
        assert_eq!(token.as_bytes(), &[21, 21]);
    }

    #[test]
    fn test_only_delimiters_underruns() {
        let data = [0u8, 3, 0];
        let mut cursor = ByteCursor::new(&data);
        let err = WordScanner::new(&mut cursor).scan_token().unwrap_err();
        assert!(matches!(err, ParseError::BufferUnderrun { .. }));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_exhausted_on_long_delimiter_run() {
        let data = vec![0u8; 300];
        let mut cursor = ByteCursor::new(&data);
        let err = WordScanner::new(&mut cursor).scan_token().unwrap_err();
        assert!(matches!(
            err,
            ParseError::TokenScanExhausted {
                position: 0,
                attempts: 256
            }
        ));
    }

    #[test]
    fn test_exhausted_on_overlong_token() {
        let mut data = vec![b'a'; 300];
        data.push(0);
        let mut cursor = ByteCursor::new(&data);
        let err = WordScanner::with_max_attempts(&mut cursor, 16)
            .scan_token()
            .unwrap_err();
        assert!(matches!(err, ParseError::TokenScanExhausted { .. }));
    }

    #[test]
    fn test_token_at_end_of_buffer() {
        let mut cursor = ByteCursor::new(b"\x00tail");
        let token = WordScanner::new(&mut cursor).scan_token().unwrap();
        assert_eq!(token.decode(), "tail");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_token_serializes_as_string() {
        let mut cursor = ByteCursor::new(b"grid0");
        let token = WordScanner::new(&mut cursor).scan_token().unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"grid0\"");
    }
}
