//! Fixed-length output line used by the encoder

use crate::constants::UNWRITTEN;
use crate::error::LineError;
use std::fmt;

/// A fixed number of character columns, all starting out unwritten.
///
/// Writes are bounded to the line and may overlap earlier writes only where
/// they agree character for character. A write that hits a conflict stops
/// there; the columns it already changed stay changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    columns: Vec<char>,
}

impl LineBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            columns: vec![UNWRITTEN; len],
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn as_chars(&self) -> &[char] {
        &self.columns
    }

    /// Write `text` starting at `begin`, with `end` as the exclusive bound
    pub fn write(&mut self, text: &str, begin: usize, end: usize) -> Result<(), LineError> {
        let len = self.len();
        if begin >= len {
            return Err(LineError::BeginOutOfRange { begin, len });
        }
        if end < 1 || end > len {
            return Err(LineError::EndOutOfRange { end, len });
        }

        let text_len = text.chars().count();
        match end.checked_sub(begin) {
            Some(span) if text_len <= span => {}
            _ => {
                return Err(LineError::TextTooLongForRange {
                    text_len,
                    begin,
                    end,
                });
            }
        }

        for (column, incoming) in (begin..).zip(text.chars()) {
            let existing = self.columns[column];
            if existing != UNWRITTEN && existing != incoming {
                return Err(LineError::IncoherentOverlap {
                    column,
                    existing,
                    incoming,
                });
            }
            self.columns[column] = incoming;
        }
        Ok(())
    }

    pub fn into_string(self) -> String {
        self.columns.into_iter().collect()
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.columns.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_is_unwritten() {
        let line = LineBuffer::new(3);
        assert_eq!(line.len(), 3);
        assert_eq!(line.into_string(), "\0\0\0");
    }

    #[test]
    fn test_write_within_bounds() {
        let mut line = LineBuffer::new(10);
        line.write("abc", 2, 5).unwrap();
        assert_eq!(line.to_string(), "\0\0abc\0\0\0\0\0");
    }

    #[test]
    fn test_short_text_leaves_tail_unwritten() {
        let mut line = LineBuffer::new(5);
        line.write("ab", 0, 5).unwrap();
        assert_eq!(line.into_string(), "ab\0\0\0");
    }

    #[test]
    fn test_consistent_overlap_is_accepted() {
        let mut line = LineBuffer::new(5);
        line.write("12345", 0, 5).unwrap();
        line.write("345", 2, 5).unwrap();
        assert_eq!(line.into_string(), "12345");
    }

    #[test]
    fn test_conflicting_overlap_is_rejected() {
        let mut line = LineBuffer::new(5);
        line.write("12345", 0, 5).unwrap();
        let err = line.write("399", 2, 5).unwrap_err();
        assert_eq!(
            err,
            LineError::IncoherentOverlap {
                column: 3,
                existing: '4',
                incoming: '9',
            }
        );
    }

    #[test]
    fn test_partial_write_is_not_rolled_back() {
        let mut line = LineBuffer::new(6);
        line.write("x", 2, 3).unwrap();
        assert!(line.write("abcd", 0, 4).is_err());
        assert_eq!(line.as_chars()[..2], ['a', 'b']);
        assert_eq!(line.as_chars()[3], '\0');
    }

    #[test]
    fn test_range_errors() {
        let mut line = LineBuffer::new(5);
        assert_eq!(
            line.write("a", 5, 5),
            Err(LineError::BeginOutOfRange { begin: 5, len: 5 })
        );
        assert_eq!(
            line.write("", 0, 0),
            Err(LineError::EndOutOfRange { end: 0, len: 5 })
        );
        assert_eq!(
            line.write("a", 0, 6),
            Err(LineError::EndOutOfRange { end: 6, len: 5 })
        );
    }

    #[test]
    fn test_empty_line_rejects_every_write() {
        let mut line = LineBuffer::new(0);
        assert!(line.is_empty());
        assert_eq!(
            line.write("", 0, 0),
            Err(LineError::BeginOutOfRange { begin: 0, len: 0 })
        );
    }

    #[test]
    fn test_text_too_long() {
        let mut line = LineBuffer::new(10);
        assert_eq!(
            line.write("abcd", 2, 5),
            Err(LineError::TextTooLongForRange {
                text_len: 4,
                begin: 2,
                end: 5,
            })
        );
        // Inverted range
        assert!(matches!(
            line.write("", 4, 3),
            Err(LineError::TextTooLongForRange { .. })
        ));
    }

    #[test]
    fn test_multibyte_characters_count_as_one_column() {
        let mut line = LineBuffer::new(4);
        line.write("çà", 1, 3).unwrap();
        assert_eq!(line.into_string(), "\0çà\0");
    }
}
