//! Splitting flat files into records
//!
//! A flat file is one record per line. The end-of-line convention is chosen by
//! the caller rather than detected; a trailing separator yields an empty last
//! record, which callers usually skip.

use crate::constants::{EOL_DOS, EOL_MAC, EOL_UNIX};
use crate::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// End-of-line convention separating records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EolStyle {
    /// `\n`
    #[default]
    Unix,
    /// `\r`
    Mac,
    /// `\r\n`
    Dos,
}

impl EolStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            EolStyle::Unix => EOL_UNIX,
            EolStyle::Mac => EOL_MAC,
            EolStyle::Dos => EOL_DOS,
        }
    }
}

/// Split text into records on `eol`
pub fn records_from_str(data: &str, eol: EolStyle) -> Vec<String> {
    data.split(eol.as_str()).map(str::to_string).collect()
}

/// Read a whole file and split it into records on `eol`
///
/// Bytes that are not valid UTF-8 become U+FFFD; the other records of the
/// file are unaffected.
pub fn records_from_file(path: &Path, eol: EolStyle) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
    let data = String::from_utf8_lossy(&bytes);
    if let std::borrow::Cow::Owned(_) = data {
        warn!("{} is not valid UTF-8; invalid bytes were replaced", path.display());
    }
    let records = records_from_str(&data, eol);
    debug!(
        "Read {} records from {} ({:?} line endings)",
        records.len(),
        path.display(),
        eol
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_records_from_file_unix() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "123\nABC\n").unwrap();

        let records = records_from_file(file.path(), EolStyle::Unix).unwrap();
        assert_eq!(records, vec!["123", "ABC", ""]);
    }

    #[test]
    fn test_invalid_utf8_only_affects_its_record() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"00042Caf\xe9 \nABC\n").unwrap();

        let records = records_from_file(file.path(), EolStyle::Unix).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], "00042Caf\u{FFFD} ");
        assert_eq!(records[1], "ABC");
        assert_eq!(records[2], "");
    }

    #[test]
    fn test_records_from_str_dos_and_mac() {
        assert_eq!(
            records_from_str("one\r\ntwo", EolStyle::Dos),
            vec!["one", "two"]
        );
        assert_eq!(
            records_from_str("one\rtwo\r", EolStyle::Mac),
            vec!["one", "two", ""]
        );
    }

    #[test]
    fn test_wrong_style_keeps_line_whole() {
        assert_eq!(
            records_from_str("one\r\ntwo", EolStyle::Mac),
            vec!["one", "\ntwo"]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = records_from_file(Path::new("/nonexistent/records.txt"), EolStyle::Unix)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
