//! Codec configuration.
//!
//! Every encode and decode call takes a [`CodecConfig`] by reference and treats
//! it as an immutable snapshot for the duration of the call. A process-wide
//! decimal-comma toggle is kept as a fallback for callers that do not want to
//! thread a configuration through; [`CodecConfig::global`] snapshots it.

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DECIMAL_COMMA_ENV};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

static DECIMAL_COMMA: AtomicBool = AtomicBool::new(false);

/// Enable or disable comma-as-decimal-separator for the whole process
pub fn set_decimal_comma(enabled: bool) {
    DECIMAL_COMMA.store(enabled, Ordering::SeqCst);
}

/// Current value of the process-wide decimal-comma toggle
pub fn decimal_comma() -> bool {
    DECIMAL_COMMA.load(Ordering::SeqCst)
}

/// Where the encoder places a nested record's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestedPlacement {
    /// Write the nested line at column 0 of the enclosing line, bounded by the
    /// enclosing line's length. Nested field positions are then absolute.
    #[default]
    LineStart,
    /// Write the nested line inside the enclosing field's own column range.
    FieldBegin,
}

/// Settings shared by the decoder and the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Parse and format floats with a comma as the decimal separator
    pub decimal_comma: bool,

    /// Placement of nested records when encoding
    pub nested_placement: NestedPlacement,
}

impl CodecConfig {
    /// Snapshot of the process-wide defaults
    pub fn global() -> Self {
        Self {
            decimal_comma: decimal_comma(),
            ..Self::default()
        }
    }

    pub fn with_decimal_comma(mut self, enabled: bool) -> Self {
        self.decimal_comma = enabled;
        self
    }

    pub fn with_nested_placement(mut self, placement: NestedPlacement) -> Self {
        self.nested_placement = placement;
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read config {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::json(format!("Invalid config {}", path.display()), e))?;
        debug!("Loaded codec configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from the environment on top of this configuration
    pub fn with_env_overrides(self) -> Result<Self> {
        match std::env::var(DECIMAL_COMMA_ENV) {
            Ok(value) => {
                let enabled = parse_env_flag(&value).ok_or_else(|| {
                    Error::configuration(format!(
                        "{} must be a boolean flag, found '{}'",
                        DECIMAL_COMMA_ENV, value
                    ))
                })?;
                debug!("{} overrides decimal_comma = {}", DECIMAL_COMMA_ENV, enabled);
                Ok(self.with_decimal_comma(enabled))
            }
            Err(_) => Ok(self),
        }
    }

    /// Default location of the user configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Layered load: explicit file, else the default file if present, then environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let base = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        base.with_env_overrides()
    }
}

fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(!config.decimal_comma);
        assert_eq!(config.nested_placement, NestedPlacement::LineStart);
    }

    #[test]
    fn test_builders() {
        let config = CodecConfig::default()
            .with_decimal_comma(true)
            .with_nested_placement(NestedPlacement::FieldBegin);
        assert!(config.decimal_comma);
        assert_eq!(config.nested_placement, NestedPlacement::FieldBegin);
    }

    #[test]
    fn test_from_file_partial_document() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"nested_placement": "field-begin"}}"#).unwrap();

        let config = CodecConfig::from_file(file.path()).unwrap();
        assert!(!config.decimal_comma);
        assert_eq!(config.nested_placement, NestedPlacement::FieldBegin);
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "decimal_comma = true").unwrap();

        let err = CodecConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_env_flag_parsing() {
        assert_eq!(parse_env_flag("TRUE"), Some(true));
        assert_eq!(parse_env_flag(" on "), Some(true));
        assert_eq!(parse_env_flag("0"), Some(false));
        assert_eq!(parse_env_flag("maybe"), None);
    }
}
