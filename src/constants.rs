//! Application constants for flatrecord
//!
//! Annotation markers, end-of-line conventions and formatting defaults used
//! throughout the codec and the command-line tool.

// =============================================================================
// End-of-line conventions
// =============================================================================

/// Unix/Linux style end of line
pub const EOL_UNIX: &str = "\n";

/// Classic Macintosh style end of line
pub const EOL_MAC: &str = "\r";

/// DOS/Windows style end of line
pub const EOL_DOS: &str = "\r\n";

// =============================================================================
// Annotation syntax
// =============================================================================

/// Separates the column range from the format argument: `"0-8,%Y%m%d"`
pub const FORMAT_SEPARATOR: char = ',';

/// Separates begin and end of a column range: `"10-15"`
pub const RANGE_SEPARATOR: char = '-';

/// Annotation binding a text field to the whole record
pub const RAW_TAG: &str = "raw";

/// Shortest and longest accepted delimited annotation, in bytes
pub const MIN_ORDINAL_TAG_LEN: usize = 1;
pub const MAX_ORDINAL_TAG_LEN: usize = 4;

// =============================================================================
// Line buffer and formatting
// =============================================================================

/// Marks a column of the output line that no field has written
pub const UNWRITTEN: char = '\0';

/// Padding for text fields and boolean flags
pub const TEXT_PAD: char = ' ';

/// Decimal places used when a float field carries no usable format
pub const DEFAULT_FLOAT_DECIMALS: usize = 2;

/// Rendering of booleans in fixed-width output
pub const BOOL_TRUE: &str = "1";
pub const BOOL_FALSE: &str = "0";

/// Layout used for timestamps in JSON documents
pub const JSON_TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

// =============================================================================
// Configuration
// =============================================================================

/// Environment variable enabling decimal-comma mode (`1`, `true`, `yes`, `on`)
pub const DECIMAL_COMMA_ENV: &str = "FLATRECORD_DECIMAL_COMMA";

/// Directory and file name of the user configuration
pub const CONFIG_DIR_NAME: &str = "flatrecord";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default logging filter target
pub const LOG_TARGET: &str = "flatrecord";
