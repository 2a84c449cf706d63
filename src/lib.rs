//! Flat record codec
//!
//! Maps fixed-width and delimited text records onto typed Rust records and
//! back. A record type describes its layout once, as a [`Schema`] of fields
//! annotated with column ranges (`"10-15"`, `"0-8,%Y%m%d"`) or ordinals
//! (`"2"`), and the codec does the rest:
//!
//! - Decoding fixed-width or delimited text, reporting every field it had to skip
//! - Encoding to fixed-width text with overlap-checked column writes
//! - Computing the line length a schema produces
//! - Splitting flat files into records by end-of-line convention
//! - Runtime layouts described in JSON, used by the `flatrecord` tool

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod records;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

pub use codec::{
    Codec, DecodeReport, Decoded, Field, FieldKind, FieldOutcome, FieldStatus, IntWidth,
    LineBuffer, NestedCodec, Record, Schema, SkipReason, Tags,
};
pub use config::{CodecConfig, NestedPlacement, decimal_comma, set_decimal_comma};
pub use error::{Error, LineError, Result};
pub use layout::{CompiledLayout, DynamicRecord, Layout, LayoutKind, Value};
pub use records::{EolStyle, records_from_file, records_from_str};

/// Decode a fixed-width record into `record` using the process-wide settings
pub fn unmarshal<R: Record>(text: &str, record: &mut R) -> DecodeReport {
    Codec::global().decode_into(text, record)
}

/// Decode a delimited record into `record` using the process-wide settings
pub fn unmarshal_delimited<R: Record>(text: &str, separator: &str, record: &mut R) -> DecodeReport {
    codec::decode_delimited(R::schema(), text, separator, record, &CodecConfig::global())
}

/// Encode `record` as a fixed-width line using the process-wide settings
pub fn marshal<R: Record>(record: &R) -> Result<String> {
    Codec::global().encode(record)
}

/// Length of the fixed-width line `R` encodes to
pub fn line_length<R: Record>() -> usize {
    codec::line_length(R::schema())
}
