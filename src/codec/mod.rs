//! Fixed-width and delimited record codec
//!
//! The codec maps flat text records onto typed records through an explicit
//! [`Schema`]: an ordered list of fields, each annotated with its position.
//!
//! ## Architecture
//!
//! - [`position`] - parsing of `"<begin>-<end>[,<format>]"` and ordinal annotations
//! - [`line`] - the fixed-length output buffer with overlap-checked writes
//! - [`length`] - output width of a schema
//! - [`decode`] - fixed-width and delimited decoding
//! - [`encode`] - fixed-width encoding
//! - [`schema`] - field descriptors, bindings and the [`Record`] trait
//! - [`report`] - per-field decode outcomes
//! - [`field_parsers`] - text conversions for each field kind
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::OnceLock;
//! use flatrecord::{Codec, CodecConfig, Record, Schema};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Entry {
//!     code: i32,
//!     label: String,
//! }
//!
//! impl Record for Entry {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<Entry>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::<Entry>::new()
//!                 .signed("code", "0-5", |r| r.code, |r, v| r.code = v)
//!                 .text("label", "5-12", |r| r.label.clone(), |r, v| r.label = v)
//!         })
//!     }
//! }
//!
//! let codec = Codec::new(CodecConfig::default());
//! let line = codec.encode(&Entry { code: 42, label: "spam".into() })?;
//! assert_eq!(line, "00042spam   ");
//!
//! let decoded = codec.decode::<Entry>(&line);
//! assert_eq!(decoded.record, Entry { code: 42, label: "spam".into() });
//! assert!(decoded.report.is_complete());
//! # Ok::<(), flatrecord::Error>(())
//! ```

pub mod decode;
pub mod encode;
pub mod field_parsers;
pub mod length;
pub mod line;
pub mod position;
pub mod report;
pub mod schema;

#[cfg(test)]
pub mod tests;

pub use decode::{decode_delimited, decode_fixed};
pub use encode::encode_fixed;
pub use length::line_length;
pub use line::LineBuffer;
pub use position::{ColumnRange, DelimitedPosition, FixedAnnotation, FixedPosition};
pub use report::{DecodeReport, FieldOutcome, FieldStatus, SkipReason};
pub use schema::{Binding, Field, FieldKind, IntWidth, NestedCodec, Record, Schema, Tags};

use crate::Result;
use crate::config::CodecConfig;

/// A decoded record together with the outcome of each field
#[derive(Debug, Clone)]
pub struct Decoded<R> {
    pub record: R,
    pub report: DecodeReport,
}

/// Codec bound to one configuration, for statically typed records
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Codec using a snapshot of the process-wide defaults
    pub fn global() -> Self {
        Self::new(CodecConfig::global())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a fixed-width record into a fresh `R`
    pub fn decode<R: Record>(&self, text: &str) -> Decoded<R> {
        let mut record = R::default();
        let report = self.decode_into(text, &mut record);
        Decoded { record, report }
    }

    /// Decode a fixed-width record into an existing `R`
    pub fn decode_into<R: Record>(&self, text: &str, record: &mut R) -> DecodeReport {
        decode_fixed(R::schema(), text, record, &self.config)
    }

    /// Decode a delimited record into a fresh `R`
    pub fn decode_delimited<R: Record>(&self, text: &str, separator: &str) -> Decoded<R> {
        let mut record = R::default();
        let report = decode_delimited(R::schema(), text, separator, &mut record, &self.config);
        Decoded { record, report }
    }

    pub fn encode<R: Record>(&self, record: &R) -> Result<String> {
        encode_fixed(R::schema(), record, &self.config)
    }

    pub fn line_length<R: Record>(&self) -> usize {
        line_length(R::schema())
    }
}
