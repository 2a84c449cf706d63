//! Text to record decoding
//!
//! Both decoders walk the schema in declaration order and never fail as a
//! whole: every field either receives a value or is left as it was, and the
//! returned [`DecodeReport`] says which.

use tracing::{debug, warn};

use super::field_parsers::{
    char_slice, parse_bool, parse_f32, parse_f64, parse_signed, parse_timestamp,
    parse_unsigned, trim_trailing_spaces,
};
use super::position::{DelimitedPosition, FixedPosition, resolve_delimited, resolve_fixed};
use super::report::{DecodeReport, FieldStatus, SkipReason};
use super::schema::{Binding, Field, Schema};
use crate::config::CodecConfig;

/// Decode a fixed-width record into `record`
pub fn decode_fixed<R>(
    schema: &Schema<R>,
    text: &str,
    record: &mut R,
    config: &CodecConfig,
) -> DecodeReport {
    let len = text.chars().count();
    let mut report = DecodeReport::new();

    for field in schema.fields() {
        let status = decode_fixed_field(field, text, len, record, config);
        log_skip(field, &status);
        report.push(field.name(), status);
    }

    report
}

/// Decode a delimited record into `record`, locating fields by ordinal
pub fn decode_delimited<R>(
    schema: &Schema<R>,
    text: &str,
    separator: &str,
    record: &mut R,
    config: &CodecConfig,
) -> DecodeReport {
    let parts = split_parts(text, separator);
    let mut report = DecodeReport::new();

    for field in schema.fields() {
        let status = decode_delimited_field(field, text, &parts, record, config);
        log_skip(field, &status);
        report.push(field.name(), status);
    }

    report
}

fn decode_fixed_field<R>(
    field: &Field<R>,
    text: &str,
    len: usize,
    record: &mut R,
    config: &CodecConfig,
) -> FieldStatus {
    let Some(tag) = field.tags().fixed_tag() else {
        return FieldStatus::skipped(SkipReason::NoAnnotation);
    };
    let Some(annotation) = resolve_fixed(tag) else {
        return FieldStatus::skipped(SkipReason::MalformedAnnotation {
            tag: tag.to_string(),
        });
    };

    let range = match annotation.position {
        FixedPosition::WholeLine => return assign_whole_line(field, text, record),
        FixedPosition::Columns(range) => range,
    };
    if !range.fits(len) {
        return FieldStatus::skipped(SkipReason::OutOfRange {
            begin: range.begin,
            end: range.end,
            len,
        });
    }
    let slice = char_slice(text, range.begin, range.end).unwrap_or_default();

    match field.binding() {
        Binding::Nested(nested) => {
            let nested_len = nested.line_length();
            if nested_len > range.width() {
                warn!(
                    "Nested record '{}' spans {} columns but its range {}-{} holds only {}",
                    field.name(),
                    nested_len,
                    range.begin,
                    range.end,
                    range.width()
                );
            }
            FieldStatus::Nested {
                report: nested.decode_fixed(record, slice, config),
            }
        }
        Binding::Text(accessor) => {
            accessor.set(record, trim_trailing_spaces(slice).to_string());
            FieldStatus::Applied
        }
        binding => convert(binding, slice, annotation.format, record, config),
    }
}

fn decode_delimited_field<R>(
    field: &Field<R>,
    text: &str,
    parts: &[&str],
    record: &mut R,
    config: &CodecConfig,
) -> FieldStatus {
    let Some(tag) = field.tags().csv_tag() else {
        return FieldStatus::skipped(SkipReason::NoAnnotation);
    };
    let Some(position) = resolve_delimited(tag) else {
        return FieldStatus::skipped(SkipReason::MalformedAnnotation {
            tag: tag.to_string(),
        });
    };

    let ordinal = match position {
        DelimitedPosition::WholeLine => return assign_whole_line(field, text, record),
        DelimitedPosition::Ordinal(ordinal) => ordinal,
    };
    let index = match usize::try_from(ordinal) {
        Ok(index) if index < parts.len() => index,
        // One past the end is let through the bound check and then does nothing.
        Ok(index) if index == parts.len() => {
            return FieldStatus::skipped(SkipReason::PastLastPart { ordinal });
        }
        _ => {
            return FieldStatus::skipped(SkipReason::OrdinalOutOfRange {
                ordinal,
                parts: parts.len(),
            });
        }
    };
    let slice = parts[index];

    match field.binding() {
        Binding::Nested(nested) => match field.tags().split_tag() {
            Some(separator) => FieldStatus::Nested {
                report: nested.decode_delimited(record, slice, separator, config),
            },
            None => FieldStatus::skipped(SkipReason::MissingSubDelimiter),
        },
        binding => {
            // Timestamps borrow the layout of the fixed-width annotation.
            let layout = field
                .tags()
                .fixed_tag()
                .and_then(resolve_fixed)
                .and_then(|annotation| annotation.format);
            convert(binding, slice, layout, record, config)
        }
    }
}

/// Convert a located slice into a scalar value and store it
fn convert<R>(
    binding: &Binding<R>,
    slice: &str,
    layout: Option<&str>,
    record: &mut R,
    config: &CodecConfig,
) -> FieldStatus {
    let invalid = || {
        FieldStatus::skipped(SkipReason::InvalidValue {
            kind: binding.kind().to_string(),
            value: slice.to_string(),
        })
    };

    match binding {
        Binding::Boolean(accessor) => match parse_bool(slice) {
            Some(value) => accessor.set(record, value),
            None => return invalid(),
        },
        Binding::Signed(width, accessor) => match parse_signed(slice, *width) {
            Some(value) => accessor.set(record, value),
            None => return invalid(),
        },
        Binding::Unsigned(width, accessor) => match parse_unsigned(slice, *width) {
            Some(value) => accessor.set(record, value),
            None => return invalid(),
        },
        Binding::Float32(accessor) => match parse_f32(slice, config.decimal_comma) {
            Some(value) => accessor.set(record, value),
            None => return invalid(),
        },
        Binding::Float64(accessor) => match parse_f64(slice, config.decimal_comma) {
            Some(value) => accessor.set(record, value),
            None => return invalid(),
        },
        Binding::Text(accessor) => accessor.set(record, slice.to_string()),
        Binding::Timestamp(accessor) => {
            let Some(layout) = layout.filter(|l| !l.is_empty()) else {
                return FieldStatus::skipped(SkipReason::MissingLayout);
            };
            match parse_timestamp(slice, layout) {
                Some(value) => accessor.set(record, value),
                None => return invalid(),
            }
        }
        Binding::Nested(_) => {
            return FieldStatus::skipped(SkipReason::UnsupportedKind {
                kind: binding.kind().to_string(),
            });
        }
    }
    FieldStatus::Applied
}

fn assign_whole_line<R>(field: &Field<R>, text: &str, record: &mut R) -> FieldStatus {
    match field.binding() {
        Binding::Text(accessor) => {
            accessor.set(record, text.to_string());
            FieldStatus::Applied
        }
        binding => FieldStatus::skipped(SkipReason::UnsupportedKind {
            kind: binding.kind().to_string(),
        }),
    }
}

// An empty separator splits between every character.
fn split_parts<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(offset, c)| &text[offset..offset + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).collect()
    }
}

fn log_skip<R>(field: &Field<R>, status: &FieldStatus) {
    if let FieldStatus::Skipped(reason) = status {
        debug!("Skipping field '{}': {:?}", field.name(), reason);
    }
}
