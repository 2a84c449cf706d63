//! Record to fixed-width text encoding
//!
//! Each field is rendered to the width of its column range and written into
//! a [`LineBuffer`] sized by [`line_length`]. Writing is strict: the first
//! field that does not fit, or that contradicts an overlapping field, aborts
//! the whole encode.

use chrono::NaiveDateTime;
use tracing::warn;

use super::field_parsers::{
    format_bool, format_float, format_signed, format_text, format_timestamp, format_unsigned,
};
use super::length::line_length;
use super::line::LineBuffer;
use super::position::{ColumnRange, resolve_fixed};
use super::schema::{Binding, Field, NestedCodec, Schema};
use crate::config::{CodecConfig, NestedPlacement};
use crate::constants::DEFAULT_FLOAT_DECIMALS;
use crate::{Error, Result};

/// Encode `record` into a fixed-width line.
///
/// Columns no field writes are left as `'\0'`.
pub fn encode_fixed<R>(schema: &Schema<R>, record: &R, config: &CodecConfig) -> Result<String> {
    let mut line = LineBuffer::new(line_length(schema));

    for field in schema.fields() {
        let Some(annotation) = field.tags().fixed_tag().and_then(resolve_fixed) else {
            continue;
        };
        let Some(range) = annotation.columns() else {
            continue;
        };
        encode_field(field, range, annotation.format, record, config, &mut line)?;
    }

    Ok(line.into_string())
}

fn encode_field<R>(
    field: &Field<R>,
    range: ColumnRange,
    format: Option<&str>,
    record: &R,
    config: &CodecConfig,
    line: &mut LineBuffer,
) -> Result<()> {
    let width = range.width();
    let text = match field.binding() {
        Binding::Boolean(accessor) => format_bool(accessor.get(record), width),
        Binding::Signed(_, accessor) => format_signed(accessor.get(record), width),
        Binding::Unsigned(_, accessor) => format_unsigned(accessor.get(record), width),
        Binding::Float32(accessor) => {
            render_float(field, f64::from(accessor.get(record)), width, format, config)
        }
        Binding::Float64(accessor) => {
            render_float(field, accessor.get(record), width, format, config)
        }
        Binding::Text(accessor) => format_text(&accessor.get(record), width),
        Binding::Timestamp(accessor) => {
            match render_timestamp(field, &accessor.get(record), width, format) {
                Some(text) => text,
                None => return Ok(()),
            }
        }
        Binding::Nested(nested) => {
            return write_nested(field, nested.as_ref(), range, record, config, line);
        }
    };

    line.write(&text, range.begin, range.end)
        .map_err(|e| Error::write(field.name(), e))
}

fn render_float<R>(
    field: &Field<R>,
    value: f64,
    width: usize,
    format: Option<&str>,
    config: &CodecConfig,
) -> String {
    // No format means DEFAULT_FLOAT_DECIMALS (2), never 0 decimals
    let decimals = match format.filter(|f| !f.is_empty()) {
        None => DEFAULT_FLOAT_DECIMALS,
        Some(format) => format.parse().unwrap_or_else(|_| {
            warn!(
                "Field '{}' has a non-numeric float format '{}', using {} decimals",
                field.name(),
                format,
                DEFAULT_FLOAT_DECIMALS
            );
            DEFAULT_FLOAT_DECIMALS
        }),
    };

    let text = format_float(value, width, decimals, config.decimal_comma);
    if text.chars().count() > width {
        warn!(
            "Float {} of field '{}' needs {} columns but the field has {}",
            value,
            field.name(),
            text.chars().count(),
            width
        );
    }
    text
}

fn render_timestamp<R>(
    field: &Field<R>,
    value: &NaiveDateTime,
    width: usize,
    layout: Option<&str>,
) -> Option<String> {
    let Some(layout) = layout.filter(|l| !l.is_empty()) else {
        warn!("Timestamp field '{}' has no layout, leaving it unwritten", field.name());
        return None;
    };
    let Some(text) = format_timestamp(value, layout) else {
        warn!(
            "Timestamp field '{}' cannot be rendered with layout '{}', leaving it unwritten",
            field.name(),
            layout
        );
        return None;
    };
    if text.chars().count() != width {
        warn!(
            "Layout '{}' of field '{}' renders {} columns but the field has {}",
            layout,
            field.name(),
            text.chars().count(),
            width
        );
    }
    Some(text)
}

fn write_nested<R>(
    field: &Field<R>,
    nested: &dyn NestedCodec<R>,
    range: ColumnRange,
    record: &R,
    config: &CodecConfig,
    line: &mut LineBuffer,
) -> Result<()> {
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

    let text = nested.encode_fixed(record, config)?;
    let (begin, end) = match config.nested_placement {
        NestedPlacement::LineStart => (0, line.len()),
        NestedPlacement::FieldBegin => (range.begin, range.end),
    };
    line.write(&text, begin, end)
        .map_err(|e| Error::write(field.name(), e))
}
