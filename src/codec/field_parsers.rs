//! Conversions between field text and typed values
//!
//! Parsing helpers return `None` when the text does not convert; the decoder
//! turns that into a skipped field. Formatting helpers produce the text the
//! encoder writes into the line, padded to the field width but never
//! truncated unless the kind calls for it.

use crate::constants::{BOOL_FALSE, BOOL_TRUE, TEXT_PAD};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::borrow::Cow;
use std::fmt::Write;

use super::schema::IntWidth;

/// Slice `text` by character columns `[begin, end)`
pub fn char_slice(text: &str, begin: usize, end: usize) -> Option<&str> {
    if begin > end {
        return None;
    }
    let mut offsets = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()));
    let start = offsets.nth(begin)?;
    let stop = if end == begin {
        start
    } else {
        offsets.nth(end - begin - 1)?
    };
    Some(&text[start..stop])
}

/// Parse the canonical boolean spellings
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a base-10 signed integer that must fit in `width` bits
pub fn parse_signed(text: &str, width: IntWidth) -> Option<i64> {
    text.parse::<i64>().ok().filter(|v| width.fits_signed(*v))
}

/// Parse a base-10 unsigned integer that must fit in `width` bits
pub fn parse_unsigned(text: &str, width: IntWidth) -> Option<u64> {
    text.parse::<u64>().ok().filter(|v| width.fits_unsigned(*v))
}

fn with_decimal_point(text: &str, decimal_comma: bool) -> Cow<'_, str> {
    if decimal_comma {
        Cow::Owned(text.replacen(',', ".", 1))
    } else {
        Cow::Borrowed(text)
    }
}

/// Leading spaces are allowed so space-padded `NaN` and `inf` read back
pub fn parse_f32(text: &str, decimal_comma: bool) -> Option<f32> {
    with_decimal_point(text.trim_start_matches(' '), decimal_comma).parse().ok()
}

pub fn parse_f64(text: &str, decimal_comma: bool) -> Option<f64> {
    with_decimal_point(text.trim_start_matches(' '), decimal_comma).parse().ok()
}

/// Parse a timestamp with a strftime layout.
///
/// Date-only layouts give midnight; time-only layouts give that time on
/// 0000-01-01.
pub fn parse_timestamp(text: &str, layout: &str) -> Option<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, layout) {
        return Some(datetime);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
        return date.and_hms_opt(0, 0, 0);
    }
    let time = NaiveTime::parse_from_str(text, layout).ok()?;
    NaiveDate::from_ymd_opt(0, 1, 1).map(|date| date.and_time(time))
}

/// Drop trailing spaces, keeping any other whitespace
pub fn trim_trailing_spaces(text: &str) -> &str {
    text.trim_end_matches(' ')
}

/// Left-justify `text` in `width` columns, padding with spaces and truncating
pub fn format_text(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(TEXT_PAD, width - len));
    out
}

pub fn format_bool(value: bool, width: usize) -> String {
    format_text(if value { BOOL_TRUE } else { BOOL_FALSE }, width)
}

/// Right-justify with zero fill. Values wider than `width` come out wider.
pub fn format_signed(value: i64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

pub fn format_unsigned(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// Fixed decimals, zero filled to `width`, optionally with a decimal comma.
/// `NaN` and infinities are right-justified with spaces instead.
pub fn format_float(value: f64, width: usize, decimals: usize, decimal_comma: bool) -> String {
    if !value.is_finite() {
        return format!("{:>width$}", value, width = width);
    }
    let out = format!("{:0width$.decimals$}", value, width = width, decimals = decimals);
    if decimal_comma {
        out.replacen('.', ",", 1)
    } else {
        out
    }
}

/// Render a timestamp, or `None` if the layout cannot be rendered
pub fn format_timestamp(value: &NaiveDateTime, layout: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(layout)).ok()?;
    Some(out)
}
