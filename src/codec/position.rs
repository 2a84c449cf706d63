//! Position annotation parsing
//!
//! Turns the textual annotations attached to a field into structured
//! positions. Resolution is permissive: a token that is not a number counts as
//! `0`, and an annotation with the wrong shape resolves to `None` so the
//! caller can skip the field.

use crate::constants::{
    FORMAT_SEPARATOR, MAX_ORDINAL_TAG_LEN, MIN_ORDINAL_TAG_LEN, RANGE_SEPARATOR, RAW_TAG,
};

/// Half-open column range `[begin, end)`, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRange {
    pub begin: usize,
    pub end: usize,
}

impl ColumnRange {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Number of columns covered, zero for an inverted range
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    /// Whether the range can be sliced out of a record of `len` columns
    pub fn fits(&self, len: usize) -> bool {
        self.begin <= self.end && self.end <= len
    }
}

/// Where a field lives in a fixed-width record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPosition {
    Columns(ColumnRange),
    WholeLine,
}

/// A resolved fixed-width annotation: `"<begin>-<end>[,<format>]"` or `raw`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnnotation<'a> {
    pub position: FixedPosition,
    pub format: Option<&'a str>,
}

impl<'a> FixedAnnotation<'a> {
    /// The column range, unless the annotation binds the whole line
    pub fn columns(&self) -> Option<ColumnRange> {
        match self.position {
            FixedPosition::Columns(range) => Some(range),
            FixedPosition::WholeLine => None,
        }
    }
}

/// Where a field lives in a delimited record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimitedPosition {
    /// Index into the separator-split parts; may be negative or out of bounds
    Ordinal(i64),
    WholeLine,
}

/// Resolve a fixed-width annotation
pub fn resolve_fixed(tag: &str) -> Option<FixedAnnotation<'_>> {
    if tag == RAW_TAG {
        return Some(FixedAnnotation {
            position: FixedPosition::WholeLine,
            format: None,
        });
    }

    let (range, format) = match tag.split_once(FORMAT_SEPARATOR) {
        Some((range, format)) => (range, Some(format)),
        None => (tag, None),
    };

    let bookends: Vec<&str> = range.split(RANGE_SEPARATOR).collect();
    if bookends.len() != 2 {
        return None;
    }

    Some(FixedAnnotation {
        position: FixedPosition::Columns(ColumnRange::new(
            parse_column(bookends[0]),
            parse_column(bookends[1]),
        )),
        format,
    })
}

/// Resolve a delimited annotation
pub fn resolve_delimited(tag: &str) -> Option<DelimitedPosition> {
    if tag.len() < MIN_ORDINAL_TAG_LEN || tag.len() > MAX_ORDINAL_TAG_LEN {
        return None;
    }
    if tag == RAW_TAG {
        return Some(DelimitedPosition::WholeLine);
    }
    Some(DelimitedPosition::Ordinal(tag.parse().unwrap_or(0)))
}

/// Maximum end column of a fixed annotation, if it has a well-formed range
pub fn fixed_end(tag: &str) -> Option<usize> {
    resolve_fixed(tag)
        .and_then(|annotation| annotation.columns())
        .map(|range| range.end)
}

// Unparseable tokens count as column 0.
fn parse_column(token: &str) -> usize {
    token.parse().unwrap_or(0)
}
