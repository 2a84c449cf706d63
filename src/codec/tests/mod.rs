//! Shared record types for codec testing
//!
//! Each fixture describes its layout once through a `OnceLock` schema, the
//! same way library users are expected to.

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::OnceLock;

use crate::codec::{Record, Schema, Tags};


/// Four adjacent fields filling 35 columns
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Basic {
    pub number_a: i32,
    pub number_b: i32,
    pub string_c: String,
    pub string_d: String,
}

impl Record for Basic {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Basic>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Basic>::new()
                .signed("number_a", "0-5", |r| r.number_a, |r, v| r.number_a = v)
                .signed("number_b", "5-10", |r| r.number_b, |r, v| r.number_b = v)
                .text("string_c", "10-15", |r| r.string_c.clone(), |r, v| r.string_c = v)
                .text("string_d", "15-35", |r| r.string_d.clone(), |r, v| r.string_d = v)
        })
    }
}

/// Same columns as [`Basic`], declared out of column order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reordered {
    pub number_a: i32,
    pub number_b: i32,
    pub string_c: String,
    pub string_d: String,
}

impl Record for Reordered {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Reordered>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Reordered>::new()
                .text("string_d", "15-35", |r| r.string_d.clone(), |r, v| r.string_d = v)
                .signed("number_a", "0-5", |r| r.number_a, |r, v| r.number_a = v)
                .text("string_c", "10-15", |r| r.string_c.clone(), |r, v| r.string_c = v)
                .signed("number_b", "5-10", |r| r.number_b, |r, v| r.number_b = v)
        })
    }
}

/// Overlapping integer ranges and a field past the end of short input
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sliced {
    pub number_a: i32,
    pub number_b: i32,
    pub string_c: String,
    pub string_d: String,
}

impl Record for Sliced {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Sliced>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Sliced>::new()
                .signed("number_a", "0-5", |r| r.number_a, |r, v| r.number_a = v)
                .signed("number_b", "2-5", |r| r.number_b, |r, v| r.number_b = v)
                .text("string_c", "10-15", |r| r.string_c.clone(), |r, v| r.string_c = v)
                .text("string_d", "29-35", |r| r.string_d.clone(), |r, v| r.string_d = v)
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dated {
    pub date: NaiveDateTime,
    pub code: String,
}

impl Record for Dated {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Dated>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Dated>::new()
                .timestamp("date", "0-8,%Y%m%d", |r| r.date, |r, v| r.date = v)
                .text("code", "8-10", |r| r.code.clone(), |r, v| r.code = v)
        })
    }
}

/// Text, integer, date and float columns in one line
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mixed {
    pub uno: String,
    pub due: i64,
    pub tre: NaiveDateTime,
    pub quattro: String,
    pub cinque: f32,
}

impl Record for Mixed {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Mixed>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Mixed>::new()
                .text("uno", "0-10", |r| r.uno.clone(), |r, v| r.uno = v)
                .signed("due", "10-20", |r| r.due, |r, v| r.due = v)
                .timestamp("tre", "20-30,%Y-%m-%d", |r| r.tre, |r, v| r.tre = v)
                .text("quattro", "30-40", |r| r.quattro.clone(), |r, v| r.quattro = v)
                .float32("cinque", "40-50,2", |r| r.cinque, |r, v| r.cinque = v)
        })
    }
}

/// Columns 15-20 belong to no field
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gapped {
    pub number_a: i32,
    pub number_b: i32,
    pub string_c: String,
    pub string_d: String,
}

impl Record for Gapped {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Gapped>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Gapped>::new()
                .signed("number_a", "0-5", |r| r.number_a, |r, v| r.number_a = v)
                .signed("number_b", "5-10", |r| r.number_b, |r, v| r.number_b = v)
                .text("string_c", "10-15", |r| r.string_c.clone(), |r, v| r.string_c = v)
                .text("string_d", "20-40", |r| r.string_d.clone(), |r, v| r.string_d = v)
        })
    }
}

/// `string_c` and `string_d` share columns 12-15
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overlap {
    pub number_a: i32,
    pub number_b: i32,
    pub string_c: String,
    pub string_d: String,
}

impl Record for Overlap {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Overlap>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Overlap>::new()
                .signed("number_a", "0-5", |r| r.number_a, |r, v| r.number_a = v)
                .signed("number_b", "5-10", |r| r.number_b, |r, v| r.number_b = v)
                .text("string_c", "10-15", |r| r.string_c.clone(), |r, v| r.string_c = v)
                .text("string_d", "12-22", |r| r.string_d.clone(), |r, v| r.string_d = v)
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Measurement {
    pub station: u16,
    pub reading: f64,
    pub valid: bool,
}

impl Record for Measurement {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Measurement>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Measurement>::new()
                .unsigned("station", "0-4", |r| r.station, |r, v| r.station = v)
                .float64("reading", "4-12,2", |r| r.reading, |r, v| r.reading = v)
                .boolean("valid", "12-13", |r| r.valid, |r, v| r.valid = v)
        })
    }
}

/// Six columns, used nested inside other fixtures
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Inner {
    pub a: String,
    pub b: i16,
}

impl Record for Inner {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Inner>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Inner>::new()
                .text("a", "0-3", |r| r.a.clone(), |r, v| r.a = v)
                .signed("b", "3-6", |r| r.b, |r, v| r.b = v)
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LeadingNested {
    pub inner: Inner,
    pub tail: String,
}

impl Record for LeadingNested {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<LeadingNested>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<LeadingNested>::new()
                .nested("inner", "0-6", |r| &r.inner, |r, v| r.inner = v)
                .text("tail", "6-10", |r| r.tail.clone(), |r, v| r.tail = v)
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrailingNested {
    pub head: String,
    pub inner: Inner,
}

impl Record for TrailingNested {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<TrailingNested>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<TrailingNested>::new()
                .text("head", "0-4", |r| r.head.clone(), |r, v| r.head = v)
                .nested("inner", "4-10", |r| &r.inner, |r, v| r.inner = v)
        })
    }
}

/// A [`Basic`] record carried without an annotation of its own
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Embedding {
    pub basic: Basic,
    pub extra: i32,
}

impl Record for Embedding {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Embedding>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Embedding>::new()
                .nested("basic", Tags::none(), |r| &r.basic, |r, v| r.basic = v)
                .signed("extra", "35-40", |r| r.extra, |r, v| r.extra = v)
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pair {
    pub left: String,
    pub right: String,
}

impl Record for Pair {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Pair>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Pair>::new()
                .text("left", Tags::csv("0"), |r| r.left.clone(), |r, v| r.left = v)
                .text("right", Tags::csv("1"), |r| r.right.clone(), |r, v| r.right = v)
        })
    }
}

/// Delimited record with a nested pair, a whole-line copy and a field one past the end
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Delimited {
    pub code: String,
    pub count: u8,
    pub pair: Pair,
    pub line: String,
    pub missing: String,
}

impl Record for Delimited {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Delimited>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Delimited>::new()
                .text("code", Tags::csv("0"), |r| r.code.clone(), |r, v| r.code = v)
                .unsigned("count", Tags::csv("1"), |r| r.count, |r, v| r.count = v)
                .nested("pair", Tags::csv("2").with_split("~"), |r| &r.pair, |r, v| r.pair = v)
                .text("line", Tags::csv("raw"), |r| r.line.clone(), |r, v| r.line = v)
                .text("missing", Tags::csv("3"), |r| r.missing.clone(), |r, v| r.missing = v)
        })
    }
}

/// Midnight on the given day
pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}
