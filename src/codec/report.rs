//! Per-field outcomes of a decode call
//!
//! Decoding is best-effort: a field that cannot be located or converted is
//! left untouched and the reason is recorded here instead of failing the
//! whole record.

use serde::Serialize;

/// Why a field was left untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The field carries no annotation for this mode
    NoAnnotation,

    /// The annotation does not have the expected shape
    MalformedAnnotation { tag: String },

    /// The column range does not fit inside the record
    OutOfRange { begin: usize, end: usize, len: usize },

    /// The ordinal is negative or beyond the last part
    OrdinalOutOfRange { ordinal: i64, parts: usize },

    /// The ordinal is exactly one past the last part
    PastLastPart { ordinal: i64 },

    /// The text could not be converted to the field's kind
    InvalidValue { kind: String, value: String },

    /// A timestamp field has no layout to parse with
    MissingLayout,

    /// A nested delimited record has no sub-delimiter
    MissingSubDelimiter,

    /// The whole-line annotation only applies to text fields
    UnsupportedKind { kind: String },
}

/// Outcome of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FieldStatus {
    Applied,
    Nested { report: DecodeReport },
    Skipped(SkipReason),
}

impl FieldStatus {
    pub fn skipped(reason: SkipReason) -> Self {
        FieldStatus::Skipped(reason)
    }

    pub fn is_applied(&self) -> bool {
        !matches!(self, FieldStatus::Skipped(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOutcome {
    pub field: String,
    pub status: FieldStatus,
}

/// Outcomes of every field of a record, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodeReport {
    pub fields: Vec<FieldOutcome>,
}

impl DecodeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, status: FieldStatus) {
        self.fields.push(FieldOutcome {
            field: field.into(),
            status,
        });
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn status(&self, field: &str) -> Option<&FieldStatus> {
        self.fields
            .iter()
            .find(|outcome| outcome.field == field)
            .map(|outcome| &outcome.status)
    }

    /// Number of fields that received a value (nested records count once)
    pub fn applied_count(&self) -> usize {
        self.fields.iter().filter(|o| o.status.is_applied()).count()
    }

    /// Skipped fields at this level, with their reasons
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.fields.iter().filter_map(|outcome| match &outcome.status {
            FieldStatus::Skipped(reason) => Some((outcome.field.as_str(), reason)),
            _ => None,
        })
    }

    /// Skipped fields at every nesting level, named by dotted path
    pub fn skipped_paths(&self) -> Vec<(String, SkipReason)> {
        let mut skipped = Vec::new();
        self.collect_skipped("", &mut skipped);
        skipped
    }

    fn collect_skipped(&self, prefix: &str, out: &mut Vec<(String, SkipReason)>) {
        for outcome in &self.fields {
            let path = if prefix.is_empty() {
                outcome.field.clone()
            } else {
                format!("{}.{}", prefix, outcome.field)
            };
            match &outcome.status {
                FieldStatus::Applied => {}
                FieldStatus::Nested { report } => report.collect_skipped(&path, out),
                FieldStatus::Skipped(reason) => out.push((path, reason.clone())),
            }
        }
    }

    /// Whether every field, including nested ones, received a value
    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|outcome| match &outcome.status {
            FieldStatus::Applied => true,
            FieldStatus::Nested { report } => report.is_complete(),
            FieldStatus::Skipped(_) => false,
        })
    }

    /// Share of fields at this level that received a value, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.fields.is_empty() {
            0.0
        } else {
            (self.applied_count() as f64 / self.fields.len() as f64) * 100.0
        }
    }
}
