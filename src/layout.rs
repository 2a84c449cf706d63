//! Runtime record layouts
//!
//! A [`Layout`] describes a record in JSON instead of Rust code, so the
//! command-line tool can decode and encode files whose structure is only
//! known at run time:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "id",      "kind": "u32",  "fixed": "0-6",         "csv": "0" },
//!     { "name": "joined",  "kind": "timestamp", "fixed": "6-14,%Y%m%d" },
//!     { "name": "address", "kind": "record", "fixed": "14-40", "csv": "2", "csvsplit": "~",
//!       "fields": [ { "name": "city", "kind": "text", "fixed": "14-30", "csv": "0" } ] }
//!   ]
//! }
//! ```
//!
//! Compiling a layout yields a [`CompiledLayout`]: a [`Schema`] over
//! [`DynamicRecord`] values plus the JSON conversions for them.

use crate::codec::field_parsers::parse_timestamp;
use crate::codec::{
    DecodeReport, Field, IntWidth, NestedCodec, Schema, Tags, decode_delimited, decode_fixed,
    encode_fixed, line_length,
};
use crate::codec::schema::{Accessor, Binding};
use crate::config::CodecConfig;
use crate::constants::JSON_TIMESTAMP_LAYOUT;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Kind of a layout field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
    Timestamp,
    Record,
}

impl LayoutKind {
    fn signed_width(self) -> Option<IntWidth> {
        match self {
            LayoutKind::I8 => Some(IntWidth::W8),
            LayoutKind::I16 => Some(IntWidth::W16),
            LayoutKind::I32 => Some(IntWidth::W32),
            LayoutKind::I64 => Some(IntWidth::W64),
            _ => None,
        }
    }

    fn unsigned_width(self) -> Option<IntWidth> {
        match self {
            LayoutKind::U8 => Some(IntWidth::W8),
            LayoutKind::U16 => Some(IntWidth::W16),
            LayoutKind::U32 => Some(IntWidth::W32),
            LayoutKind::U64 => Some(IntWidth::W64),
            _ => None,
        }
    }
}

/// One field of a layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub name: String,
    pub kind: LayoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csvsplit: Option<String>,
    /// Fields of a nested record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldLayout>,
}

impl FieldLayout {
    fn tags(&self) -> Tags {
        let mut tags = Tags::none();
        if let Some(fixed) = &self.fixed {
            tags = tags.with_fixed(fixed.as_str());
        }
        if let Some(csv) = &self.csv {
            tags = tags.with_csv(csv.as_str());
        }
        if let Some(split) = &self.csvsplit {
            tags = tags.with_split(split.as_str());
        }
        tags
    }
}

/// A record layout document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub fields: Vec<FieldLayout>,
}

impl Layout {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::json("Invalid layout document", e))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read layout {}", path.display()), e))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::json(format!("Invalid layout {}", path.display()), e))
    }

    /// Validate the layout and build its schema
    pub fn compile(&self) -> Result<CompiledLayout> {
        compile_fields(&self.fields, "")
    }
}

/// A value held by a [`DynamicRecord`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    F32(f32),
    F64(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Record(DynamicRecord),
}

/// A record whose fields are described by a layout, stored positionally
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    values: Vec<Value>,
}

impl DynamicRecord {
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    fn bool_at(&self, index: usize) -> bool {
        matches!(self.values.get(index), Some(Value::Bool(true)))
    }

    fn signed_at(&self, index: usize) -> i64 {
        match self.values.get(index) {
            Some(Value::Signed(v)) => *v,
            _ => 0,
        }
    }

    fn unsigned_at(&self, index: usize) -> u64 {
        match self.values.get(index) {
            Some(Value::Unsigned(v)) => *v,
            _ => 0,
        }
    }

    fn f32_at(&self, index: usize) -> f32 {
        match self.values.get(index) {
            Some(Value::F32(v)) => *v,
            _ => 0.0,
        }
    }

    fn f64_at(&self, index: usize) -> f64 {
        match self.values.get(index) {
            Some(Value::F64(v)) => *v,
            _ => 0.0,
        }
    }

    fn text_at(&self, index: usize) -> String {
        match self.values.get(index) {
            Some(Value::Text(v)) => v.clone(),
            _ => String::new(),
        }
    }

    fn timestamp_at(&self, index: usize) -> NaiveDateTime {
        match self.values.get(index) {
            Some(Value::Timestamp(v)) => *v,
            _ => NaiveDateTime::default(),
        }
    }
}

struct CompiledField {
    name: String,
    kind: LayoutKind,
    nested: Option<Arc<CompiledLayout>>,
}

/// A validated layout with its schema
pub struct CompiledLayout {
    fields: Vec<CompiledField>,
    schema: Schema<DynamicRecord>,
    template: DynamicRecord,
}

impl CompiledLayout {
    pub fn schema(&self) -> &Schema<DynamicRecord> {
        &self.schema
    }

    /// A record with every field at its zero value
    pub fn blank(&self) -> DynamicRecord {
        self.template.clone()
    }

    pub fn line_length(&self) -> usize {
        line_length(&self.schema)
    }

    pub fn decode_fixed(&self, text: &str, config: &CodecConfig) -> (DynamicRecord, DecodeReport) {
        let mut record = self.blank();
        let report = decode_fixed(&self.schema, text, &mut record, config);
        (record, report)
    }

    pub fn decode_delimited(
        &self,
        text: &str,
        separator: &str,
        config: &CodecConfig,
    ) -> (DynamicRecord, DecodeReport) {
        let mut record = self.blank();
        let report = decode_delimited(&self.schema, text, separator, &mut record, config);
        (record, report)
    }

    pub fn encode(&self, record: &DynamicRecord, config: &CodecConfig) -> Result<String> {
        encode_fixed(&self.schema, record, config)
    }

    /// Value of the field called `name`
    pub fn value<'a>(&self, record: &'a DynamicRecord, name: &str) -> Option<&'a Value> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        record.get(index)
    }

    /// Render a record as a JSON object keyed by field name
    pub fn to_json(&self, record: &DynamicRecord) -> Json {
        let mut object = Map::new();
        for (field, value) in self.fields.iter().zip(record.values()) {
            let json = match (value, &field.nested) {
                (Value::Bool(v), _) => Json::from(*v),
                (Value::Signed(v), _) => Json::from(*v),
                (Value::Unsigned(v), _) => Json::from(*v),
                (Value::F32(v), _) => Json::from(f64::from(*v)),
                (Value::F64(v), _) => Json::from(*v),
                (Value::Text(v), _) => Json::from(v.as_str()),
                (Value::Timestamp(v), _) => {
                    Json::from(v.format(JSON_TIMESTAMP_LAYOUT).to_string())
                }
                (Value::Record(v), Some(nested)) => nested.to_json(v),
                (Value::Record(_), None) => Json::Null,
            };
            object.insert(field.name.clone(), json);
        }
        Json::Object(object)
    }

    /// Build a record from a JSON object; absent fields keep their zero value
    pub fn from_json(&self, json: &Json) -> Result<DynamicRecord> {
        let object = json
            .as_object()
            .ok_or_else(|| Error::invalid_value("<record>", "expected a JSON object"))?;

        let mut record = self.blank();
        for (index, field) in self.fields.iter().enumerate() {
            if let Some(json) = object.get(&field.name) {
                record.set(index, self.value_from_json(field, json)?);
            }
        }
        Ok(record)
    }

    fn value_from_json(&self, field: &CompiledField, json: &Json) -> Result<Value> {
        let mismatch = || {
            Error::invalid_value(
                &field.name,
                format!("{} does not fit kind {:?}", json, field.kind),
            )
        };

        if let Some(width) = field.kind.signed_width() {
            return json
                .as_i64()
                .filter(|v| width.fits_signed(*v))
                .map(Value::Signed)
                .ok_or_else(mismatch);
        }
        if let Some(width) = field.kind.unsigned_width() {
            return json
                .as_u64()
                .filter(|v| width.fits_unsigned(*v))
                .map(Value::Unsigned)
                .ok_or_else(mismatch);
        }

        match field.kind {
            LayoutKind::Bool => json.as_bool().map(Value::Bool).ok_or_else(mismatch),
            LayoutKind::F32 => json.as_f64().map(|v| Value::F32(v as f32)).ok_or_else(mismatch),
            LayoutKind::F64 => json.as_f64().map(Value::F64).ok_or_else(mismatch),
            LayoutKind::Text => json
                .as_str()
                .map(|v| Value::Text(v.to_string()))
                .ok_or_else(mismatch),
            LayoutKind::Timestamp => json
                .as_str()
                .and_then(|v| {
                    parse_timestamp(v, JSON_TIMESTAMP_LAYOUT)
                        .or_else(|| parse_timestamp(v, "%Y-%m-%d"))
                })
                .map(Value::Timestamp)
                .ok_or_else(mismatch),
            LayoutKind::Record => match &field.nested {
                Some(nested) => Ok(Value::Record(nested.from_json(json)?)),
                None => Err(mismatch()),
            },
            _ => Err(mismatch()),
        }
    }
}

/// Nested layout record stored in slot `index` of its parent
struct NestedLayout {
    index: usize,
    layout: Arc<CompiledLayout>,
}

impl NestedCodec<DynamicRecord> for NestedLayout {
    fn line_length(&self) -> usize {
        self.layout.line_length()
    }

    fn decode_fixed(
        &self,
        record: &mut DynamicRecord,
        text: &str,
        config: &CodecConfig,
    ) -> DecodeReport {
        let (nested, report) = self.layout.decode_fixed(text, config);
        record.set(self.index, Value::Record(nested));
        report
    }

    fn decode_delimited(
        &self,
        record: &mut DynamicRecord,
        text: &str,
        separator: &str,
        config: &CodecConfig,
    ) -> DecodeReport {
        let (nested, report) = self.layout.decode_delimited(text, separator, config);
        record.set(self.index, Value::Record(nested));
        report
    }

    fn encode_fixed(&self, record: &DynamicRecord, config: &CodecConfig) -> Result<String> {
        match record.get(self.index) {
            Some(Value::Record(nested)) => self.layout.encode(nested, config),
            _ => self.layout.encode(&self.layout.template, config),
        }
    }
}

fn compile_fields(layouts: &[FieldLayout], path: &str) -> Result<CompiledLayout> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(layouts.len());
    let mut schema = Schema::new();
    let mut values = Vec::with_capacity(layouts.len());

    for (index, layout) in layouts.iter().enumerate() {
        let qualified = if path.is_empty() {
            layout.name.clone()
        } else {
            format!("{}.{}", path, layout.name)
        };
        if layout.name.is_empty() {
            return Err(Error::layout(format!("field {} of '{}' has no name", index, path)));
        }
        if !seen.insert(layout.name.as_str()) {
            return Err(Error::layout(format!("duplicate field '{}'", qualified)));
        }

        let nested = match (layout.kind, layout.fields.is_empty()) {
            (LayoutKind::Record, true) => {
                return Err(Error::layout(format!(
                    "record field '{}' declares no fields",
                    qualified
                )));
            }
            (LayoutKind::Record, false) => Some(Arc::new(compile_fields(&layout.fields, &qualified)?)),
            (_, false) => {
                return Err(Error::layout(format!(
                    "field '{}' of kind {:?} cannot declare nested fields",
                    qualified, layout.kind
                )));
            }
            (_, true) => None,
        };

        let (binding, zero) = bind(layout.kind, index, nested.as_ref());
        schema.push(Field::new(layout.name.as_str(), layout.tags(), binding));
        values.push(zero);
        fields.push(CompiledField {
            name: layout.name.clone(),
            kind: layout.kind,
            nested,
        });
    }

    Ok(CompiledLayout {
        fields,
        schema,
        template: DynamicRecord { values },
    })
}

/// Binding and zero value for slot `index` of a dynamic record
fn bind(
    kind: LayoutKind,
    index: usize,
    nested: Option<&Arc<CompiledLayout>>,
) -> (Binding<DynamicRecord>, Value) {
    if let Some(width) = kind.signed_width() {
        let accessor = Accessor::new(
            move |r: &DynamicRecord| r.signed_at(index),
            move |r: &mut DynamicRecord, v| r.set(index, Value::Signed(v)),
        );
        return (Binding::Signed(width, accessor), Value::Signed(0));
    }
    if let Some(width) = kind.unsigned_width() {
        let accessor = Accessor::new(
            move |r: &DynamicRecord| r.unsigned_at(index),
            move |r: &mut DynamicRecord, v| r.set(index, Value::Unsigned(v)),
        );
        return (Binding::Unsigned(width, accessor), Value::Unsigned(0));
    }

    match (kind, nested) {
        (LayoutKind::Bool, _) => (
            Binding::Boolean(Accessor::new(
                move |r: &DynamicRecord| r.bool_at(index),
                move |r: &mut DynamicRecord, v| r.set(index, Value::Bool(v)),
            )),
            Value::Bool(false),
        ),
        (LayoutKind::F32, _) => (
            Binding::Float32(Accessor::new(
                move |r: &DynamicRecord| r.f32_at(index),
                move |r: &mut DynamicRecord, v| r.set(index, Value::F32(v)),
            )),
            Value::F32(0.0),
        ),
        (LayoutKind::F64, _) => (
            Binding::Float64(Accessor::new(
                move |r: &DynamicRecord| r.f64_at(index),
                move |r: &mut DynamicRecord, v| r.set(index, Value::F64(v)),
            )),
            Value::F64(0.0),
        ),
        (LayoutKind::Timestamp, _) => (
            Binding::Timestamp(Accessor::new(
                move |r: &DynamicRecord| r.timestamp_at(index),
                move |r: &mut DynamicRecord, v| r.set(index, Value::Timestamp(v)),
            )),
            Value::Timestamp(NaiveDateTime::default()),
        ),
        (LayoutKind::Record, Some(layout)) => (
            Binding::Nested(Box::new(NestedLayout {
                index,
                layout: Arc::clone(layout),
            })),
            Value::Record(layout.blank()),
        ),
        // Text, and the integer kinds already handled above
        _ => (
            Binding::Text(Accessor::new(
                move |r: &DynamicRecord| r.text_at(index),
                move |r: &mut DynamicRecord, v| r.set(index, Value::Text(v)),
            )),
            Value::Text(String::new()),
        ),
    }
}
