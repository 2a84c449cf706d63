//! Record schemas: the ordered field descriptors the codec walks.
//!
//! A [`Schema`] lists a record type's fields in declaration order. Each
//! [`Field`] carries its annotations ([`Tags`]) and a [`Binding`]: the field's
//! kind together with the closures that read and write it on the record.
//!
//! ```
//! use std::sync::OnceLock;
//! use flatrecord::{Record, Schema};
//!
//! #[derive(Debug, Default)]
//! struct Employee {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl Record for Employee {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<Employee>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::<Employee>::new()
//!                 .unsigned("id", "0-6", |r| r.id, |r, v| r.id = v)
//!                 .text("name", "6-20", |r| r.name.clone(), |r, v| r.name = v)
//!         })
//!     }
//! }
//! ```

use super::report::DecodeReport;
use crate::Result;
use crate::config::CodecConfig;
use chrono::NaiveDateTime;
use std::fmt;
use std::marker::PhantomData;

/// A record type with a statically known schema
pub trait Record: Default + 'static {
    fn schema() -> &'static Schema<Self>;
}

/// Raw position annotations of a field.
///
/// `fixed` is used by the fixed-width codec (`"<begin>-<end>[,<format>]"` or
/// `raw`), `csv` by the delimited decoder (`"<ordinal>"` or `raw`) and `split`
/// gives the sub-delimiter of a nested delimited record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    fixed: Option<String>,
    csv: Option<String>,
    split: Option<String>,
}

impl Tags {
    /// No annotation at all; the field is skipped in both directions
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fixed(tag: impl Into<String>) -> Self {
        Self {
            fixed: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn csv(tag: impl Into<String>) -> Self {
        Self {
            csv: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn with_fixed(mut self, tag: impl Into<String>) -> Self {
        self.fixed = Some(tag.into());
        self
    }

    pub fn with_csv(mut self, tag: impl Into<String>) -> Self {
        self.csv = Some(tag.into());
        self
    }

    pub fn with_split(mut self, separator: impl Into<String>) -> Self {
        self.split = Some(separator.into());
        self
    }

    pub fn fixed_tag(&self) -> Option<&str> {
        self.fixed.as_deref()
    }

    pub fn csv_tag(&self) -> Option<&str> {
        self.csv.as_deref()
    }

    pub fn split_tag(&self) -> Option<&str> {
        self.split.as_deref().filter(|s| !s.is_empty())
    }
}

impl From<&str> for Tags {
    fn from(tag: &str) -> Self {
        Tags::fixed(tag)
    }
}

impl From<String> for Tags {
    fn from(tag: String) -> Self {
        Tags::fixed(tag)
    }
}

type Getter<R, T> = Box<dyn Fn(&R) -> T + Send + Sync>;
type Setter<R, T> = Box<dyn Fn(&mut R, T) + Send + Sync>;

/// Reads and writes one value of type `T` on a record `R`
pub struct Accessor<R, T> {
    get: Getter<R, T>,
    set: Setter<R, T>,
}

impl<R, T> Accessor<R, T> {
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&R) -> T + Send + Sync + 'static,
        S: Fn(&mut R, T) + Send + Sync + 'static,
    {
        Self {
            get: Box::new(get),
            set: Box::new(set),
        }
    }

    pub fn get(&self, record: &R) -> T {
        (self.get)(record)
    }

    pub fn set(&self, record: &mut R, value: T) {
        (self.set)(record, value)
    }
}

/// Bit width of an integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(IntWidth::W8),
            16 => Some(IntWidth::W16),
            32 => Some(IntWidth::W32),
            64 => Some(IntWidth::W64),
            _ => None,
        }
    }

    pub fn fits_signed(self, value: i64) -> bool {
        match self {
            IntWidth::W8 => i8::try_from(value).is_ok(),
            IntWidth::W16 => i16::try_from(value).is_ok(),
            IntWidth::W32 => i32::try_from(value).is_ok(),
            IntWidth::W64 => true,
        }
    }

    pub fn fits_unsigned(self, value: u64) -> bool {
        match self {
            IntWidth::W8 => u8::try_from(value).is_ok(),
            IntWidth::W16 => u16::try_from(value).is_ok(),
            IntWidth::W32 => u32::try_from(value).is_ok(),
            IntWidth::W64 => true,
        }
    }
}

/// Signed integer types usable as record fields
pub trait SignedField: Copy + Into<i64> + TryFrom<i64> + Send + Sync + 'static {
    const WIDTH: IntWidth;
}

/// Unsigned integer types usable as record fields
pub trait UnsignedField: Copy + Into<u64> + TryFrom<u64> + Send + Sync + 'static {
    const WIDTH: IntWidth;
}

macro_rules! int_field {
    ($trait:ident: $($ty:ty => $width:ident),*) => {
        $(impl $trait for $ty {
            const WIDTH: IntWidth = IntWidth::$width;
        })*
    };
}

int_field!(SignedField: i8 => W8, i16 => W16, i32 => W32, i64 => W64);
int_field!(UnsignedField: u8 => W8, u16 => W16, u32 => W32, u64 => W64);

/// Kind-erased view of a field, used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    Signed(IntWidth),
    Unsigned(IntWidth),
    Float32,
    Float64,
    Text,
    Timestamp,
    Nested,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Boolean => write!(f, "bool"),
            FieldKind::Signed(width) => write!(f, "i{}", width.bits()),
            FieldKind::Unsigned(width) => write!(f, "u{}", width.bits()),
            FieldKind::Float32 => write!(f, "f32"),
            FieldKind::Float64 => write!(f, "f64"),
            FieldKind::Text => write!(f, "text"),
            FieldKind::Timestamp => write!(f, "timestamp"),
            FieldKind::Nested => write!(f, "record"),
        }
    }
}

/// A field's kind and the closures bound to it
pub enum Binding<R> {
    Boolean(Accessor<R, bool>),
    Signed(IntWidth, Accessor<R, i64>),
    Unsigned(IntWidth, Accessor<R, u64>),
    Float32(Accessor<R, f32>),
    Float64(Accessor<R, f64>),
    Text(Accessor<R, String>),
    Timestamp(Accessor<R, NaiveDateTime>),
    Nested(Box<dyn NestedCodec<R>>),
}

impl<R> Binding<R> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Binding::Boolean(_) => FieldKind::Boolean,
            Binding::Signed(width, _) => FieldKind::Signed(*width),
            Binding::Unsigned(width, _) => FieldKind::Unsigned(*width),
            Binding::Float32(_) => FieldKind::Float32,
            Binding::Float64(_) => FieldKind::Float64,
            Binding::Text(_) => FieldKind::Text,
            Binding::Timestamp(_) => FieldKind::Timestamp,
            Binding::Nested(_) => FieldKind::Nested,
        }
    }
}

/// How the codec recurses into a nested record held by `R`.
///
/// Implemented for statically typed nested records by [`Schema::nested`];
/// runtime layouts provide their own implementation.
pub trait NestedCodec<R>: Send + Sync {
    /// Width of the nested record's own line
    fn line_length(&self) -> usize;

    /// Decode `text` into a fresh nested record and store it on `record`
    fn decode_fixed(&self, record: &mut R, text: &str, config: &CodecConfig) -> DecodeReport;

    /// Delimited counterpart of [`NestedCodec::decode_fixed`]
    fn decode_delimited(
        &self,
        record: &mut R,
        text: &str,
        separator: &str,
        config: &CodecConfig,
    ) -> DecodeReport;

    /// Encode the nested record held by `record` into its own line
    fn encode_fixed(&self, record: &R, config: &CodecConfig) -> Result<String>;
}

struct NestedField<R, N, G, S> {
    get: G,
    set: S,
    _marker: PhantomData<fn(&R) -> N>,
}

impl<R, N, G, S> NestedCodec<R> for NestedField<R, N, G, S>
where
    N: Record,
    G: Fn(&R) -> &N + Send + Sync,
    S: Fn(&mut R, N) + Send + Sync,
{
    fn line_length(&self) -> usize {
        super::length::line_length(N::schema())
    }

    fn decode_fixed(&self, record: &mut R, text: &str, config: &CodecConfig) -> DecodeReport {
        let mut nested = N::default();
        let report = super::decode::decode_fixed(N::schema(), text, &mut nested, config);
        (self.set)(record, nested);
        report
    }

    fn decode_delimited(
        &self,
        record: &mut R,
        text: &str,
        separator: &str,
        config: &CodecConfig,
    ) -> DecodeReport {
        let mut nested = N::default();
        let report =
            super::decode::decode_delimited(N::schema(), text, separator, &mut nested, config);
        (self.set)(record, nested);
        report
    }

    fn encode_fixed(&self, record: &R, config: &CodecConfig) -> Result<String> {
        super::encode::encode_fixed(N::schema(), (self.get)(record), config)
    }
}

/// One field descriptor
pub struct Field<R> {
    name: String,
    tags: Tags,
    binding: Binding<R>,
}

impl<R> Field<R> {
    pub fn new(name: impl Into<String>, tags: impl Into<Tags>, binding: Binding<R>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into(),
            binding,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn binding(&self) -> &Binding<R> {
        &self.binding
    }

    pub fn kind(&self) -> FieldKind {
        self.binding.kind()
    }
}

/// Ordered list of field descriptors for records of type `R`
pub struct Schema<R> {
    fields: Vec<Field<R>>,
}

impl<R> Default for Schema<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Schema<R> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_named(&self, name: &str) -> Option<&Field<R>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Append an already built field descriptor
    pub fn field(mut self, field: Field<R>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: Field<R>) {
        self.fields.push(field);
    }
}

impl<R: 'static> Schema<R> {
    pub fn boolean<G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        G: Fn(&R) -> bool + Send + Sync + 'static,
        S: Fn(&mut R, bool) + Send + Sync + 'static,
    {
        self.field(Field::new(
            name,
            tags,
            Binding::Boolean(Accessor::new(get, set)),
        ))
    }

    pub fn signed<T, G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        T: SignedField,
        G: Fn(&R) -> T + Send + Sync + 'static,
        S: Fn(&mut R, T) + Send + Sync + 'static,
    {
        let accessor = Accessor::<R, i64>::new(
            move |r: &R| get(r).into(),
            move |r: &mut R, v: i64| {
                if let Ok(v) = T::try_from(v) {
                    set(r, v)
                }
            },
        );
        self.field(Field::new(name, tags, Binding::Signed(T::WIDTH, accessor)))
    }

    pub fn unsigned<T, G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        T: UnsignedField,
        G: Fn(&R) -> T + Send + Sync + 'static,
        S: Fn(&mut R, T) + Send + Sync + 'static,
    {
        let accessor = Accessor::<R, u64>::new(
            move |r: &R| get(r).into(),
            move |r: &mut R, v: u64| {
                if let Ok(v) = T::try_from(v) {
                    set(r, v)
                }
            },
        );
        self.field(Field::new(
            name,
            tags,
            Binding::Unsigned(T::WIDTH, accessor),
        ))
    }

    pub fn float32<G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        G: Fn(&R) -> f32 + Send + Sync + 'static,
        S: Fn(&mut R, f32) + Send + Sync + 'static,
    {
        self.field(Field::new(
            name,
            tags,
            Binding::Float32(Accessor::new(get, set)),
        ))
    }

    pub fn float64<G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        G: Fn(&R) -> f64 + Send + Sync + 'static,
        S: Fn(&mut R, f64) + Send + Sync + 'static,
    {
        self.field(Field::new(
            name,
            tags,
            Binding::Float64(Accessor::new(get, set)),
        ))
    }

    pub fn text<G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        G: Fn(&R) -> String + Send + Sync + 'static,
        S: Fn(&mut R, String) + Send + Sync + 'static,
    {
        self.field(Field::new(name, tags, Binding::Text(Accessor::new(get, set))))
    }

    pub fn timestamp<G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        G: Fn(&R) -> NaiveDateTime + Send + Sync + 'static,
        S: Fn(&mut R, NaiveDateTime) + Send + Sync + 'static,
    {
        self.field(Field::new(
            name,
            tags,
            Binding::Timestamp(Accessor::new(get, set)),
        ))
    }

    /// A nested record owned by value
    pub fn nested<N, G, S>(self, name: &str, tags: impl Into<Tags>, get: G, set: S) -> Self
    where
        N: Record,
        G: Fn(&R) -> &N + Send + Sync + 'static,
        S: Fn(&mut R, N) + Send + Sync + 'static,
    {
        let codec = NestedField {
            get,
            set,
            _marker: PhantomData,
        };
        self.field(Field::new(name, tags, Binding::Nested(Box::new(codec))))
    }
}
