//! Output width of a record

use super::position::fixed_end;
use super::schema::{Binding, Schema};

/// Width of the line a record encodes to: the largest end column of any
/// field, nested records included.
///
/// Nested records are measured whether or not they carry an annotation of
/// their own, since their field positions count from the start of the line.
pub fn line_length<R>(schema: &Schema<R>) -> usize {
    schema
        .fields()
        .iter()
        .map(|field| {
            let own = field.tags().fixed_tag().and_then(fixed_end).unwrap_or(0);
            match field.binding() {
                Binding::Nested(nested) => own.max(nested.line_length()),
                _ => own,
            }
        })
        .max()
        .unwrap_or(0)
}
