//! The process-wide decimal-comma toggle
//!
//! Kept in its own test binary: the toggle is global state and would race
//! with other tests running in parallel.

use flatrecord::{Record, Schema, decimal_comma, marshal, set_decimal_comma, unmarshal};
use std::sync::OnceLock;

#[derive(Debug, Default, PartialEq)]
struct Reading {
    value: f64,
}

impl Record for Reading {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Reading>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Reading>::new().float64("value", "0-8,2", |r| r.value, |r, v| r.value = v)
        })
    }
}

#[test]
fn test_global_decimal_comma_toggle() {
    assert!(!decimal_comma());
    assert_eq!(marshal(&Reading { value: 12.87 }).unwrap(), "00012.87");

    set_decimal_comma(true);
    assert!(decimal_comma());
    assert_eq!(marshal(&Reading { value: 12.87 }).unwrap(), "00012,87");

    let mut reading = Reading::default();
    assert!(unmarshal("00012,87", &mut reading).is_complete());
    assert_eq!(reading.value, 12.87);

    set_decimal_comma(false);
    let mut reading = Reading::default();
    assert!(!unmarshal("00012,87", &mut reading).is_complete());
    assert_eq!(reading.value, 0.0);
}
