//! Field and row types shared by the dialect and the exporter.

use serde_json::{Number, Value};

/// One cell value: a number (emitted verbatim) or text (quoted on output).
///
/// The variant is fixed when the field is built, never inferred from the
/// content: `Field::from("42")` is text and renders quoted, while
/// `Field::from(42)` renders as a bare `42`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Number(Number),
    Text(String),
}

/// One ordered record of fields destined for one output line.
pub type Row = Vec<Field>;

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Field::Number(Number::from(v))
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Number(Number::from(v))
    }
}

impl From<u64> for Field {
    fn from(v: u64) -> Self {
        Field::Number(Number::from(v))
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        // NaN and infinities have no JSON number form; keep their text shape.
        match Number::from_f64(v) {
            Some(n) => Field::Number(n),
            None => Field::Text(v.to_string()),
        }
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::Text(v.to_string())
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::Text(v)
    }
}

impl From<bool> for Field {
    fn from(v: bool) -> Self {
        Field::Text(v.to_string())
    }
}

impl From<&Value> for Field {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => Field::Number(n.clone()),
            Value::String(s) => Field::Text(s.clone()),
            Value::Bool(b) => Field::Text(b.to_string()),
            Value::Null => Field::Text(String::new()),
            // Nested structures render as their compact JSON text.
            other => Field::Text(other.to_string()),
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => Field::Number(n),
            Value::String(s) => Field::Text(s),
            other => Field::from(&other),
        }
    }
}
