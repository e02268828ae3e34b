use core::fmt::{Display, Formatter};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single value in a row of a query result table.
///
/// The query engine returns cells as loosely typed JSON. Numbers that fit in an `i64` are kept as
/// integers, everything else numeric becomes a 64-bit float. `Float32` never comes off the wire;
/// it exists for executors that produce narrower floats natively.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Float32(f32),
    Text(String),

    /// Arrays and objects (`dynamic` columns in KQL).
    Dynamic(Value),
}

impl Cell {
    /// Name of the runtime type of this cell, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int64",
            Self::Float(_) => "float64",
            Self::Float32(_) => "float32",
            Self::Text(_) => "string",
            Self::Dynamic(_) => "dynamic",
        }
    }

    /// Returns the string content if this is a `Text` cell.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or_else(|| Self::Text(n.to_string())),
            Value::String(s) => Self::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => Self::Dynamic(other),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Cell {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Dynamic(v) => write!(f, "{v}"),
        }
    }
}
