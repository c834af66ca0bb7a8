#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::{Array, Datetime, Position, Table, TableArray};
use std::fmt;

/// A single non-container TOML value.
#[derive(Clone, PartialEq)]
pub enum Scalar {
    /// `true` / `false`
    Boolean(bool),
    /// A 64-bit signed integer, from decimal, hex, octal or binary notation
    Integer(i64),
    /// A 64-bit float, including `inf` and `nan`
    Float(f64),
    /// A string with escapes already decoded
    String(String),
    /// An offset date-time normalized to UTC
    Datetime(Datetime),
}

impl Scalar {
    /// Returns the [`ValueKind`] of this scalar.
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::Boolean(_) => ValueKind::Boolean,
            Scalar::Integer(_) => ValueKind::Integer,
            Scalar::Float(_) => ValueKind::Float,
            Scalar::String(_) => ValueKind::String,
            Scalar::Datetime(_) => ValueKind::Datetime,
        }
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => b.fmt(f),
            Scalar::Integer(i) => i.fmt(f),
            Scalar::Float(v) => v.fmt(f),
            Scalar::String(s) => s.fmt(f),
            Scalar::Datetime(dt) => dt.fmt(f),
        }
    }
}

/// The kind of a [`Value`], used to keep arrays homogeneous.
///
/// Table arrays report [`ValueKind::Array`], so an array whose elements are
/// themselves arrays (of any content) is homogeneous.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ValueKind {
    Boolean,
    Integer,
    Float,
    String,
    Datetime,
    Array,
    Table,
}

impl ValueKind {
    /// Lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Datetime => "datetime",
            ValueKind::Array => "array",
            ValueKind::Table => "table",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parsed tree.
///
/// Equality is structural: positions are ignored, and tables compare as
/// unordered maps, so an array of inline tables equals the table array
/// declared with `[[header]]` sections.
#[derive(Clone)]
pub enum Value {
    /// A scalar and the position of its literal
    Scalar(Scalar, Position),
    /// A homogeneous array of values
    Array(Array),
    /// A `[table]` section, an inline table, or an implicitly created table
    Table(Table),
    /// A `[[table]]` array or an array of inline tables
    TableArray(TableArray),
}

impl Value {
    /// Returns the [`ValueKind`] of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(s, _) => s.kind(),
            Value::Array(_) | Value::TableArray(_) => ValueKind::Array,
            Value::Table(_) => ValueKind::Table,
        }
    }

    /// Returns the position where this value starts.
    pub fn position(&self) -> Position {
        match self {
            Value::Scalar(_, position) => *position,
            Value::Array(a) => a.position(),
            Value::Table(t) => t.position(),
            Value::TableArray(a) => a.position(),
        }
    }

    /// Returns the scalar payload, if this is a scalar.
    #[inline]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s, _) => Some(s),
            _ => None,
        }
    }

    /// Returns a borrowed string if this is a string value.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s), _) => Some(s),
            _ => None,
        }
    }

    /// Returns an `i64` if this is an integer value.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Integer(i), _) => Some(*i),
            _ => None,
        }
    }

    /// Returns an `f64` if this is a float value.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::Float(f), _) => Some(*f),
            _ => None,
        }
    }

    /// Returns a `bool` if this is a boolean value.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Boolean(b), _) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date-time if this is a date-time value.
    #[inline]
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Scalar(Scalar::Datetime(dt), _) => Some(dt),
            _ => None,
        }
    }

    /// Returns the array if this is a plain array.
    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the table if this is a table.
    #[inline]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns a mutable table if this is a table.
    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the table array if this is a table array.
    #[inline]
    pub fn as_table_array(&self) -> Option<&TableArray> {
        match self {
            Value::TableArray(a) => Some(a),
            _ => None,
        }
    }

    /// Returns `true` if this is a table.
    #[inline]
    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Returns `true` if this is a table array.
    #[inline]
    pub fn is_table_array(&self) -> bool {
        matches!(self, Value::TableArray(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a, _), Value::Scalar(b, _)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a == b,
            (Value::TableArray(a), Value::TableArray(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s, _) => s.fmt(f),
            Value::Array(a) => a.fmt(f),
            Value::Table(t) => t.fmt(f),
            Value::TableArray(a) => a.fmt(f),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_owned())
    }
}

impl From<Datetime> for Scalar {
    fn from(dt: Datetime) -> Self {
        Scalar::Datetime(dt)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Scalar {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Scalar::Boolean(b) => ser.serialize_bool(*b),
            Scalar::Integer(i) => ser.serialize_i64(*i),
            Scalar::Float(f) => ser.serialize_f64(*f),
            Scalar::String(s) => ser.serialize_str(s),
            Scalar::Datetime(dt) => dt.serialize(ser),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Scalar(s, _) => s.serialize(ser),
            Value::Array(a) => a.serialize(ser),
            Value::Table(t) => t.serialize(ser),
            Value::TableArray(a) => a.serialize(ser),
        }
    }
}
