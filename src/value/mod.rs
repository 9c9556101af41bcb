//! Defines the [`Value`] enum used for localization parameters.

mod from;
mod ser;

pub use std::collections::BTreeMap as Map;
use std::fmt::Write;
use std::mem;
pub use std::vec::Vec as List;

pub use crate::value::ser::to_value;

/// Localization parameter data represented as a recursive enum.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
}

impl Value {
    /// A human readable name for the value type.
    pub(crate) fn human(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Format a scalar value as substitution text. Lists and maps are not
    /// substitutable.
    pub(crate) fn as_text(&self) -> Option<String> {
        let mut s = String::new();
        match self {
            Value::None => {}
            Value::Bool(b) => write!(s, "{b}").ok()?,
            Value::Integer(n) => write!(s, "{n}").ok()?,
            Value::Float(n) => write!(s, "{n}").ok()?,
            Value::String(v) => s.push_str(v),
            Value::List(_) | Value::Map(_) => return None,
        }
        Some(s)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(s), Self::Bool(o)) => s == o,
            (Self::Integer(s), Self::Integer(o)) => s == o,
            (Self::Float(s), Self::Float(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::List(s), Self::List(o)) => s == o,
            (Self::Map(s), Self::Map(o)) => s == o,
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Eq for Value {}
