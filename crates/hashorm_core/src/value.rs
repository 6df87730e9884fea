//! Column kinds and typed values.
//!
//! A [`Kind`] is the declared type of a column; a [`Value`] is one
//! typed value held by an entity. Together they form the adapter
//! layer between raw stored strings and typed column values: `Kind`
//! constructs a `Value` from a stored string, and `Value` serializes
//! itself back to a storable string.

use crate::error::AdapterError;
use std::cmp::Ordering;
use std::fmt;

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// UTF-8 text.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Boolean.
    Boolean,
    /// Opaque JSON document.
    Json,
}

impl Kind {
    /// Returns whether values of this kind have a total order.
    ///
    /// Only orderable kinds may back a primary-key column; the sorted
    /// view of a repository is ordered by this comparison.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        matches!(self, Self::Text | Self::Integer | Self::Float)
    }

    /// Constructs a [`Value`] of this kind from its stored string form.
    ///
    /// This is the adapter's construct direction; it is the exact
    /// inverse of [`Value::serialize`].
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Parse`] if `raw` is not a valid
    /// rendering of this kind.
    pub fn parse(self, raw: &str) -> Result<Value, AdapterError> {
        match self {
            Self::Text => Ok(Value::Text(raw.to_owned())),
            Self::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| AdapterError::parse(self, raw)),
            Self::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| AdapterError::parse(self, raw)),
            Self::Boolean => match raw {
                "true" | "1" => Ok(Value::Boolean(true)),
                "false" | "0" => Ok(Value::Boolean(false)),
                _ => Err(AdapterError::parse(self, raw)),
            },
            Self::Json => serde_json::from_str(raw)
                .map(Value::Json)
                .map_err(|_| AdapterError::parse(self, raw)),
        }
    }
}

/// One typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text.
    Text(String),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// Opaque JSON document.
    Json(serde_json::Value),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Text(_) => Kind::Text,
            Self::Integer(_) => Kind::Integer,
            Self::Float(_) => Kind::Float,
            Self::Boolean(_) => Kind::Boolean,
            Self::Json(_) => Kind::Json,
        }
    }

    /// Serializes this value to its stored string form.
    ///
    /// The rendering is the exact input [`Kind::parse`] accepts back:
    /// `kind.parse(&value.serialize())` reproduces `value`.
    #[must_use]
    pub fn serialize(&self) -> String {
        match self {
            Self::Text(v) => v.clone(),
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Boolean(v) => v.to_string(),
            // to_string on an already-parsed document cannot fail
            Self::Json(v) => v.to_string(),
        }
    }

    /// Compares two values for primary-key ordering.
    ///
    /// Defined for orderable kinds; floats use `f64::total_cmp`.
    /// Values of differing kinds (which a valid schema never produces
    /// in one column) fall back to comparing serialized forms.
    #[must_use]
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (a, b) => a.serialize().cmp(&b.serialize()),
        }
    }

    /// Returns the text content, if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the integer content, if this is a [`Value::Integer`].
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float content, if this is a [`Value::Float`].
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a [`Value::Boolean`].
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the JSON content, if this is a [`Value::Json`].
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}
