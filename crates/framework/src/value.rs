//! The tri-state value cell.
//!
//! Every attribute in a plan or state is one of null, unknown or a known
//! value. `Value<T>` models that cell for any `T` and serialises it into the
//! JSON state document the host exchanges: null is JSON `null`, unknown is the
//! host's sentinel string, and a known value is the value itself.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as Json;

/// Sentinel the host uses for an unknown value in JSON-encoded documents.
pub const UNKNOWN_SENTINEL: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// A null, unknown or known cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value<T> {
    /// Explicitly absent
    Null,
    /// Not yet known; only valid in plans
    Unknown,
    /// A concrete value
    Known(T),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> Value<T> {
    /// Known cell holding `value`.
    pub const fn known(value: T) -> Self {
        Self::Known(value)
    }

    /// Null when `None`, known otherwise.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }

    /// Whether the cell is null.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the cell is unknown.
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether the cell holds a value.
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrows the known value.
    pub const fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the cell; null and unknown both become `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Maps the known value, leaving null and unknown untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Value<U> {
        match self {
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
            Self::Known(value) => Value::Known(f(value)),
        }
    }

    /// Borrowing view of the cell.
    pub const fn as_ref(&self) -> Value<&T> {
        match self {
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
            Self::Known(value) => Value::Known(value),
        }
    }
}

impl<T: Clone> Value<T> {
    /// Clones the known value out; null and unknown both become `None`.
    pub fn to_option(&self) -> Option<T> {
        self.as_known().cloned()
    }
}

impl Value<String> {
    /// Known string cell.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Known(value.into())
    }

    /// The known string, or `""` when null or unknown.
    pub fn value_str(&self) -> &str {
        self.as_known().map_or("", String::as_str)
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
            Self::Known(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Json::deserialize(deserializer)?;
        match raw {
            Json::Null => Ok(Self::Null),
            Json::String(ref s) if s == UNKNOWN_SENTINEL => Ok(Self::Unknown),
            other => serde_json::from_value(other).map(Self::Known).map_err(D::Error::custom),
        }
    }
}

/// The JSON encoding of an unknown cell.
#[must_use]
pub fn unknown_json() -> Json {
    Json::String(UNKNOWN_SENTINEL.to_string())
}

/// Whether a JSON cell is the unknown sentinel.
#[must_use]
pub fn is_unknown_json(value: &Json) -> bool {
    value.as_str() == Some(UNKNOWN_SENTINEL)
}

/// Whether an unknown cell appears anywhere within `value`.
#[must_use]
pub fn contains_unknown(value: &Json) -> bool {
    match value {
        Json::String(_) => is_unknown_json(value),
        Json::Array(items) => items.iter().any(contains_unknown),
        Json::Object(fields) => fields.values().any(contains_unknown),
        _ => false,
    }
}
