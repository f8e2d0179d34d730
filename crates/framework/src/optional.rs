//! Request-side optional fields.
//!
//! An API request field has three meaningful states: left out of the body,
//! sent as JSON `null`, or sent with a value. [`Optional`] keeps all three
//! apart so a resource can clear a field on update without also clearing
//! fields the user never configured.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// An absent, explicit-null or present request field.
///
/// Pair with `#[serde(default, skip_serializing_if = "Optional::is_absent")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Optional<T> {
    /// Not sent
    Absent,
    /// Sent as `null`
    Null,
    /// Sent with a value
    Present(T),
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::Absent
    }
}

/// What to send for a known but empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    /// Leave the field out
    #[default]
    Omit,
    /// Send `""`
    Send,
    /// Send `null` to clear the server-side value
    Clear,
}

impl<T> Optional<T> {
    /// Whether the field is left out.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrows the present value.
    pub const fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes into the present value.
    pub fn into_present(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Builds a field from a state cell: null and unknown are not sent.
    pub fn from_value(value: Value<T>) -> Self {
        match value {
            Value::Known(value) => Self::Present(value),
            Value::Null | Value::Unknown => Self::Absent,
        }
    }

    /// Builds a clearing field: null becomes `null`, unknown is not sent.
    pub fn from_value_clearing(value: Value<T>) -> Self {
        match value {
            Value::Known(value) => Self::Present(value),
            Value::Null => Self::Null,
            Value::Unknown => Self::Absent,
        }
    }

    /// Converts an API response field back into a state cell.
    pub fn into_value(self) -> Value<T> {
        match self {
            Self::Present(value) => Value::Known(value),
            Self::Absent | Self::Null => Value::Null,
        }
    }
}

impl Optional<String> {
    /// Builds a string field, applying `policy` to a known empty string.
    pub fn from_string_value(value: Value<String>, policy: EmptyPolicy) -> Self {
        match value {
            Value::Known(s) if s.is_empty() => match policy {
                EmptyPolicy::Omit => Self::Absent,
                EmptyPolicy::Send => Self::Present(s),
                EmptyPolicy::Clear => Self::Null,
            },
            other => Self::from_value(other),
        }
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(value) => value.serialize(serializer),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Present))
    }
}
