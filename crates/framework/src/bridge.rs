//! Conversions between API optional fields and tri-state cells.
//!
//! API models carry optional fields as `Option<T>`; state models carry
//! [`Value<T>`]. The `*_ok_to_tf` family goes from the former to the latter
//! with one rule: a missing field becomes a typed null, a present field
//! becomes a known value (including empty strings and empty collections).
//! `string_to_tf` is the one exception and is meant for identifier-style
//! fields where the API uses `""` to mean "none".
//!
//! The reverse direction lives on [`Value`] and [`crate::Optional`]; unknown
//! always means "do not set".

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::value::Value;

/// String field; `None` is null and `Some("")` stays known.
#[must_use]
pub fn string_ok_to_tf(value: Option<&str>) -> Value<String> {
    Value::from_option(value.map(str::to_string))
}

/// String field where the empty string means null.
#[must_use]
pub fn string_to_tf(value: &str) -> Value<String> {
    if value.is_empty() {
        Value::Null
    } else {
        Value::Known(value.to_string())
    }
}

/// Boolean field.
#[must_use]
pub fn bool_ok_to_tf(value: Option<bool>) -> Value<bool> {
    Value::from_option(value)
}

/// 32-bit integer field, widened to the 64-bit state type.
#[must_use]
pub fn int32_ok_to_tf(value: Option<i32>) -> Value<i64> {
    Value::from_option(value.map(i64::from))
}

/// 64-bit integer field.
#[must_use]
pub fn int64_ok_to_tf(value: Option<i64>) -> Value<i64> {
    Value::from_option(value)
}

/// Floating point field.
#[must_use]
pub fn float64_ok_to_tf(value: Option<f64>) -> Value<f64> {
    Value::from_option(value)
}

/// Timestamp field, rendered as an RFC3339 UTC string.
#[must_use]
pub fn time_ok_to_tf(value: Option<&DateTime<Utc>>) -> Value<String> {
    Value::from_option(value.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
}

/// Enumeration field, stringified.
#[must_use]
pub fn enum_ok_to_tf<E: AsRef<str>>(value: Option<&E>) -> Value<String> {
    Value::from_option(value.map(|e| e.as_ref().to_string()))
}

/// Ordered list field; an empty slice is a known empty list.
#[must_use]
pub fn list_ok_to_tf<T: Clone>(value: Option<&[T]>) -> Value<Vec<T>> {
    Value::from_option(value.map(<[T]>::to_vec))
}

/// Unordered set field; an empty slice is a known empty set.
#[must_use]
pub fn set_ok_to_tf<T: Ord + Clone>(value: Option<&[T]>) -> Value<BTreeSet<T>> {
    Value::from_option(value.map(|items| items.iter().cloned().collect()))
}

/// Set of enumeration values, stringified.
#[must_use]
pub fn enum_set_ok_to_tf<E: AsRef<str>>(value: Option<&[E]>) -> Value<BTreeSet<String>> {
    Value::from_option(value.map(|items| items.iter().map(|e| e.as_ref().to_string()).collect()))
}

/// String-keyed map field. Entries are always known; there are no per-key nulls.
#[must_use]
pub fn map_ok_to_tf<V: Clone>(value: Option<&BTreeMap<String, V>>) -> Value<BTreeMap<String, V>> {
    Value::from_option(value.cloned())
}

/// Nested object field; `f` builds the nested state model.
pub fn object_ok_to_tf<S, M>(value: Option<&S>, f: impl FnOnce(&S) -> M) -> Value<M> {
    Value::from_option(value.map(f))
}

/// Collects the elements of a list or set cell whose elements are themselves
/// tri-state, rejecting unknown and null elements.
///
/// Returns `Ok(None)` when the collection itself is null or unknown.
pub fn elements_to_vec<'a, T, I>(
    cell: &'a Value<I>,
    path: &AttributePath,
) -> Result<Option<Vec<T>>, Diagnostics>
where
    T: Clone + 'a,
    &'a I: IntoIterator<Item = &'a Value<T>>,
{
    let Some(items) = cell.as_known() else {
        return Ok(None);
    };

    let mut diags = Diagnostics::new();
    let mut out = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Known(value) => out.push(value.clone()),
            Value::Unknown => diags.add_attribute_error(
                path.clone().index(index),
                "Unexpected unknown slice value",
                "An unknown value was found in the collection. Please report this to the provider maintainers.",
            ),
            Value::Null => diags.add_attribute_error(
                path.clone().index(index),
                "Unexpected null slice value",
                "A null value was found in the collection. Please report this to the provider maintainers.",
            ),
        }
    }

    if diags.has_error() { Err(diags) } else { Ok(Some(out)) }
}

/// Known set contents as a vector in set order.
#[must_use]
pub fn set_to_vec<T: Clone>(cell: &Value<BTreeSet<T>>) -> Option<Vec<T>> {
    cell.as_known().map(|set| set.iter().cloned().collect())
}

/// Parses a known RFC3339 cell back into a timestamp.
pub fn time_from_tf(
    cell: &Value<String>,
    path: &AttributePath,
) -> Result<Option<DateTime<Utc>>, Diagnostics> {
    let Some(raw) = cell.as_known() else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| {
            let mut diags = Diagnostics::new();
            diags.add_attribute_error(
                path.clone(),
                "Invalid timestamp",
                format!("Expected an RFC3339 timestamp, got \"{raw}\": {e}"),
            );
            diags
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optional::Optional;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Colour {
        Red,
    }

    impl AsRef<str> for Colour {
        fn as_ref(&self) -> &str {
            match self {
                Self::Red => "RED",
            }
        }
    }

    #[test]
    fn test_null_rules() {
        assert_eq!(string_ok_to_tf(None), Value::Null);
        assert_eq!(string_ok_to_tf(Some("")), Value::string(""));
        assert_eq!(string_to_tf(""), Value::Null);
        assert_eq!(string_to_tf("abc"), Value::string("abc"));
        assert_eq!(int32_ok_to_tf(Some(7)), Value::Known(7_i64));
        assert_eq!(enum_ok_to_tf(Some(&Colour::Red)), Value::string("RED"));
        assert_eq!(list_ok_to_tf::<String>(None), Value::Null);
        assert_eq!(list_ok_to_tf::<String>(Some(&[])), Value::Known(vec![]));
        assert_eq!(set_ok_to_tf::<String>(Some(&[])), Value::Known(BTreeSet::new()));
        assert_eq!(map_ok_to_tf::<String>(None), Value::Null);
    }

    #[test]
    fn test_time_is_rfc3339_utc() {
        let t = DateTime::parse_from_rfc3339("2024-02-03T04:05:06+02:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(time_ok_to_tf(Some(&t)), Value::string("2024-02-03T02:05:06Z"));
    }

    #[test]
    fn test_set_dedupes_and_orders() {
        let cell = set_ok_to_tf(Some(&["SMS".to_string(), "Voice".to_string(), "SMS".to_string()]));
        assert_eq!(set_to_vec(&cell), Some(vec!["SMS".to_string(), "Voice".to_string()]));
    }

    #[test]
    fn test_enum_set() {
        let cell = enum_set_ok_to_tf(Some(&[Colour::Red]));
        assert_eq!(cell, Value::Known(BTreeSet::from(["RED".to_string()])));
    }

    #[test]
    fn test_object_recurses_on_known_only() {
        let cell = object_ok_to_tf(Some(&3), |v| v * 2);
        assert_eq!(cell, Value::Known(6));
        let cell = object_ok_to_tf(None::<&i32>, |v| v * 2);
        assert_eq!(cell, Value::Null);
    }

    #[test]
    fn test_elements_reject_unknown_and_null() {
        let path = AttributePath::new("included_tags");
        let cell = Value::Known(vec![Value::string("a"), Value::Unknown, Value::Null]);
        let err = elements_to_vec(&cell, &path).unwrap_err();
        let summaries: Vec<_> = err.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, ["Unexpected unknown slice value", "Unexpected null slice value"]);
        assert_eq!(err.iter().next().unwrap().path, Some(path.clone().index(1)));

        let cell = Value::Known(vec![Value::string("a")]);
        assert_eq!(elements_to_vec(&cell, &path).unwrap(), Some(vec!["a".to_string()]));
        let cell: Value<Vec<Value<String>>> = Value::Unknown;
        assert_eq!(elements_to_vec(&cell, &path).unwrap(), None);
    }

    #[test]
    fn test_time_from_tf_reports_path() {
        let path = AttributePath::new("expires_at");
        let diags = time_from_tf(&Value::string("yesterday"), &path).unwrap_err();
        assert_eq!(diags.iter().next().unwrap().path, Some(path));
    }

    proptest! {
        #[test]
        fn prop_string_round_trip(s in ".*") {
            let state = Value::string(s.clone());
            let field = Optional::from_value(state.clone());
            prop_assert_eq!(string_ok_to_tf(field.as_present().map(String::as_str)), state);
        }

        #[test]
        fn prop_int32_round_trip(n in any::<i32>()) {
            let state = Value::Known(i64::from(n));
            let field = Optional::from_value(state.clone()).into_present().map(|v| i32::try_from(v).unwrap());
            prop_assert_eq!(int32_ok_to_tf(field), state);
        }

        #[test]
        fn prop_bool_round_trip(b in any::<bool>()) {
            let state = Value::Known(b);
            prop_assert_eq!(bool_ok_to_tf(Optional::from_value(state.clone()).into_present()), state);
        }

        #[test]
        fn prop_time_round_trip(secs in 0_i64..4_000_000_000) {
            let t = DateTime::from_timestamp(secs, 0).unwrap();
            let state = time_ok_to_tf(Some(&t));
            let back = time_from_tf(&state, &AttributePath::new("t")).unwrap();
            prop_assert_eq!(time_ok_to_tf(back.as_ref()), state);
        }

        #[test]
        fn prop_set_round_trip(items in proptest::collection::btree_set("[a-z]{1,8}", 0..8)) {
            let state = Value::Known(items);
            let api = set_to_vec(&state);
            prop_assert_eq!(set_ok_to_tf(api.as_deref()), state);
        }

        #[test]
        fn prop_bridge_never_yields_unknown(s in proptest::option::of(".*")) {
            prop_assert!(!string_ok_to_tf(s.as_deref()).is_unknown());
        }
    }
}
