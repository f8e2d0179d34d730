//! JSON documents exchanged with the host: state, plan and configuration.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json};

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::value::contains_unknown;

/// An attribute document. `None` inside means the resource does not exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    raw: Option<Json>,
}

/// A planned document; may contain unknown cells.
pub type Plan = State;

/// A configuration document as written by the user.
pub type Config = State;

impl State {
    /// Wraps a JSON object.
    #[must_use]
    pub fn new(raw: Json) -> Self {
        Self { raw: Some(raw) }
    }

    /// A document with no resource.
    #[must_use]
    pub fn removed() -> Self {
        Self { raw: None }
    }

    /// A document holding an empty object.
    #[must_use]
    pub fn empty_object() -> Self {
        Self::new(Json::Object(Map::new()))
    }

    /// Whether the document holds a resource.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.raw.is_some()
    }

    /// Marks the resource as gone.
    pub fn remove_resource(&mut self) {
        self.raw = None;
    }

    /// Borrows the raw JSON.
    #[must_use]
    pub fn raw(&self) -> Option<&Json> {
        self.raw.as_ref()
    }

    /// Consumes into the raw JSON.
    #[must_use]
    pub fn into_raw(self) -> Option<Json> {
        self.raw
    }

    /// Decodes the document into a model.
    pub fn get<M: DeserializeOwned>(&self) -> Result<M, Diagnostics> {
        let Some(raw) = &self.raw else {
            return Err(Diagnostics::from_error(
                "Value Conversion Error",
                "Expected a resource document but none was present. Please report this issue to the provider maintainers.",
            ));
        };
        serde_json::from_value(raw.clone()).map_err(|e| {
            Diagnostics::from_error(
                "Value Conversion Error",
                format!("An unexpected error was encountered trying to convert the document into the resource model: {e}. Please report this issue to the provider maintainers."),
            )
        })
    }

    /// Replaces the document with an encoded model.
    pub fn set<M: Serialize>(&mut self, model: &M) -> Diagnostics {
        match serde_json::to_value(model) {
            Ok(raw) => {
                self.raw = Some(raw);
                Diagnostics::new()
            }
            Err(e) => Diagnostics::from_error(
                "Value Conversion Error",
                format!("An unexpected error was encountered trying to convert the resource model into a document: {e}. Please report this issue to the provider maintainers."),
            ),
        }
    }

    /// Reads one attribute.
    #[must_use]
    pub fn get_attribute(&self, path: &AttributePath) -> Option<&Json> {
        self.raw.as_ref().and_then(|raw| path.get(raw))
    }

    /// Decodes one attribute into a typed value; missing decodes from `null`.
    pub fn get_attribute_as<T: DeserializeOwned>(&self, path: &AttributePath) -> Result<T, Diagnostics> {
        let raw = self.get_attribute(path).cloned().unwrap_or(Json::Null);
        serde_json::from_value(raw).map_err(|e| {
            let mut diags = Diagnostics::new();
            diags.add_attribute_error(path.clone(), "Value Conversion Error", e.to_string());
            diags
        })
    }

    /// Writes one attribute, creating the document if needed.
    pub fn set_attribute<T: Serialize>(&mut self, path: &AttributePath, value: &T) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let encoded = match serde_json::to_value(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                diags.add_attribute_error(path.clone(), "Value Conversion Error", e.to_string());
                return diags;
            }
        };
        let raw = self.raw.get_or_insert_with(|| Json::Object(Map::new()));
        if !path.set(raw, encoded) {
            diags.add_attribute_error(
                path.clone(),
                "Invalid Attribute Path",
                format!("Cannot set {path}: an enclosing value is not an object or list."),
            );
        }
        diags
    }

    /// Whether any cell is unknown.
    #[must_use]
    pub fn has_unknown(&self) -> bool {
        self.raw.as_ref().is_some_and(contains_unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Model {
        #[serde(default)]
        id: Value<String>,
        #[serde(default)]
        name: Value<String>,
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut state = State::empty_object();
        let model = Model {
            id: Value::string("abc"),
            name: Value::Null,
        };
        assert!(state.set(&model).is_empty());
        assert_eq!(state.raw(), Some(&json!({"id": "abc", "name": null})));
        assert_eq!(state.get::<Model>().unwrap(), model);
    }

    #[test]
    fn test_removed_document() {
        let mut state = State::new(json!({"id": "x"}));
        state.remove_resource();
        assert!(!state.is_present());
        assert!(state.get::<Model>().unwrap_err().has_error());
    }

    #[test]
    fn test_attribute_access() {
        let mut state = State::new(json!({"country_limit": {"type": "NONE"}}));
        let path = AttributePath::new("country_limit").attribute("delivery_methods");
        assert!(state.set_attribute(&path, &Value::<Vec<String>>::Null).is_empty());
        assert_eq!(state.get_attribute(&path), Some(&Json::Null));

        let kind: Value<String> = state
            .get_attribute_as(&AttributePath::new("country_limit").attribute("type"))
            .unwrap();
        assert_eq!(kind, Value::string("NONE"));
    }

    #[test]
    fn test_has_unknown() {
        let state = State::new(json!({"id": crate::UNKNOWN_SENTINEL}));
        assert!(state.has_unknown());
        assert!(!State::new(json!({"id": "x"})).has_unknown());
    }
}
