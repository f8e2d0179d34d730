//! Schema version upgrades.
//!
//! Upgraders are plain function pointers over JSON documents. They take the
//! state as written under the prior schema version and return the state for
//! the next version. Having no context argument, they have no way to reach
//! the network.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::value::contains_unknown;

/// Transforms state from version `N` to `N + 1`.
pub type StateUpgradeFn = fn(&Json) -> std::result::Result<Json, Diagnostics>;

/// Upgraders for one resource, keyed by the version they upgrade from.
#[derive(Debug, Clone)]
pub struct UpgradeRegistry {
    current_version: i64,
    upgraders: BTreeMap<i64, StateUpgradeFn>,
}

impl UpgradeRegistry {
    /// A registry for a resource at `current_version`.
    #[must_use]
    pub fn new(current_version: i64) -> Self {
        Self {
            current_version,
            upgraders: BTreeMap::new(),
        }
    }

    /// Registers the upgrader from `prior_version` to `prior_version + 1`.
    #[must_use]
    pub fn register(mut self, prior_version: i64, upgrader: StateUpgradeFn) -> Self {
        self.upgraders.insert(prior_version, upgrader);
        self
    }

    /// The resource's current schema version.
    #[must_use]
    pub fn current_version(&self) -> i64 {
        self.current_version
    }

    /// Checks there is exactly one upgrader for each version in `0..current`.
    pub fn verify(&self, type_name: &str) -> Result<()> {
        for missing in 0..self.current_version {
            if !self.upgraders.contains_key(&missing) {
                return Err(Error::MissingUpgrader {
                    type_name: type_name.to_string(),
                    current: self.current_version,
                    missing,
                });
            }
        }
        if let Some(&version) = self.upgraders.keys().find(|&&v| v < 0 || v >= self.current_version) {
            return Err(Error::StrayUpgrader {
                type_name: type_name.to_string(),
                version,
                current: self.current_version,
            });
        }
        Ok(())
    }

    /// Runs the chain from `version` to the current version.
    ///
    /// Any error aborts the whole chain; the caller keeps the prior state.
    pub fn upgrade(&self, version: i64, state: &Json) -> std::result::Result<Json, Diagnostics> {
        if version > self.current_version {
            return Err(Diagnostics::from_error(
                "Unsupported state version",
                format!(
                    "The stored state is at schema version {version}, which is newer than this provider's version {}. Upgrade the provider.",
                    self.current_version
                ),
            ));
        }

        let mut current = state.clone();
        for from in version..self.current_version {
            let Some(upgrader) = self.upgraders.get(&from) else {
                return Err(Diagnostics::from_error(
                    "Unable to Upgrade Resource State",
                    format!("No upgrader is registered from schema version {from}. Please report this issue to the provider maintainers."),
                ));
            };
            debug!(from, to = from + 1, "Upgrading resource state");
            current = upgrader(&current)?;
        }

        if contains_unknown(&current) {
            return Err(Diagnostics::from_error(
                "Unable to Upgrade Resource State",
                "The upgraded state contains unknown values. Please report this issue to the provider maintainers.",
            ));
        }
        Ok(current)
    }
}

/// Collapses a list holding at most one object into that object.
///
/// A null or empty list becomes null.
#[must_use]
pub fn collapse_single_element_list(value: &Json) -> Json {
    match value {
        Json::Array(items) => items.first().cloned().unwrap_or(Json::Null),
        other => other.clone(),
    }
}

/// Gathers sibling fields into a nested object.
///
/// `fields` pairs the prior top-level name with the nested name. The result
/// is null when every contributing field is null.
#[must_use]
pub fn group_fields(state: &Json, fields: &[(&str, &str)]) -> Json {
    let mut nested = Map::new();
    for (from, to) in fields {
        nested.insert((*to).to_string(), state.get(*from).cloned().unwrap_or(Json::Null));
    }
    if nested.values().all(Json::is_null) {
        Json::Null
    } else {
        Json::Object(nested)
    }
}

/// Sets each named attribute to null, adding it when missing.
///
/// Used for attributes introduced by a version that have no prior source.
pub fn nullify(state: &mut Map<String, Json>, names: &[&str]) {
    for name in names {
        state.insert((*name).to_string(), Json::Null);
    }
}

/// Rekeys a set of named objects into a map keyed by `key_field`.
///
/// `transform` rewrites each element. A null or empty set becomes null;
/// duplicate names are an error since the map would silently drop one.
pub fn rekey_by_name(
    value: &Json,
    key_field: &str,
    transform: impl Fn(&Map<String, Json>) -> Map<String, Json>,
) -> std::result::Result<Json, Diagnostics> {
    let Some(items) = value.as_array().filter(|items| !items.is_empty()) else {
        return Ok(Json::Null);
    };

    let mut out = Map::new();
    for item in items {
        let Some(object) = item.as_object() else {
            return Err(Diagnostics::from_error(
                "Unable to Upgrade Resource State",
                format!("Expected an object in the set being rekeyed by \"{key_field}\". Please report this issue to the provider maintainers."),
            ));
        };
        let Some(name) = object.get(key_field).and_then(Json::as_str) else {
            return Err(Diagnostics::from_error(
                "Unable to Upgrade Resource State",
                format!("An element has no \"{key_field}\" value to key it by. Please report this issue to the provider maintainers."),
            ));
        };
        if out.contains_key(name) {
            return Err(Diagnostics::from_error(
                "Unable to Upgrade Resource State",
                format!("Duplicate \"{key_field}\" value \"{name}\"; element names must be unique."),
            ));
        }
        out.insert(name.to_string(), Json::Object(transform(object)));
    }
    Ok(Json::Object(out))
}
