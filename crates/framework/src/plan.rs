//! Proposed new state computation.
//!
//! Starting from configuration, the planner fills defaults, decides what each
//! computed attribute will look like (prior value or unknown) and reports
//! which attributes force a replacement.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use crate::path::AttributePath;
use crate::schema::{Attribute, NestingMode, PlanModifier, Schema};
use crate::value::unknown_json;

static NULL: Json = Json::Null;

/// Result of planning one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChange {
    /// Proposed new state; may hold unknown cells
    pub planned: Json,
    /// Attributes whose change destroys and recreates the resource
    pub requires_replace: Vec<AttributePath>,
}

/// Plans a create (`prior` is `None`) or an update.
#[must_use]
pub fn plan_resource_change(schema: &Schema, prior: Option<&Json>, config: &Json) -> PlannedChange {
    let changed = prior.is_none_or(|prior| differs(&schema.attributes, prior, config));
    let planned = plan_object(&schema.attributes, prior, config, changed);

    let requires_replace = prior.map_or_else(Vec::new, |prior| replaced_attributes(schema, prior, &planned));

    PlannedChange {
        planned,
        requires_replace,
    }
}

/// Top-level attributes marked `RequiresReplace` whose planned value differs
/// from the prior one.
#[must_use]
pub fn replaced_attributes(schema: &Schema, prior: &Json, planned: &Json) -> Vec<AttributePath> {
    schema
        .attributes
        .iter()
        .filter(|(_, attribute)| attribute.has_modifier(PlanModifier::RequiresReplace))
        .filter(|(name, _)| {
            let before = prior.get(name.as_str()).unwrap_or(&NULL);
            let after = planned.get(name.as_str()).unwrap_or(&NULL);
            before != after
        })
        .map(|(name, _)| AttributePath::new(name))
        .collect()
}

fn plan_object(
    attributes: &BTreeMap<String, Attribute>,
    prior: Option<&Json>,
    config: &Json,
    changed: bool,
) -> Json {
    let mut out = Map::new();
    for (name, attribute) in attributes {
        let configured = config.get(name).filter(|v| !v.is_null());
        let prior_value = prior.and_then(|p| p.get(name)).filter(|v| !v.is_null());

        let value = match configured {
            Some(value) => plan_nested(attribute, prior_value, value, changed),
            None => match &attribute.default {
                Some(default) => default.clone(),
                None if attribute.computed => match prior_value {
                    Some(prior_value)
                        if !changed || attribute.has_modifier(PlanModifier::UseStateForUnknown) =>
                    {
                        prior_value.clone()
                    }
                    _ => unknown_json(),
                },
                None => Json::Null,
            },
        };
        out.insert(name.clone(), value);
    }
    Json::Object(out)
}

fn plan_nested(attribute: &Attribute, prior: Option<&Json>, config: &Json, changed: bool) -> Json {
    let Some((mode, nested)) = attribute.nested_attributes() else {
        return config.clone();
    };
    match (mode, config) {
        (NestingMode::Single, Json::Object(_)) => plan_object(nested, prior, config, changed),
        (NestingMode::List | NestingMode::Set, Json::Array(items)) => Json::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let prior_item = prior.and_then(|p| p.get(index));
                    plan_object(nested, prior_item, item, changed)
                })
                .collect(),
        ),
        (NestingMode::Map, Json::Object(entries)) => Json::Object(
            entries
                .iter()
                .map(|(key, item)| {
                    let prior_item = prior.and_then(|p| p.get(key));
                    (key.clone(), plan_object(nested, prior_item, item, changed))
                })
                .collect(),
        ),
        _ => config.clone(),
    }
}

fn differs(attributes: &BTreeMap<String, Attribute>, prior: &Json, config: &Json) -> bool {
    attributes.iter().any(|(name, attribute)| {
        let configured = config.get(name).filter(|v| !v.is_null());
        let before = prior.get(name).unwrap_or(&NULL);
        let effective = match (configured, &attribute.default) {
            (Some(value), _) => value,
            (None, Some(default)) => default,
            (None, None) if attribute.computed => return false,
            (None, None) => &NULL,
        };

        match (attribute.nested_attributes(), effective, before) {
            (Some((NestingMode::Single, nested)), Json::Object(_), Json::Object(_)) => {
                differs(nested, before, effective)
            }
            (Some((NestingMode::List | NestingMode::Set, nested)), Json::Array(a), Json::Array(b)) => {
                a.len() != b.len() || a.iter().zip(b).any(|(c, p)| differs(nested, p, c))
            }
            (Some((NestingMode::Map, nested)), Json::Object(a), Json::Object(b)) => {
                a.len() != b.len()
                    || a.iter().any(|(k, c)| b.get(k).is_none_or(|p| differs(nested, p, c)))
            }
            _ => effective != before,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeType;
    use crate::value::UNKNOWN_SENTINEL;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("test")
            .attribute("id", Attribute::string("").computed().use_state_for_unknown())
            .attribute("environment_id", Attribute::string("").required().requires_replace())
            .attribute("name", Attribute::string("").required())
            .attribute("enabled", Attribute::bool("").default_value(json!(false)))
            .attribute("created_at", Attribute::string("").computed())
            .attribute(
                "quota",
                Attribute::nested(
                    NestingMode::Set,
                    vec![
                        ("type", Attribute::string("").required()),
                        (
                            "delivery_methods",
                            Attribute::set(AttributeType::String, "")
                                .default_value(json!(["SMS", "Voice"])),
                        ),
                    ],
                    "",
                )
                .optional(),
            )
    }

    #[test]
    fn test_create_plan() {
        let change = plan_resource_change(
            &schema(),
            None,
            &json!({"environment_id": "e", "name": "n", "quota": [{"type": "USER"}]}),
        );
        assert_eq!(change.planned["id"], json!(UNKNOWN_SENTINEL));
        assert_eq!(change.planned["created_at"], json!(UNKNOWN_SENTINEL));
        assert_eq!(change.planned["enabled"], json!(false));
        assert_eq!(change.planned["quota"][0]["delivery_methods"], json!(["SMS", "Voice"]));
        assert!(change.requires_replace.is_empty());
    }

    #[test]
    fn test_no_op_update_keeps_computed_values() {
        let prior = json!({
            "id": "i", "environment_id": "e", "name": "n", "enabled": false,
            "created_at": "2024-01-01T00:00:00Z", "quota": null
        });
        let change = plan_resource_change(&schema(), Some(&prior), &json!({"environment_id": "e", "name": "n"}));
        assert_eq!(change.planned, prior);
    }

    #[test]
    fn test_update_marks_computed_unknown_except_use_state() {
        let prior = json!({
            "id": "i", "environment_id": "e", "name": "n", "enabled": false,
            "created_at": "2024-01-01T00:00:00Z", "quota": null
        });
        let change = plan_resource_change(&schema(), Some(&prior), &json!({"environment_id": "e", "name": "m"}));
        assert_eq!(change.planned["id"], json!("i"));
        assert_eq!(change.planned["created_at"], json!(UNKNOWN_SENTINEL));
        assert!(change.requires_replace.is_empty());
    }

    #[test]
    fn test_requires_replace() {
        let prior = json!({"id": "i", "environment_id": "e", "name": "n", "enabled": false});
        let change = plan_resource_change(&schema(), Some(&prior), &json!({"environment_id": "f", "name": "n"}));
        assert_eq!(change.requires_replace, vec![AttributePath::new("environment_id")]);
    }
}
