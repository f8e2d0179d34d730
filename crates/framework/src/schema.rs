//! Resource and data source schemas.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as Json;

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::validator::{ValidationRequest, Validator};
use crate::value::is_unknown_json;

static NULL: Json = Json::Null;

/// Type of a primitive or collection attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
    /// 64-bit integer
    Int64,
    /// 64-bit float
    Float64,
    /// Ordered list
    List(Box<AttributeType>),
    /// Unordered set
    Set(Box<AttributeType>),
    /// String-keyed map
    Map(Box<AttributeType>),
}

/// How nested attributes are repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingMode {
    /// A single object
    Single,
    /// An ordered list of objects
    List,
    /// A set of objects
    Set,
    /// A map of objects keyed by string
    Map,
}

/// Shape of an attribute.
#[derive(Debug, Clone)]
pub enum AttributeKind {
    /// Primitive or collection of primitives
    Primitive(AttributeType),
    /// Nested object(s)
    Nested {
        /// Repetition
        mode: NestingMode,
        /// Nested attributes
        attributes: BTreeMap<String, Attribute>,
    },
}

/// Plan-time behaviour attached to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanModifier {
    /// A change destroys and recreates the resource
    RequiresReplace,
    /// A computed value keeps its prior state value instead of becoming unknown
    UseStateForUnknown,
}

/// One attribute in a schema.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Shape
    pub kind: AttributeKind,
    /// Plain-text description
    pub description: String,
    /// Must be configured
    pub required: bool,
    /// May be configured
    pub optional: bool,
    /// Set by the provider when not configured
    pub computed: bool,
    /// Hidden in host output
    pub sensitive: bool,
    /// Value planned when the configuration leaves the attribute null
    pub default: Option<Json>,
    /// Plan modifiers
    pub plan_modifiers: Vec<PlanModifier>,
    /// Configuration validators
    pub validators: Vec<Arc<dyn Validator>>,
    /// Deprecation notice
    pub deprecation_message: Option<String>,
}

impl Attribute {
    fn with_kind(kind: AttributeKind, description: &str) -> Self {
        Self {
            kind,
            description: description.to_string(),
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            default: None,
            plan_modifiers: Vec::new(),
            validators: Vec::new(),
            deprecation_message: None,
        }
    }

    /// String attribute.
    #[must_use]
    pub fn string(description: &str) -> Self {
        Self::with_kind(AttributeKind::Primitive(AttributeType::String), description)
    }

    /// Boolean attribute.
    #[must_use]
    pub fn bool(description: &str) -> Self {
        Self::with_kind(AttributeKind::Primitive(AttributeType::Bool), description)
    }

    /// Integer attribute.
    #[must_use]
    pub fn int64(description: &str) -> Self {
        Self::with_kind(AttributeKind::Primitive(AttributeType::Int64), description)
    }

    /// Float attribute.
    #[must_use]
    pub fn float64(description: &str) -> Self {
        Self::with_kind(AttributeKind::Primitive(AttributeType::Float64), description)
    }

    /// List of `element`.
    #[must_use]
    pub fn list(element: AttributeType, description: &str) -> Self {
        Self::with_kind(AttributeKind::Primitive(AttributeType::List(Box::new(element))), description)
    }

    /// Set of `element`.
    #[must_use]
    pub fn set(element: AttributeType, description: &str) -> Self {
        Self::with_kind(AttributeKind::Primitive(AttributeType::Set(Box::new(element))), description)
    }

    /// Map of `element`.
    #[must_use]
    pub fn map(element: AttributeType, description: &str) -> Self {
        Self::with_kind(AttributeKind::Primitive(AttributeType::Map(Box::new(element))), description)
    }

    /// Nested attributes repeated per `mode`.
    #[must_use]
    pub fn nested(mode: NestingMode, attributes: Vec<(&str, Self)>, description: &str) -> Self {
        let attributes = attributes.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        Self::with_kind(AttributeKind::Nested { mode, attributes }, description)
    }

    /// Single nested object.
    #[must_use]
    pub fn single_nested(attributes: Vec<(&str, Self)>, description: &str) -> Self {
        Self::nested(NestingMode::Single, attributes, description)
    }

    /// Marks the attribute required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the attribute optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the attribute computed.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Marks the attribute sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Plans `value` when the configuration leaves the attribute null.
    /// Implies optional and computed.
    #[must_use]
    pub fn default_value(mut self, value: Json) -> Self {
        self.default = Some(value);
        self.optional = true;
        self.computed = true;
        self
    }

    /// Adds [`PlanModifier::RequiresReplace`].
    #[must_use]
    pub fn requires_replace(mut self) -> Self {
        self.plan_modifiers.push(PlanModifier::RequiresReplace);
        self
    }

    /// Adds [`PlanModifier::UseStateForUnknown`].
    #[must_use]
    pub fn use_state_for_unknown(mut self) -> Self {
        self.plan_modifiers.push(PlanModifier::UseStateForUnknown);
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Marks the attribute deprecated.
    #[must_use]
    pub fn deprecated(mut self, message: &str) -> Self {
        self.deprecation_message = Some(message.to_string());
        self
    }

    /// Whether the attribute carries `modifier`.
    #[must_use]
    pub fn has_modifier(&self, modifier: PlanModifier) -> bool {
        self.plan_modifiers.contains(&modifier)
    }

    /// Whether only the provider may set this attribute.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    /// Nested attributes, when the attribute is nested.
    #[must_use]
    pub fn nested_attributes(&self) -> Option<(NestingMode, &BTreeMap<String, Self>)> {
        match &self.kind {
            AttributeKind::Nested { mode, attributes } => Some((*mode, attributes)),
            AttributeKind::Primitive(_) => None,
        }
    }
}

/// A resource or data source schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Version stamped into state; bumped on breaking layout changes
    pub version: i64,
    /// Plain-text description
    pub description: String,
    /// Top-level attributes
    pub attributes: BTreeMap<String, Attribute>,
    /// Deprecation notice
    pub deprecation_message: Option<String>,
}

impl Schema {
    /// A version-0 schema.
    #[must_use]
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }

    /// Sets the schema version.
    #[must_use]
    pub fn version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Adds a top-level attribute.
    #[must_use]
    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    /// Marks the schema deprecated.
    #[must_use]
    pub fn deprecated(mut self, message: &str) -> Self {
        self.deprecation_message = Some(message.to_string());
        self
    }

    /// Looks up the attribute definition at `path`, descending through nesting.
    #[must_use]
    pub fn attribute_at(&self, path: &AttributePath) -> Option<&Attribute> {
        use crate::path::PathStep;

        let mut attributes = &self.attributes;
        let mut found: Option<&Attribute> = None;
        for step in path.steps() {
            match step {
                PathStep::Attribute(name) => {
                    let attribute = attributes.get(name)?;
                    if let Some((_, nested)) = attribute.nested_attributes() {
                        attributes = nested;
                    }
                    found = Some(attribute);
                }
                PathStep::Index(_) | PathStep::Key(_) => {}
            }
        }
        found
    }

    /// Checks a configuration document: required and read-only attributes,
    /// unsupported arguments, then every attribute validator.
    #[must_use]
    pub fn validate_config(&self, config: &Json) -> Diagnostics {
        let mut diags = Diagnostics::new();
        validate_object(&self.attributes, &AttributePath::root(), config, config, &mut diags);
        diags
    }
}

fn validate_object(
    attributes: &BTreeMap<String, Attribute>,
    base: &AttributePath,
    object: &Json,
    root: &Json,
    diags: &mut Diagnostics,
) {
    if let Some(fields) = object.as_object() {
        for name in fields.keys() {
            if !attributes.contains_key(name) {
                diags.add_attribute_error(
                    base.clone().attribute(name),
                    "Unsupported argument",
                    format!("An argument named \"{name}\" is not expected here."),
                );
            }
        }
    }

    for (name, attribute) in attributes {
        let path = base.clone().attribute(name);
        let value = object.get(name).unwrap_or(&NULL);

        if attribute.required && value.is_null() {
            diags.add_attribute_error(
                path.clone(),
                "Missing Configuration for Required Attribute",
                format!("Must set a configuration value for the {path} attribute as the provider has marked it as required."),
            );
        }
        if attribute.is_read_only() && !value.is_null() && !is_unknown_json(value) {
            diags.add_attribute_error(
                path.clone(),
                "Invalid Configuration for Read-Only Attribute",
                format!("Cannot set value for the {path} attribute as the provider has marked it as read-only."),
            );
        }
        if let Some(message) = &attribute.deprecation_message
            && !value.is_null()
        {
            diags.add_attribute_warning(path.clone(), "Attribute Deprecated", message.clone());
        }

        let request = ValidationRequest {
            path: &path,
            value,
            parent: object,
            config: root,
        };
        for validator in &attribute.validators {
            validator.validate(&request, diags);
        }

        if let Some((mode, nested)) = attribute.nested_attributes() {
            match (mode, value) {
                (NestingMode::Single, Json::Object(_)) => {
                    validate_object(nested, &path, value, root, diags);
                }
                (NestingMode::List | NestingMode::Set, Json::Array(items)) => {
                    for (index, item) in items.iter().enumerate() {
                        validate_object(nested, &path.clone().index(index), item, root, diags);
                    }
                }
                (NestingMode::Map, Json::Object(entries)) => {
                    for (key, item) in entries {
                        validate_object(nested, &path.clone().key(key), item, root, diags);
                    }
                }
                _ => {}
            }
        }
    }
}
