//! Attribute validators.
//!
//! A validator sees a read-only view of the configuration: the value under
//! test, its enclosing object and the document root. It reports problems by
//! appending attributed diagnostics and cannot change the plan.
//!
//! Validators skip unknown values; only the presence validators
//! ([`exactly_one_of`], [`required_if_matches_value`]) act on null.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value as Json;

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::value::is_unknown_json;

static NULL: Json = Json::Null;

/// What a validator is shown.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRequest<'a> {
    /// Path of the value under test
    pub path: &'a AttributePath,
    /// The value under test
    pub value: &'a Json,
    /// The object that holds the value
    pub parent: &'a Json,
    /// The whole configuration document
    pub config: &'a Json,
}

impl<'a> ValidationRequest<'a> {
    /// A sibling attribute in the enclosing object; missing reads as null.
    #[must_use]
    pub fn sibling(&self, name: &str) -> &'a Json {
        self.parent.get(name).unwrap_or(&NULL)
    }

    /// Whether the value under test is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Whether the value under test is unknown.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        is_unknown_json(self.value)
    }

    /// The value as a known string.
    #[must_use]
    pub fn known_str(&self) -> Option<&'a str> {
        if self.is_unknown() { None } else { self.value.as_str() }
    }
}

/// A single attribute check.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Plain-text description, used in schema documentation.
    fn description(&self) -> String;

    /// Checks the value and appends any failures to `diags`.
    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics);
}

fn quoted_list(values: &[impl AsRef<str>]) -> String {
    let inner: Vec<String> = values.iter().map(|v| format!("\"{}\"", v.as_ref())).collect();
    format!("[{}]", inner.join(" "))
}

/// String length lower bound.
#[derive(Debug)]
pub struct LengthAtLeast(pub usize);

impl Validator for LengthAtLeast {
    fn description(&self) -> String {
        format!("string length must be at least {}", self.0)
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = request.known_str() else {
            return;
        };
        let length = value.chars().count();
        if length < self.0 {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value Length",
                format!("Attribute {} {}, got: {length}", request.path, self.description()),
            );
        }
    }
}

/// Inclusive string length range.
#[derive(Debug)]
pub struct LengthBetween {
    /// Shortest allowed length
    pub min: usize,
    /// Longest allowed length
    pub max: usize,
}

impl Validator for LengthBetween {
    fn description(&self) -> String {
        format!("string length must be between {} and {}", self.min, self.max)
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = request.known_str() else {
            return;
        };
        let length = value.chars().count();
        if length < self.min || length > self.max {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value Length",
                format!("Attribute {} {}, got: {length}", request.path, self.description()),
            );
        }
    }
}

/// Membership in a fixed set of strings.
#[derive(Debug)]
pub struct OneOf(pub Vec<String>);

impl Validator for OneOf {
    fn description(&self) -> String {
        format!("value must be one of: {}", quoted_list(&self.0))
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = request.known_str() else {
            return;
        };
        if !self.0.iter().any(|allowed| allowed == value) {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value Match",
                format!("Attribute {} {}, got: \"{value}\"", request.path, self.description()),
            );
        }
    }
}

/// Regular expression match with a human message.
#[derive(Debug)]
pub struct RegexMatches {
    regex: Regex,
    message: String,
}

impl RegexMatches {
    /// Matches `regex`, explaining failures with `message`.
    pub fn new(regex: Regex, message: impl Into<String>) -> Self {
        Self {
            regex,
            message: message.into(),
        }
    }
}

impl Validator for RegexMatches {
    fn description(&self) -> String {
        self.message.clone()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = request.known_str() else {
            return;
        };
        if !self.regex.is_match(value) {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value Match",
                format!("Attribute {} {}, got: {value}", request.path, self.message),
            );
        }
    }
}

/// Inclusive integer range.
#[derive(Debug)]
pub struct Int64Between {
    /// Smallest allowed value
    pub min: i64,
    /// Largest allowed value
    pub max: i64,
}

impl Validator for Int64Between {
    fn description(&self) -> String {
        format!("value must be between {} and {}", self.min, self.max)
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = request.value.as_i64() else {
            return;
        };
        if value < self.min || value > self.max {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value",
                format!("Attribute {} {}, got: {value}", request.path, self.description()),
            );
        }
    }
}

/// Lower bound on the number of elements in a collection.
#[derive(Debug)]
pub struct AtLeastNElements(pub usize);

fn element_count(value: &Json) -> Option<usize> {
    match value {
        Json::Array(items) => Some(items.len()),
        Json::Object(entries) => Some(entries.len()),
        _ => None,
    }
}

impl Validator for AtLeastNElements {
    fn description(&self) -> String {
        format!("must contain at least {} elements", self.0)
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(count) = element_count(request.value) else {
            return;
        };
        if count < self.0 {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value",
                format!("Attribute {} {}, got: {count}", request.path, self.description()),
            );
        }
    }
}

/// Upper bound on the number of elements in a collection.
#[derive(Debug)]
pub struct AtMostNElements(pub usize);

impl Validator for AtMostNElements {
    fn description(&self) -> String {
        format!("must contain at most {} elements", self.0)
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(count) = element_count(request.value) else {
            return;
        };
        if count > self.0 {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value",
                format!("Attribute {} {}, got: {count}", request.path, self.description()),
            );
        }
    }
}

/// Applies an inner validator to every element of a list or set.
#[derive(Debug)]
pub struct Elements(pub Arc<dyn Validator>);

impl Validator for Elements {
    fn description(&self) -> String {
        format!("each element: {}", self.0.description())
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Json::Array(items) = request.value else {
            return;
        };
        for (index, item) in items.iter().enumerate() {
            let path = request.path.clone().index(index);
            self.0.validate(
                &ValidationRequest {
                    path: &path,
                    value: item,
                    parent: request.value,
                    config: request.config,
                },
                diags,
            );
        }
    }
}

/// Exactly one of a group of sibling attributes must be configured.
///
/// Attach the same validator, listing the whole group, to every member.
/// "Too many" is reported on each configured member; "none" is reported once,
/// on the first member of the group.
#[derive(Debug)]
pub struct ExactlyOneOf(pub Vec<String>);

impl Validator for ExactlyOneOf {
    fn description(&self) -> String {
        format!("Exactly one of these attributes must be configured: {}", quoted_list(&self.0))
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let members: Vec<&Json> = self.0.iter().map(|name| request.sibling(name)).collect();
        if members.iter().any(|v| is_unknown_json(v)) {
            return;
        }
        let configured = members.iter().filter(|v| !v.is_null()).count();
        let first = self.0.first().map(String::as_str);
        let this = request.path.steps().last();
        let is_first = matches!(
            (this, first),
            (Some(crate::path::PathStep::Attribute(name)), Some(first)) if name == first
        );

        if (configured > 1 && !request.is_null()) || (configured == 0 && is_first) {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Combination",
                format!("{}, got: {configured}", self.description()),
            );
        }
    }
}

/// The attribute cannot be set together with any of the listed siblings.
#[derive(Debug)]
pub struct ConflictsWith(pub Vec<String>);

impl Validator for ConflictsWith {
    fn description(&self) -> String {
        format!("cannot be configured together with {}", quoted_list(&self.0))
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        if request.is_null() {
            return;
        }
        for other in &self.0 {
            if !request.sibling(other).is_null() {
                diags.add_attribute_error(
                    request.path.clone(),
                    "Invalid Attribute Combination",
                    format!(
                        "Attribute \"{}\" cannot be specified when \"{}\" is specified",
                        request.path.sibling(other),
                        request.path
                    ),
                );
            }
        }
    }
}

/// The attribute needs every listed sibling to be configured too.
#[derive(Debug)]
pub struct AlsoRequires(pub Vec<String>);

impl Validator for AlsoRequires {
    fn description(&self) -> String {
        format!("requires {} to also be configured", quoted_list(&self.0))
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        if request.is_null() {
            return;
        }
        for other in &self.0 {
            if request.sibling(other).is_null() {
                diags.add_attribute_error(
                    request.path.clone(),
                    "Invalid Attribute Combination",
                    format!(
                        "Attribute \"{}\" must be specified when \"{}\" is specified",
                        request.path.sibling(other),
                        request.path
                    ),
                );
            }
        }
    }
}

/// Required when a sibling holds one of the given values.
#[derive(Debug)]
pub struct RequiredIfMatchesValue {
    /// Sibling attribute name
    pub other: String,
    /// Values of the sibling that make this attribute required
    pub values: Vec<String>,
}

impl Validator for RequiredIfMatchesValue {
    fn description(&self) -> String {
        format!("required when \"{}\" is one of {}", self.other, quoted_list(&self.values))
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        if !request.is_null() {
            return;
        }
        let other = request.sibling(&self.other);
        if let Some(matched) = other.as_str().filter(|v| self.values.iter().any(|a| a == v)) {
            diags.add_attribute_error(
                request.path.clone(),
                "Missing required argument",
                format!(
                    "The argument \"{}\" is required because \"{}\" is configured as: \"{matched}\".",
                    request.path,
                    request.path.sibling(&self.other)
                ),
            );
        }
    }
}

/// Must not be set when a sibling holds one of the given values.
#[derive(Debug)]
pub struct ConflictsIfMatchesValue {
    /// Sibling attribute name
    pub other: String,
    /// Values of the sibling that forbid this attribute
    pub values: Vec<String>,
}

impl Validator for ConflictsIfMatchesValue {
    fn description(&self) -> String {
        format!("cannot be configured when \"{}\" is one of {}", self.other, quoted_list(&self.values))
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        if request.is_null() || request.is_unknown() {
            return;
        }
        let other = request.sibling(&self.other);
        if let Some(matched) = other.as_str().filter(|v| self.values.iter().any(|a| a == v)) {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid argument combination",
                format!(
                    "The argument \"{}\" cannot be configured when \"{}\" is configured as: \"{matched}\".",
                    request.path,
                    request.path.sibling(&self.other)
                ),
            );
        }
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// See [`LengthAtLeast`].
#[must_use]
pub fn length_at_least(min: usize) -> Arc<dyn Validator> {
    Arc::new(LengthAtLeast(min))
}

/// See [`LengthBetween`].
#[must_use]
pub fn length_between(min: usize, max: usize) -> Arc<dyn Validator> {
    Arc::new(LengthBetween { min, max })
}

/// See [`OneOf`].
#[must_use]
pub fn one_of(values: &[&str]) -> Arc<dyn Validator> {
    Arc::new(OneOf(owned(values)))
}

/// See [`RegexMatches`].
#[must_use]
pub fn regex_matches(regex: Regex, message: &str) -> Arc<dyn Validator> {
    Arc::new(RegexMatches::new(regex, message))
}

/// See [`Int64Between`].
#[must_use]
pub fn int64_between(min: i64, max: i64) -> Arc<dyn Validator> {
    Arc::new(Int64Between { min, max })
}

/// See [`AtLeastNElements`].
#[must_use]
pub fn at_least_n_elements(min: usize) -> Arc<dyn Validator> {
    Arc::new(AtLeastNElements(min))
}

/// See [`AtMostNElements`].
#[must_use]
pub fn at_most_n_elements(max: usize) -> Arc<dyn Validator> {
    Arc::new(AtMostNElements(max))
}

/// See [`Elements`].
#[must_use]
pub fn elements(inner: Arc<dyn Validator>) -> Arc<dyn Validator> {
    Arc::new(Elements(inner))
}

/// See [`ExactlyOneOf`].
#[must_use]
pub fn exactly_one_of(group: &[&str]) -> Arc<dyn Validator> {
    Arc::new(ExactlyOneOf(owned(group)))
}

/// See [`ConflictsWith`].
#[must_use]
pub fn conflicts_with(others: &[&str]) -> Arc<dyn Validator> {
    Arc::new(ConflictsWith(owned(others)))
}

/// See [`AlsoRequires`].
#[must_use]
pub fn also_requires(others: &[&str]) -> Arc<dyn Validator> {
    Arc::new(AlsoRequires(owned(others)))
}

/// See [`RequiredIfMatchesValue`].
#[must_use]
pub fn required_if_matches_value(other: &str, values: &[&str]) -> Arc<dyn Validator> {
    Arc::new(RequiredIfMatchesValue {
        other: other.to_string(),
        values: owned(values),
    })
}

/// See [`ConflictsIfMatchesValue`].
#[must_use]
pub fn conflicts_if_matches_value(other: &str, values: &[&str]) -> Arc<dyn Validator> {
    Arc::new(ConflictsIfMatchesValue {
        other: other.to_string(),
        values: owned(values),
    })
}
