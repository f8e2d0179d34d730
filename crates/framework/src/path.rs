//! Attribute paths into a state, plan or configuration document.

use std::fmt;

use serde_json::{Map, Value as Json};

/// One step of an [`AttributePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    /// Attribute of an object
    Attribute(String),
    /// Element of a list or set, by position
    Index(usize),
    /// Element of a map, by key
    Key(String),
}

/// Location of an attribute within a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

impl AttributePath {
    /// The document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// A path to a top-level attribute.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::root().attribute(name)
    }

    /// Extends the path with a nested attribute name.
    #[must_use]
    pub fn attribute(mut self, name: &str) -> Self {
        self.steps.push(PathStep::Attribute(name.to_string()));
        self
    }

    /// Extends the path with a list or set position.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(PathStep::Index(index));
        self
    }

    /// Extends the path with a map key.
    #[must_use]
    pub fn key(mut self, key: &str) -> Self {
        self.steps.push(PathStep::Key(key.to_string()));
        self
    }

    /// The steps making up this path.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// The parent path, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.steps.is_empty() {
            return None;
        }
        let mut steps = self.steps.clone();
        steps.pop();
        Some(Self { steps })
    }

    /// Sibling attribute sharing this path's parent.
    #[must_use]
    pub fn sibling(&self, name: &str) -> Self {
        self.parent().unwrap_or_default().attribute(name)
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolves the path against a JSON document.
    #[must_use]
    pub fn get<'a>(&self, document: &'a Json) -> Option<&'a Json> {
        let mut current = document;
        for step in &self.steps {
            current = match step {
                PathStep::Attribute(name) | PathStep::Key(name) => current.as_object()?.get(name)?,
                PathStep::Index(index) => current.as_array()?.get(*index)?,
            };
        }
        Some(current)
    }

    /// Writes `value` at this path, creating intermediate objects as needed.
    ///
    /// Returns `false` when the path crosses a scalar or an out-of-range
    /// index.
    pub fn set(&self, document: &mut Json, value: Json) -> bool {
        let Some((last, prefix)) = self.steps.split_last() else {
            *document = value;
            return true;
        };

        let mut current = document;
        for step in prefix {
            if current.is_null() {
                *current = Json::Object(Map::new());
            }
            current = match step {
                PathStep::Attribute(name) | PathStep::Key(name) => {
                    let Some(object) = current.as_object_mut() else {
                        return false;
                    };
                    object.entry(name.clone()).or_insert(Json::Null)
                }
                PathStep::Index(index) => match current.as_array_mut().and_then(|a| a.get_mut(*index)) {
                    Some(element) => element,
                    None => return false,
                },
            };
        }

        if current.is_null() {
            *current = Json::Object(Map::new());
        }
        match last {
            PathStep::Attribute(name) | PathStep::Key(name) => match current.as_object_mut() {
                Some(object) => {
                    object.insert(name.clone(), value);
                    true
                }
                None => false,
            },
            PathStep::Index(index) => match current.as_array_mut().and_then(|a| a.get_mut(*index)) {
                Some(element) => {
                    *element = value;
                    true
                }
                None => false,
            },
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if position == 0 => write!(f, "{name}")?,
                PathStep::Attribute(name) => write!(f, ".{name}")?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
                PathStep::Key(key) => write!(f, "[\"{key}\"]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        let path = AttributePath::new("quota").index(1).attribute("delivery_methods");
        assert_eq!(path.to_string(), "quota[1].delivery_methods");

        let path = AttributePath::new("user_types").key("Corp").attribute("name");
        assert_eq!(path.to_string(), "user_types[\"Corp\"].name");
    }

    #[test]
    fn test_get_and_set() {
        let mut doc = json!({"country_limit": {"type": "ALLOWED"}});
        let path = AttributePath::new("country_limit").attribute("delivery_methods");
        assert!(path.get(&doc).is_none());

        assert!(path.set(&mut doc, json!(["SMS"])));
        assert_eq!(path.get(&doc), Some(&json!(["SMS"])));
        assert_eq!(
            AttributePath::new("country_limit").attribute("type").get(&doc),
            Some(&json!("ALLOWED"))
        );
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut doc = json!({"kerberos": null});
        let path = AttributePath::new("kerberos").attribute("service_account_upn");
        assert!(path.set(&mut doc, json!("svc@example.com")));
        assert_eq!(doc, json!({"kerberos": {"service_account_upn": "svc@example.com"}}));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = json!({"name": "x"});
        assert!(!AttributePath::new("name").attribute("inner").set(&mut doc, json!(1)));
    }

    #[test]
    fn test_sibling() {
        let path = AttributePath::new("quota").index(0).attribute("total");
        assert_eq!(path.sibling("used").to_string(), "quota[0].used");
    }
}
