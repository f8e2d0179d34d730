//! Composite import identifier parsing.

use std::collections::BTreeMap;

use regex::Regex;

use crate::diag::Diagnostic;

/// One segment of a composite import identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportComponent {
    /// Label shown in the expected format, e.g. `environmentID`
    pub label: &'static str,
    /// State attribute the segment populates
    pub attribute: &'static str,
    /// Unanchored pattern the segment must match
    pub pattern: &'static str,
    /// Whether the segment supplies the resource ID
    pub primary: bool,
}

impl ImportComponent {
    /// A non-primary segment.
    #[must_use]
    pub const fn new(label: &'static str, attribute: &'static str, pattern: &'static str) -> Self {
        Self {
            label,
            attribute,
            pattern,
            primary: false,
        }
    }

    /// The segment that supplies the resource ID; it populates `id`.
    #[must_use]
    pub const fn primary(label: &'static str, pattern: &'static str) -> Self {
        Self {
            label,
            attribute: "id",
            pattern,
            primary: true,
        }
    }
}

/// Segments of a parsed import identifier, keyed by state attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedId {
    /// Attribute name to segment value
    pub attributes: BTreeMap<String, String>,
}

impl ImportedId {
    /// The value of the primary segment.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    /// The value for `attribute`.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).map(String::as_str)
    }
}

/// Splits `id` by `separator` and matches every segment.
///
/// The whole identifier must match `^seg1<sep>seg2...$`; a wrong segment
/// count or a non-matching segment produces one error naming the expected
/// format.
pub fn parse_import_id(
    id: &str,
    components: &[ImportComponent],
    separator: &str,
) -> Result<ImportedId, Diagnostic> {
    let escaped_separator = regex::escape(separator);
    let joined: Vec<String> = components.iter().map(|c| format!("({})", c.pattern)).collect();
    let full_pattern = format!("^{}$", joined.join(&escaped_separator));
    let format_labels: Vec<&str> = components.iter().map(|c| c.label).collect();

    let regex = Regex::new(&full_pattern).map_err(|e| {
        Diagnostic::error(
            "Invalid import ID pattern",
            format!("The import ID pattern {full_pattern} could not be compiled: {e}. Please report this issue to the provider maintainers."),
        )
    })?;

    let invalid = || {
        Diagnostic::error(
            "Unexpected Import Identifier",
            format!(
                "Invalid import ID specified (\"{id}\").  The ID should be in format \"{}\" and must match regex: {full_pattern}",
                format_labels.join(separator)
            ),
        )
    };

    if id.split(separator).count() != components.len() {
        return Err(invalid());
    }
    let captures = regex.captures(id).ok_or_else(invalid)?;

    let mut imported = ImportedId::default();
    for (position, component) in components.iter().enumerate() {
        let segment = captures.get(position + 1).map_or("", |m| m.as_str());
        imported
            .attributes
            .insert(component.attribute.to_string(), segment.to_string());
    }
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

    fn role_assignment() -> [ImportComponent; 3] {
        [
            ImportComponent::new("environmentID", "environment_id", UUID),
            ImportComponent::new("userID", "user_id", UUID),
            ImportComponent::primary("roleAssignmentID", UUID),
        ]
    }

    const ENV: &str = "11111111-1111-1111-1111-111111111111";
    const USER: &str = "22222222-2222-2222-2222-222222222222";
    const RA: &str = "33333333-3333-3333-3333-333333333333";

    #[test]
    fn test_three_segments() {
        let imported = parse_import_id(&format!("{ENV}/{USER}/{RA}"), &role_assignment(), "/").unwrap();
        assert_eq!(imported.get("environment_id"), Some(ENV));
        assert_eq!(imported.get("user_id"), Some(USER));
        assert_eq!(imported.id(), Some(RA));
        assert_eq!(imported.attributes.len(), 3);
    }

    #[test]
    fn test_wrong_segment_count() {
        for id in [format!("{ENV}/{USER}"), format!("{ENV}/{USER}/{RA}/{RA}"), String::new()] {
            let err = parse_import_id(&id, &role_assignment(), "/").unwrap_err();
            assert!(err.is_error());
            assert!(
                err.detail
                    .contains("should be in format \"environmentID/userID/roleAssignmentID\""),
                "{}",
                err.detail
            );
        }
    }

    #[test]
    fn test_segment_must_match() {
        let err = parse_import_id(&format!("{ENV}/not-a-uuid/{RA}"), &role_assignment(), "/").unwrap_err();
        assert!(err.detail.contains("must match regex"));
    }

    #[test]
    fn test_custom_separator() {
        let components = [
            ImportComponent::new("environmentID", "environment_id", UUID),
            ImportComponent::primary("name", "[a-z]+"),
        ];
        let imported = parse_import_id(&format!("{ENV}|demo"), &components, "|").unwrap();
        assert_eq!(imported.id(), Some("demo"));
    }
}
