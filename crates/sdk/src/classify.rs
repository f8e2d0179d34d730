//! Turning failed calls into diagnostics.
//!
//! A resource passes a custom [`ErrorClassifier`] to the kernel. It sees the
//! HTTP status and the decoded PingOne error first; returning `None` falls
//! through to [`default_diagnostics`].

use pingone_framework::Diagnostics;

use crate::api_error::{P1Error, format_error_detail};

/// Maps a failed response to resource-specific diagnostics.
pub trait ErrorClassifier: Send + Sync {
    /// `None` defers to the default mapping.
    fn classify(&self, status: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics>;
}

impl<F> ErrorClassifier for F
where
    F: Fn(Option<u16>, Option<&P1Error>) -> Option<Diagnostics> + Send + Sync,
{
    fn classify(&self, status: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
        self(status, error)
    }
}

/// Leaves every failure to the default mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl ErrorClassifier for DefaultClassifier {
    fn classify(&self, _: Option<u16>, _: Option<&P1Error>) -> Option<Diagnostics> {
        None
    }
}

/// Tries each classifier in order and returns the first answer.
pub struct FirstOf(Vec<Box<dyn ErrorClassifier>>);

impl ErrorClassifier for FirstOf {
    fn classify(&self, status: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
        self.0.iter().find_map(|c| c.classify(status, error))
    }
}

/// Chains classifiers; the first to return diagnostics wins.
#[must_use]
pub fn first_of(classifiers: Vec<Box<dyn ErrorClassifier>>) -> FirstOf {
    FirstOf(classifiers)
}

const NOT_FOUND_DETAIL: &str = "The requested resource configuration cannot be found in the PingOne service.  If the requested resource is managed in Terraform's state, it may have been removed outside of Terraform.";

/// Reports a missing object as a warning so the caller can drop it from state.
#[must_use]
pub fn not_found_warning(status: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
    let mut diags = Diagnostics::new();
    if let Some(error) = error.filter(|e| e.code == "NOT_FOUND") {
        diags.add_warning(
            "Requested resource not found",
            format!("{NOT_FOUND_DETAIL}\nAPI error: {}", error.message),
        );
        return Some(diags);
    }
    if status == Some(404) {
        diags.add_warning("Requested resource not found", NOT_FOUND_DETAIL);
        return Some(diags);
    }
    None
}

fn first_detail_is(error: Option<&P1Error>, code: &str, target: Option<&str>) -> Option<String> {
    let detail = error?.first_detail()?;
    if detail.code.as_deref() != Some(code) {
        return None;
    }
    if target.is_some() && detail.target.as_deref() != target {
        return None;
    }
    Some(detail.message.clone().unwrap_or_default())
}

/// Surfaces an `INVALID_VALUE` on `name` with the service's own wording.
#[must_use]
pub fn invalid_value_for_name(_: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
    first_detail_is(error, "INVALID_VALUE", Some("name")).map(|message| Diagnostics::from_error("Invalid Value", message))
}

/// Surfaces a role that cannot be granted at the requested scope.
#[must_use]
pub fn role_scope(_: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
    first_detail_is(error, "INVALID_VALUE", Some("scope"))
        .map(|message| Diagnostics::from_error("Incompatible role and scope combination", message))
}

/// Passes gateway `INVALID_VALUE` messages through as the error summary.
#[must_use]
pub fn gateway_write_errors(_: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
    let message = first_detail_is(error, "INVALID_VALUE", None)?;
    Some(Diagnostics::from_error(message, error.map(format_error_detail).unwrap_or_default()))
}

/// Replaces a uniqueness violation with a resource-specific message.
#[derive(Debug, Clone)]
pub struct Uniqueness(pub &'static str);

impl ErrorClassifier for Uniqueness {
    fn classify(&self, _: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
        let error = error.filter(|e| e.code == "UNIQUENESS_VIOLATION")?;
        Some(Diagnostics::from_error(self.0, format_error_detail(error)))
    }
}

fn code_label(code: &str) -> Option<&'static str> {
    match code {
        "INVALID_VALUE" | "INVALID_DATA" => Some("Invalid value"),
        "REQUIRED_VALUE" => Some("Missing required value"),
        "UNIQUENESS_VIOLATION" => Some("Uniqueness violation"),
        "NOT_FOUND" => Some("Resource not found"),
        "ACCESS_FAILED" | "INSUFFICIENT_PERMISSIONS" | "FORBIDDEN" => Some("Insufficient permissions"),
        _ => None,
    }
}

/// The mapping used when no custom classifier claims a PingOne error.
#[must_use]
pub fn default_diagnostics(operation: &str, error: &P1Error) -> Diagnostics {
    let detail = format_error_detail(error);

    if first_detail_is(Some(error), "INVALID_VALUE", Some("scope")).is_some() {
        return Diagnostics::from_error("Incompatible role and scope combination", detail);
    }

    let summary = match code_label(&error.code) {
        Some(label) => format!("{label} when calling `{operation}`: {}", error.message),
        None => format!("Error when calling `{operation}`: {}", error.message),
    };
    Diagnostics::from_error(summary, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_error::P1ErrorDetail;
    use pingone_framework::Severity;

    fn error(code: &str, message: &str) -> P1Error {
        P1Error {
            id: "corr".to_string(),
            code: code.to_string(),
            message: message.to_string(),
            details: vec![],
        }
    }

    fn with_detail(mut e: P1Error, code: &str, target: &str, message: &str) -> P1Error {
        e.details.push(P1ErrorDetail {
            code: Some(code.to_string()),
            target: Some(target.to_string()),
            message: Some(message.to_string()),
            inner_error: None,
        });
        e
    }

    #[test]
    fn test_not_found_by_code_and_status() {
        let by_code = not_found_warning(Some(404), Some(&error("NOT_FOUND", "Unable to find gateway"))).unwrap();
        let warning = by_code.iter().next().unwrap();
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.summary, "Requested resource not found");
        assert!(warning.detail.ends_with("\nAPI error: Unable to find gateway"));

        let by_status = not_found_warning(Some(404), None).unwrap();
        assert!(!by_status.has_error());

        assert!(not_found_warning(Some(400), Some(&error("INVALID_DATA", "bad"))).is_none());
    }

    #[test]
    fn test_role_scope() {
        let e = with_detail(error("INVALID_DATA", "bad"), "INVALID_VALUE", "scope", "Role cannot be assigned at this scope");
        let diags = role_scope(Some(400), Some(&e)).unwrap();
        assert_eq!(diags.iter().next().unwrap().summary, "Incompatible role and scope combination");

        let default = default_diagnostics("CreateUserRoleAssignment", &e);
        assert_eq!(default.iter().next().unwrap().summary, "Incompatible role and scope combination");
    }

    #[test]
    fn test_invalid_value_for_name() {
        let e = with_detail(error("INVALID_DATA", "bad"), "INVALID_VALUE", "name", "Name must be unique");
        let diags = invalid_value_for_name(Some(400), Some(&e)).unwrap();
        let d = diags.iter().next().unwrap();
        assert_eq!((d.summary.as_str(), d.detail.as_str()), ("Invalid Value", "Name must be unique"));
        assert!(invalid_value_for_name(Some(400), Some(&error("INVALID_DATA", "bad"))).is_none());
    }

    #[test]
    fn test_uniqueness() {
        let classifier = Uniqueness("Customized content for the template, locale and variant combination already exists.");
        let diags = classifier
            .classify(Some(400), Some(&error("UNIQUENESS_VIOLATION", "duplicate")))
            .unwrap();
        assert_eq!(
            diags.iter().next().unwrap().summary,
            "Customized content for the template, locale and variant combination already exists."
        );
    }

    #[test]
    fn test_default_labels() {
        let cases = [
            ("INVALID_DATA", "Invalid value when calling `CreateWebhook`: bad"),
            ("REQUIRED_VALUE", "Missing required value when calling `CreateWebhook`: bad"),
            ("UNIQUENESS_VIOLATION", "Uniqueness violation when calling `CreateWebhook`: bad"),
            ("NOT_FOUND", "Resource not found when calling `CreateWebhook`: bad"),
            ("ACCESS_FAILED", "Insufficient permissions when calling `CreateWebhook`: bad"),
            ("SOMETHING_ELSE", "Error when calling `CreateWebhook`: bad"),
        ];
        for (code, summary) in cases {
            let diags = default_diagnostics("CreateWebhook", &error(code, "bad"));
            assert_eq!(diags.iter().next().unwrap().summary, summary);
            assert!(diags.has_error());
        }
    }

    #[test]
    fn test_first_of_returns_first_answer() {
        let chain = first_of(vec![
            Box::new(DefaultClassifier) as Box<dyn ErrorClassifier>,
            Box::new(not_found_warning) as Box<dyn ErrorClassifier>,
        ]);
        assert!(chain.classify(Some(404), None).is_some());
        assert!(chain.classify(Some(500), None).is_none());
    }
}
