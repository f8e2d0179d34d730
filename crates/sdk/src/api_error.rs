//! The structured error body returned by PingOne.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Top-level PingOne error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct P1Error {
    /// Correlation ID of the failed request
    #[serde(default)]
    pub id: String,
    /// Error code, e.g. `INVALID_DATA`
    #[serde(default)]
    pub code: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Field-level details
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<P1ErrorDetail>,
}

/// One field-level problem inside a [`P1Error`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct P1ErrorDetail {
    /// Detail code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Attribute the detail refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Detail message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Constraint that was violated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<InnerError>,
}

/// Constraint data attached to a detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerError {
    /// Lowest accepted number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_minimum_value: Option<i64>,
    /// Highest accepted number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_maximum_value: Option<i64>,
    /// Pattern the value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_pattern: Option<String>,
    /// Accepted values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Largest accepted value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<i64>,
    /// Values referenced by the conflict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_values: Option<Vec<String>>,
}

impl P1Error {
    /// The first detail, if any.
    #[must_use]
    pub fn first_detail(&self) -> Option<&P1ErrorDetail> {
        self.details.first()
    }
}

/// Renders the detail text for a PingOne error.
///
/// The layout is the one users see in plan/apply output: identifier, code
/// and message, then one block per detail with its constraint data.
#[must_use]
pub fn format_error_detail(error: &P1Error) -> String {
    let mut text = format!(
        "PingOne Error Details:\nID:\t\t{}\nCode:\t\t{}\nMessage:\t{}",
        error.id, error.code, error.message
    );

    if error.details.is_empty() {
        return text;
    }

    let blocks: Vec<String> = error.details.iter().map(format_detail_block).collect();
    let _ = write!(text, "\nDetails:\n{}", blocks.join("\n"));
    text
}

fn format_detail_block(detail: &P1ErrorDetail) -> String {
    let mut block = String::new();
    let mut marker = "-";

    for (label, value) in [
        ("Code", &detail.code),
        ("Message", &detail.message),
        ("Target", &detail.target),
    ] {
        if let Some(value) = value {
            let _ = writeln!(block, "  {marker} {label}:\t{value}");
            marker = " ";
        }
    }

    if let Some(inner) = &detail.inner_error {
        let mut data = String::new();
        if let Some(v) = inner.range_minimum_value {
            let _ = writeln!(data, "      Range Min Value:\t{v}");
        }
        if let Some(v) = inner.range_maximum_value {
            let _ = writeln!(data, "      Range Max Value:\t{v}");
        }
        if let Some(v) = &inner.allowed_pattern {
            let _ = writeln!(data, "      Allowed Pattern:\t{v}");
        }
        if let Some(v) = &inner.allowed_values {
            let _ = writeln!(data, "      Allowed Values:\t[{}]", v.join(", "));
        }
        if let Some(v) = inner.maximum_value {
            let _ = writeln!(data, "      Max Value:\t{v}");
        }
        if let Some(v) = &inner.referenced_values {
            let _ = writeln!(data, "      Referenced Values:\t[{}]", v.join(", "));
        }
        let _ = write!(block, "  {marker} Data:\n{data}");
    }

    block
}
