//! Error types for the PingOne client

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use crate::api_error::P1Error;

/// Error type for PingOne API operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The request never produced an HTTP response
    #[error("Transport error calling `{operation}`: {message}")]
    #[diagnostic(
        code(pingone_sdk::transport),
        help("Check network connectivity, proxy settings and the configured region")
    )]
    Transport {
        /// Operation being called
        operation: String,
        /// Underlying transport failure
        message: String,
    },

    /// The service answered with a non-success status
    #[error("PingOne API returned HTTP {status} for `{operation}`{}", body.as_ref().map_or(String::new(), |b| format!(": {}", b.message)))]
    #[diagnostic(code(pingone_sdk::api))]
    Api {
        /// Operation being called
        operation: String,
        /// HTTP status code
        status: u16,
        /// Structured error body, when it decoded
        body: Option<P1Error>,
        /// Raw response body
        raw: String,
    },

    /// A success response did not decode into the expected model
    #[error("Unable to decode the response of `{operation}`: {message}")]
    #[diagnostic(
        code(pingone_sdk::decode),
        help("This is always a bug in the provider; please report it")
    )]
    Decode {
        /// Operation being called
        operation: String,
        /// Decoder message
        message: String,
    },

    /// The caller's cancellation token fired
    #[error("Operation `{operation}` was cancelled")]
    #[diagnostic(code(pingone_sdk::cancelled))]
    Cancelled {
        /// Operation being called
        operation: String,
    },

    /// Provider configuration is incomplete or contradictory
    #[error("Invalid provider configuration: {message}")]
    #[diagnostic(
        code(pingone_sdk::config),
        help("Set client_id, client_secret and environment_id, or api_access_token, either in the provider block or through PINGONE_* environment variables")
    )]
    InvalidConfig {
        /// What is wrong
        message: String,
    },

    /// The region code is not one PingOne serves
    #[error("Unknown PingOne region code: {code}")]
    #[diagnostic(
        code(pingone_sdk::region),
        help("Use one of AP, AU, CA, EU, NA or SG")
    )]
    InvalidRegion {
        /// Code as given
        code: String,
    },

    /// Obtaining an access token failed
    #[error("Unable to obtain a PingOne access token: {message}")]
    #[diagnostic(
        code(pingone_sdk::token),
        help("Verify the worker application's client ID, secret and environment")
    )]
    Token {
        /// Why the token request failed
        message: String,
    },
}

impl Error {
    /// Create a transport error
    #[must_use]
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    #[must_use]
    pub fn decode(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an API error from a status and raw body, decoding the body when possible
    #[must_use]
    pub fn api(operation: impl Into<String>, status: u16, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::Api {
            operation: operation.into(),
            status,
            body: serde_json::from_str(&raw).ok(),
            raw,
        }
    }

    /// HTTP status, when a response was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured PingOne error body, when present
    #[must_use]
    pub fn p1_error(&self) -> Option<&P1Error> {
        match self {
            Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether no HTTP response was received
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub(crate) fn from_reqwest(operation: &str, err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(operation, err.to_string())
        } else {
            Self::transport(operation, err.to_string())
        }
    }
}

/// Result type for PingOne API operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_decodes_body() {
        let err = Error::api(
            "ReadOneEnvironment",
            404,
            r#"{"id":"abc","code":"NOT_FOUND","message":"Unable to find environment"}"#,
        );
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.p1_error().map(|e| e.code.as_str()), Some("NOT_FOUND"));
        assert!(err.to_string().contains("Unable to find environment"));
    }

    #[test]
    fn test_api_error_keeps_unstructured_body() {
        let err = Error::api("ReadOneGateway", 502, "<html>Bad Gateway</html>");
        assert!(err.p1_error().is_none());
        assert!(matches!(err, Error::Api { ref raw, .. } if raw.contains("Bad Gateway")));
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = Error::transport("CreateWebhook", "connection refused");
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }
}
