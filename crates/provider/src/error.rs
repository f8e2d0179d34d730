//! Provider and CLI errors.
//!
//! Host requests report failures as [`Diagnostics`](pingone_framework::Diagnostics);
//! these types cover what happens outside a request: assembling the provider
//! from its resource types and running the offline CLI.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Provider assembly and CLI errors.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A resource or data source failed registration checks
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] pingone_framework::Error),

    /// The host asked for a type this provider does not serve
    #[error("Unknown resource or data source type \"{type_name}\"")]
    #[diagnostic(
        code(pingone::provider::unknown_type),
        help("Run 'terraform-provider-pingone types' to list the supported types")
    )]
    UnknownType {
        /// Requested type name
        type_name: String,
    },

    /// A file given to the CLI could not be read
    #[error("Failed to read {}", path.display())]
    #[diagnostic(
        code(pingone::cli::file_error),
        help("Check file permissions and ensure the path exists")
    )]
    FileError {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not a JSON object
    #[error("Failed to parse {} as JSON", path.display())]
    #[diagnostic(
        code(pingone::cli::config_parse_error),
        help("Configuration files hold one JSON object of attribute values, as in a `terraform show -json` resource block")
    )]
    ConfigParse {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Offline validation reported errors
    #[error("Configuration is invalid: {errors} error(s)")]
    #[diagnostic(code(pingone::cli::invalid_configuration))]
    InvalidConfiguration {
        /// Number of error diagnostics
        errors: usize,
    },

    /// Tracing could not be initialised
    #[error("Tracing initialization failed: {message}")]
    #[diagnostic(
        code(pingone::cli::tracing_error),
        help("Check TF_LOG_PROVIDER_PINGONE and RUST_LOG for an invalid filter directive")
    )]
    Tracing {
        /// Cause
        message: String,
    },

    /// Output could not be encoded
    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(pingone::cli::output_error))]
    Output(#[source] serde_json::Error),
}

impl Error {
    /// An unknown type name.
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
