//! Error types for the provider framework.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using the framework error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Faults in how a resource registered itself with the framework.
///
/// These are programming errors in a resource definition rather than user
/// input problems; user-facing problems travel as [`crate::Diagnostics`].
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A schema version has no upgrader from the version before it.
    #[error("Resource {type_name} is at schema version {current} but has no upgrader from version {missing}")]
    #[diagnostic(
        code(pingone_framework::missing_upgrader),
        help("Register an upgrader for every prior version between 0 and the current version")
    )]
    MissingUpgrader {
        /// Resource type name
        type_name: String,
        /// Current schema version
        current: i64,
        /// Prior version without an upgrader
        missing: i64,
    },

    /// An upgrader was registered for a version at or above the current one.
    #[error("Resource {type_name} registers an upgrader from version {version}, which is not below current version {current}")]
    #[diagnostic(code(pingone_framework::stray_upgrader))]
    StrayUpgrader {
        /// Resource type name
        type_name: String,
        /// Offending prior version
        version: i64,
        /// Current schema version
        current: i64,
    },

    /// Two resources or data sources share a type name.
    #[error("Duplicate type name registered: {type_name}")]
    #[diagnostic(code(pingone_framework::duplicate_type))]
    DuplicateTypeName {
        /// Type name
        type_name: String,
    },

    /// A type name is not prefixed by the provider name.
    #[error("Type name {type_name} must start with {prefix}_")]
    #[diagnostic(code(pingone_framework::type_prefix))]
    TypeNamePrefix {
        /// Type name
        type_name: String,
        /// Required provider prefix
        prefix: String,
    },
}
