//! Provider-side contract for the PingOne Terraform provider.
//!
//! This crate owns everything a resource needs that is not PingOne specific:
//!
//! - [`Value`] and [`Optional`]: the tri-state state cell and the three-cell
//!   request field, plus the [`bridge`] conversions between them and API shapes
//! - [`Diagnostics`] and [`AttributePath`]: ordered, attributable feedback
//! - [`Schema`]: attributes, flags, defaults, plan modifiers and validators
//! - [`Resource`] / [`DataSource`]: the lifecycle traits each type implements
//! - [`ResourceServer`]: drives a resource through validate, plan, apply,
//!   read, import and upgrade the way the plugin host would
//! - [`UpgradeRegistry`]: per-resource prior-version transformers
//!
//! Nothing here talks to the network.

pub mod bridge;
pub mod diag;
pub mod error;
pub mod import;
pub mod optional;
pub mod path;
pub mod plan;
pub mod resource;
pub mod schema;
pub mod server;
pub mod state;
pub mod upgrade;
pub mod validator;
pub mod value;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use import::{ImportComponent, ImportedId, parse_import_id};
pub use optional::{EmptyPolicy, Optional};
pub use path::{AttributePath, PathStep};
pub use plan::PlannedChange;
pub use resource::{
    CreateRequest, CreateResponse, DataSource, DataSourceReadRequest, DataSourceReadResponse,
    DeleteRequest, DeleteResponse, ModifyPlanRequest, ModifyPlanResponse, ReadRequest,
    ReadResponse, Resource, UpdateRequest, UpdateResponse,
};
pub use schema::{Attribute, AttributeKind, AttributeType, NestingMode, PlanModifier, Schema};
pub use server::{ApplyResult, DataSourceServer, PlanResult, ReadResult, ResourceServer};
pub use state::{Config, Plan, State};
pub use upgrade::{StateUpgradeFn, UpgradeRegistry};
pub use validator::{ValidationRequest, Validator};
pub use value::{UNKNOWN_SENTINEL, Value};
