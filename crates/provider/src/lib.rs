//! PingOne resources and data sources for Terraform.
//!
//! - [`resources`]: the managed `pingone_*` resource types
//! - [`data_sources`]: the read-only `pingone_*` lookups
//! - [`ProviderServer`]: provider configuration and routing of host requests
//!   by type name
//! - [`logging`]: stderr tracing for the plugin process
//! - [`cli`]: the offline command line

pub mod cli;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resources;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use provider::{ProviderServer, TYPE_PREFIX, VERSION};
