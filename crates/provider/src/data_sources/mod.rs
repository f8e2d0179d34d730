//! Read-only `pingone_*` data source types.

pub mod licenses;
pub mod trusted_email_domain;

use std::sync::Arc;

use pingone_framework::{Attribute, DataSource};
use pingone_sdk::ProviderContext;
use pingone_verify::p1_resource_id;

pub use licenses::LicensesDataSource;
pub use trusted_email_domain::TrustedEmailDomainDataSource;

/// Every data source type the provider serves.
#[must_use]
pub fn all() -> Vec<Arc<dyn DataSource<Context = ProviderContext>>> {
    vec![Arc::new(LicensesDataSource), Arc::new(TrustedEmailDomainDataSource)]
}

/// A required link to another PingOne object.
pub(crate) fn link_id_attribute(description: &str) -> Attribute {
    Attribute::string(description).required().validator(p1_resource_id())
}
