//! Typed PingOne management models and the endpoints that carry them.
//!
//! Wire fields the service may omit are `Option<T>`. Each submodule adds
//! its endpoint helpers to [`ApiClient`](crate::ApiClient); the helpers only
//! build paths and pick operation names, the kernel does everything else.

pub mod email_domains;
pub mod gateways;
pub mod licenses;
pub mod notification_policies;
pub mod role_assignments;
pub mod template_contents;
pub mod webhooks;

use serde::{Deserialize, Serialize};

pub use email_domains::EmailDomain;
pub use gateways::{
    AttributeMapping, Gateway, GatewayType, GatewayVariant, Kerberos, LdapGateway, NetworkPolicyServer,
    NewUserLookup, RadiusClient, RadiusGateway, UserType,
};
pub use licenses::License;
pub use notification_policies::{
    CooldownConfiguration, CooldownMethod, CooldownPeriod, CountryLimit, NotificationsPolicy, ProviderCondition,
    ProviderConfiguration, Quota,
};
pub use role_assignments::{RoleAssignment, RoleAssignmentScope, ScopeType};
pub use template_contents::{TemplateContent, TemplateContentEmail};
pub use webhooks::{FilterOptions, Subscription};

/// A link to another PingOne object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Referenced object's ID
    pub id: String,
}

impl ObjectRef {
    /// Reference to `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
