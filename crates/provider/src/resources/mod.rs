//! Managed `pingone_*` resource types.

pub mod gateway;
mod gateway_upgrade;
pub mod notification_policy;
pub mod notification_template_content;
pub mod trusted_email_domain;
pub mod user_role_assignment;
pub mod webhook;
mod webhook_upgrade;

use std::sync::Arc;

use pingone_framework::{Attribute, Diagnostics, Resource, State};
use pingone_sdk::classify::FirstOf;
use pingone_sdk::{ErrorClassifier, ProviderContext, first_of, not_found_warning};
use pingone_verify::p1_resource_id;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use gateway::GatewayResource;
pub use notification_policy::NotificationPolicyResource;
pub use notification_template_content::NotificationTemplateContentResource;
pub use trusted_email_domain::TrustedEmailDomainResource;
pub use user_role_assignment::UserRoleAssignmentResource;
pub use webhook::WebhookResource;

/// Every resource type the provider serves.
#[must_use]
pub fn all() -> Vec<Arc<dyn Resource<Context = ProviderContext>>> {
    vec![
        Arc::new(GatewayResource),
        Arc::new(NotificationPolicyResource),
        Arc::new(NotificationTemplateContentResource),
        Arc::new(TrustedEmailDomainResource),
        Arc::new(UserRoleAssignmentResource),
        Arc::new(WebhookResource),
    ]
}

/// Computed resource ID that survives plans.
pub(crate) fn id_attribute() -> Attribute {
    Attribute::string("The ID of the resource.")
        .computed()
        .use_state_for_unknown()
}

/// `environment_id`: required, validated, forces replacement.
pub(crate) fn environment_id_attribute(what: &str) -> Attribute {
    Attribute::string(&format!(
        "The ID of the environment to {what}.  Must be a valid PingOne resource ID.  This field is immutable and will trigger a replace plan if changed."
    ))
    .required()
    .requires_replace()
    .validator(p1_resource_id())
}

/// Classifier for in-place updates: an object deleted outside Terraform is a
/// warning and an empty result, anything else goes to `classifier`.
pub(crate) fn update_classifier(classifier: impl ErrorClassifier + 'static) -> FirstOf {
    first_of(vec![
        Box::new(not_found_warning) as Box<dyn ErrorClassifier>,
        Box::new(classifier) as Box<dyn ErrorClassifier>,
    ])
}

/// Decodes a document into a model, moving failures into `diagnostics`.
pub(crate) fn decode<M: DeserializeOwned>(document: &State, diagnostics: &mut Diagnostics) -> Option<M> {
    match document.get() {
        Ok(model) => Some(model),
        Err(diags) => {
            diagnostics.append(diags);
            None
        }
    }
}

/// Encodes a model into a fresh document.
pub(crate) fn encode<M: Serialize>(model: &M, diagnostics: &mut Diagnostics) -> State {
    let mut state = State::empty_object();
    let diags = state.set(model);
    let failed = diags.has_error();
    diagnostics.append(diags);
    if failed { State::removed() } else { state }
}
