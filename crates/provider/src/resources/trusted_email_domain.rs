//! `pingone_trusted_email_domain`

use async_trait::async_trait;
use pingone_framework::bridge::string_ok_to_tf;
use pingone_framework::validator::length_at_least;
use pingone_framework::{
    Attribute, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ImportComponent, ReadRequest,
    ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse, Value,
};
use pingone_sdk::management::EmailDomain;
use pingone_sdk::{
    DefaultClassifier, ProviderContext, RetryPolicy, check_environment_exists_on_permissions_error, invoke,
    not_found_warning,
};
use pingone_verify::patterns::P1_RESOURCE_ID_PATTERN;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{decode, encode, environment_id_attribute, id_attribute};

/// Trusted email domain resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedEmailDomainResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct TrustedEmailDomainModel {
    id: Value<String>,
    environment_id: Value<String>,
    domain_name: Value<String>,
    trusted_email_domain_id: Value<String>,
}

impl TrustedEmailDomainModel {
    fn to_state(&mut self, domain: &EmailDomain) {
        self.id = string_ok_to_tf(domain.id.as_deref());
        self.trusted_email_domain_id = self.id.clone();
        if let Some(environment) = &domain.environment {
            self.environment_id = Value::string(environment.id.as_str());
        }
        self.domain_name = Value::string(domain.domain_name.as_str());
    }
}

#[async_trait]
impl Resource for TrustedEmailDomainResource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_trusted_email_domain"
    }

    fn schema(&self) -> Schema {
        Schema::new("Resource to create and manage PingOne Trusted Email Domains.")
            .attribute("id", id_attribute())
            .attribute("environment_id", environment_id_attribute("create the trusted email domain in"))
            .attribute(
                "domain_name",
                Attribute::string(
                    "A string that specifies the domain name to use, which must be provided and must be unique within an environment (for example, `demo.bxretail.org`).  This field is immutable and will trigger a replace plan if changed.",
                )
                .required()
                .requires_replace()
                .validator(length_at_least(1)),
            )
            .attribute(
                "trusted_email_domain_id",
                Attribute::string("The ID of the trusted email domain.").computed().use_state_for_unknown(),
            )
    }

    #[instrument(skip_all, fields(resource = "pingone_trusted_email_domain"))]
    async fn create(&self, ctx: &ProviderContext, request: CreateRequest) -> CreateResponse {
        let mut response = CreateResponse::default();
        let Some(mut plan) = decode::<TrustedEmailDomainModel>(&request.plan, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = plan.environment_id.value_str();
        let body = EmailDomain::new(plan.domain_name.value_str());
        let body = &body;

        let (created, diags) = invoke(
            ctx,
            "CreateTrustedEmailDomain",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.create_trusted_email_domain(environment_id, body).await,
                )
                .await
            },
            &DefaultClassifier,
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        if response.diagnostics.has_error() {
            return response;
        }
        let Some(created) = created else {
            response.diagnostics.add_error(
                "Unexpected empty response",
                "The create call returned no body. Please report this issue to the provider maintainers.",
            );
            return response;
        };

        plan.to_state(&created);
        response.state = encode(&plan, &mut response.diagnostics);
        response
    }

    #[instrument(skip_all, fields(resource = "pingone_trusted_email_domain"))]
    async fn read(&self, ctx: &ProviderContext, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();
        let Some(mut data) = decode::<TrustedEmailDomainModel>(&request.state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();
        let id = data.id.value_str();

        let (found, diags) = invoke(
            ctx,
            "ReadOneTrustedEmailDomain",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.read_trusted_email_domain(environment_id, id).await,
                )
                .await
            },
            &not_found_warning,
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        if response.diagnostics.has_error() {
            response.state = request.state;
            return response;
        }

        // Gone: leave the state removed.
        let Some(found) = found else {
            return response;
        };
        data.to_state(&found);
        response.state = encode(&data, &mut response.diagnostics);
        response
    }

    async fn update(&self, _ctx: &ProviderContext, request: UpdateRequest) -> UpdateResponse {
        // Every configurable attribute forces replacement.
        UpdateResponse {
            state: request.plan,
            ..UpdateResponse::default()
        }
    }

    #[instrument(skip_all, fields(resource = "pingone_trusted_email_domain"))]
    async fn delete(&self, ctx: &ProviderContext, request: DeleteRequest) -> DeleteResponse {
        let mut response = DeleteResponse::default();
        let Some(data) = decode::<TrustedEmailDomainModel>(&request.prior_state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();
        let id = data.id.value_str();

        let (_, diags) = invoke(
            ctx,
            "DeleteTrustedEmailDomain",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.delete_trusted_email_domain(environment_id, id).await,
                )
                .await
            },
            &not_found_warning,
            &RetryPolicy::default(),
        )
        .await;
        response.diagnostics.append(diags);
        response
    }

    fn import_components(&self) -> Option<Vec<ImportComponent>> {
        Some(vec![
            ImportComponent::new("environmentID", "environment_id", P1_RESOURCE_ID_PATTERN),
            ImportComponent::primary("trustedEmailDomainID", P1_RESOURCE_ID_PATTERN),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingone_framework::{ResourceServer, State};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_to_state_mirrors_id() {
        let mut model = TrustedEmailDomainModel::default();
        model.to_state(&EmailDomain {
            id: Some("d1".to_string()),
            environment: Some(pingone_sdk::management::ObjectRef::new("e1")),
            domain_name: "demo.example.org".to_string(),
        });
        assert_eq!(model.id, Value::string("d1"));
        assert_eq!(model.trusted_email_domain_id, Value::string("d1"));
        assert_eq!(model.environment_id, Value::string("e1"));
    }

    #[test]
    fn test_invalid_environment_id_rejected_offline() {
        let server: ResourceServer<ProviderContext> = ResourceServer::new(Arc::new(TrustedEmailDomainResource));
        let diags = server.validate_config(&json!({"environment_id": "not-an-id", "domain_name": "demo.example.org"}));
        assert!(diags.has_error());
        assert_eq!(
            diags.errors().next().and_then(|d| d.path.as_ref()).map(ToString::to_string),
            Some("environment_id".to_string())
        );
    }

    #[test]
    fn test_domain_change_forces_replacement() {
        let schema = TrustedEmailDomainResource.schema();
        let prior = json!({
            "id": "d1",
            "environment_id": "11111111-1111-1111-1111-111111111111",
            "domain_name": "a.example.org",
            "trusted_email_domain_id": "d1"
        });
        let config = json!({
            "environment_id": "11111111-1111-1111-1111-111111111111",
            "domain_name": "b.example.org"
        });
        let change = pingone_framework::plan::plan_resource_change(&schema, Some(&prior), &config);
        let replaced: Vec<String> = change.requires_replace.iter().map(ToString::to_string).collect();
        assert_eq!(replaced, ["domain_name"]);
        assert_eq!(change.planned["id"], json!("d1"));
        assert!(!State::new(change.planned).has_unknown());
    }
}
