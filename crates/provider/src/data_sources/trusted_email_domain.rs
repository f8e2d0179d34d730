//! `pingone_trusted_email_domain` data source

use async_trait::async_trait;
use pingone_framework::bridge::string_ok_to_tf;
use pingone_framework::validator::exactly_one_of;
use pingone_framework::{Attribute, DataSource, DataSourceReadRequest, DataSourceReadResponse, Diagnostics, Schema, Value};
use pingone_sdk::management::EmailDomain;
use pingone_sdk::{DefaultClassifier, ProviderContext, RetryPolicy, collect_pages, invoke};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::link_id_attribute;
use crate::resources::{decode, encode};

const LOOKUP_ATTRIBUTES: &[&str] = &["trusted_email_domain_id", "domain_name"];

/// Looks up one trusted email domain by ID or by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedEmailDomainDataSource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct TrustedEmailDomainDataSourceModel {
    id: Value<String>,
    environment_id: Value<String>,
    domain_name: Value<String>,
    trusted_email_domain_id: Value<String>,
}

impl TrustedEmailDomainDataSourceModel {
    fn to_state(&mut self, domain: &EmailDomain) {
        self.id = string_ok_to_tf(domain.id.as_deref());
        self.trusted_email_domain_id = self.id.clone();
        if let Some(environment) = &domain.environment {
            self.environment_id = Value::string(environment.id.as_str());
        }
        self.domain_name = Value::string(domain.domain_name.as_str());
    }
}

fn lookup_attribute() -> Attribute {
    Attribute::string(
        "A string that specifies the domain name to use, which must be provided and must be unique within an environment (for example, `demo.bxretail.org`).",
    )
    .optional()
    .validator(exactly_one_of(LOOKUP_ATTRIBUTES))
}

#[async_trait]
impl DataSource for TrustedEmailDomainDataSource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_trusted_email_domain"
    }

    fn schema(&self) -> Schema {
        Schema::new("Datasource to retrieve a Trusted Email Domain.")
            .attribute("id", Attribute::string("The ID of the resource.").computed())
            .attribute(
                "environment_id",
                link_id_attribute("The ID of the environment that is configured with the trusted email domain."),
            )
            .attribute("trusted_email_domain_id", lookup_attribute())
            .attribute("domain_name", lookup_attribute())
    }

    #[instrument(skip_all, fields(data_source = "pingone_trusted_email_domain"))]
    async fn read(&self, ctx: &ProviderContext, request: DataSourceReadRequest) -> DataSourceReadResponse {
        let mut response = DataSourceReadResponse::default();
        let Some(mut data) = decode::<TrustedEmailDomainDataSourceModel>(&request.config, &mut response.diagnostics)
        else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();

        let found = if let Some(domain_name) = data.domain_name.as_known() {
            let (domains, diags) = invoke(
                ctx,
                "ReadAllTrustedEmailDomains",
                || async move { collect_pages(client.trusted_email_domains(environment_id)).await.into_response() },
                &DefaultClassifier,
                &RetryPolicy::create_read(),
            )
            .await;
            response.diagnostics.append(diags);
            if response.diagnostics.has_error() {
                return response;
            }

            let found = domains
                .unwrap_or_default()
                .into_iter()
                .find(|domain| domain.domain_name == *domain_name);
            if found.is_none() {
                response.diagnostics.add_error(
                    "Cannot find trusted email domain from domain_name",
                    format!("The trusted email domain {domain_name} for environment {environment_id} cannot be found"),
                );
                return response;
            }
            found
        } else if let Some(id) = data.trusted_email_domain_id.as_known() {
            let id = id.as_str();
            let (found, diags) = invoke(
                ctx,
                "ReadOneTrustedEmailDomain",
                || async move { client.read_trusted_email_domain(environment_id, id).await },
                &DefaultClassifier,
                &RetryPolicy::create_read(),
            )
            .await;
            response.diagnostics.append(diags);
            if response.diagnostics.has_error() {
                return response;
            }
            found
        } else {
            response.diagnostics.append(missing_lookup());
            return response;
        };

        let Some(found) = found else {
            response.diagnostics.add_error(
                "Data object missing",
                "Cannot convert the data object to state as the data object is nil.  Please report this to the provider maintainers.",
            );
            return response;
        };

        data.to_state(&found);
        response.state = encode(&data, &mut response.diagnostics);
        response
    }
}

fn missing_lookup() -> Diagnostics {
    Diagnostics::from_error(
        "Missing parameter",
        "Cannot find the requested trusted email domain. trusted_email_domain_id or domain_name must be set.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::offline_context;
    use pingone_framework::{DataSourceServer, State};
    use serde_json::json;
    use std::sync::Arc;

    const ENV: &str = "11111111-1111-1111-1111-111111111111";

    #[test]
    fn test_both_lookups_rejected() {
        let diags = TrustedEmailDomainDataSource.schema().validate_config(&json!({
            "environment_id": ENV,
            "domain_name": "demo.example.org",
            "trusted_email_domain_id": ENV
        }));
        assert!(diags.has_error());
    }

    #[test]
    fn test_neither_lookup_rejected() {
        let diags = TrustedEmailDomainDataSource.schema().validate_config(&json!({"environment_id": ENV}));
        assert!(diags.has_error());
    }

    #[test]
    fn test_id_is_computed_only() {
        let diags = TrustedEmailDomainDataSource.schema().validate_config(&json!({
            "environment_id": ENV,
            "domain_name": "demo.example.org",
            "id": "x"
        }));
        assert!(diags.has_error());
    }

    #[tokio::test]
    async fn test_missing_lookup_reported_by_read() {
        let response = TrustedEmailDomainDataSource
            .read(
                &offline_context(),
                DataSourceReadRequest {
                    config: State::new(json!({"environment_id": ENV})),
                },
            )
            .await;
        assert_eq!(
            response.diagnostics.errors().next().map(|d| d.summary.as_str()),
            Some("Missing parameter")
        );
        assert!(!response.state.is_present());
    }

    #[tokio::test]
    async fn test_server_validates_before_calling() {
        let server = DataSourceServer::new(Arc::new(TrustedEmailDomainDataSource));
        let result = server
            .read(&offline_context(), &json!({"environment_id": "bad", "domain_name": "demo.example.org"}))
            .await;
        assert!(result.diagnostics.has_error());
        assert!(!result.state.is_present());
    }
}
