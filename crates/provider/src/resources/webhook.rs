//! `pingone_webhook`

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use pingone_framework::bridge::{bool_ok_to_tf, set_to_vec, string_ok_to_tf};
use pingone_framework::validator::{
    at_least_n_elements, at_most_n_elements, elements, length_at_least, one_of, regex_matches,
};
use pingone_framework::{
    Attribute, AttributeType, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, Diagnostics,
    ImportComponent, ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse, UpgradeRegistry,
    Value,
};
use pingone_sdk::management::webhooks::{FORMATS, HttpEndpoint, INCLUDED_TAGS};
use pingone_sdk::management::{FilterOptions, ObjectRef, Subscription};
use pingone_sdk::{
    DefaultClassifier, ProviderContext, RetryPolicy, check_environment_exists_on_permissions_error, invoke,
    not_found_warning,
};
use pingone_verify::p1_resource_id;
use pingone_verify::patterns::{HTTPS_URL, P1_RESOURCE_ID_PATTERN};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::{decode, encode, environment_id_attribute, id_attribute, update_classifier, webhook_upgrade};

const MAX_INCLUDED_IDS: usize = 10;

/// Webhook subscription resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct WebhookModel {
    id: Value<String>,
    environment_id: Value<String>,
    name: Value<String>,
    enabled: Value<bool>,
    http_endpoint_url: Value<String>,
    http_endpoint_headers: Value<BTreeMap<String, String>>,
    verify_tls_certificates: Value<bool>,
    tls_client_auth_key_pair_id: Value<String>,
    format: Value<String>,
    filter_options: Value<FilterOptionsModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct FilterOptionsModel {
    included_action_types: Value<BTreeSet<String>>,
    included_application_ids: Value<BTreeSet<String>>,
    included_population_ids: Value<BTreeSet<String>>,
    included_tags: Value<BTreeSet<String>>,
    ip_address_exposed: Value<bool>,
    useragent_exposed: Value<bool>,
}

fn refs(ids: &Value<BTreeSet<String>>) -> Option<Vec<ObjectRef>> {
    set_to_vec(ids).map(|ids| ids.into_iter().map(ObjectRef::new).collect())
}

fn ids(refs: Option<&[ObjectRef]>) -> Value<BTreeSet<String>> {
    Value::from_option(refs.map(|refs| refs.iter().map(|r| r.id.clone()).collect()))
}

fn strings(values: Option<&[String]>) -> Value<BTreeSet<String>> {
    Value::from_option(values.map(|values| values.iter().cloned().collect()))
}

impl FilterOptionsModel {
    fn expand(&self) -> FilterOptions {
        FilterOptions {
            included_action_types: set_to_vec(&self.included_action_types).unwrap_or_default(),
            included_applications: refs(&self.included_application_ids),
            included_populations: refs(&self.included_population_ids),
            included_tags: set_to_vec(&self.included_tags),
            ip_address_exposed: self.ip_address_exposed.to_option(),
            user_agent_exposed: self.useragent_exposed.to_option(),
        }
    }

    fn from_api(options: &FilterOptions) -> Self {
        Self {
            included_action_types: Value::known(options.included_action_types.iter().cloned().collect()),
            included_application_ids: ids(options.included_applications.as_deref()),
            included_population_ids: ids(options.included_populations.as_deref()),
            included_tags: strings(options.included_tags.as_deref()),
            ip_address_exposed: bool_ok_to_tf(options.ip_address_exposed),
            useragent_exposed: bool_ok_to_tf(options.user_agent_exposed),
        }
    }
}

impl WebhookModel {
    fn expand(&self) -> Result<Subscription, Diagnostics> {
        let verify_tls_certificates = self.verify_tls_certificates.to_option().unwrap_or(true);
        if self.tls_client_auth_key_pair_id.is_known() && !verify_tls_certificates {
            return Err(Diagnostics::from_error(
                "Invalid configuration",
                "`verify_tls_certificates` must be `true` when `tls_client_auth_key_pair_id` is set.",
            ));
        }

        Ok(Subscription {
            id: None,
            environment: None,
            name: self.name.value_str().to_string(),
            enabled: self.enabled.to_option().unwrap_or(false),
            http_endpoint: HttpEndpoint {
                url: self.http_endpoint_url.value_str().to_string(),
                headers: self.http_endpoint_headers.to_option(),
            },
            verify_tls_certificates,
            tls_client_auth_key_pair: self.tls_client_auth_key_pair_id.as_known().map(ObjectRef::new),
            format: self.format.value_str().to_string(),
            filter_options: self
                .filter_options
                .as_known()
                .map(FilterOptionsModel::expand)
                .unwrap_or_default(),
        })
    }

    fn to_state(&mut self, subscription: &Subscription) {
        self.id = string_ok_to_tf(subscription.id.as_deref());
        if let Some(environment) = &subscription.environment {
            self.environment_id = Value::string(environment.id.as_str());
        }
        self.name = Value::string(subscription.name.as_str());
        self.enabled = Value::known(subscription.enabled);
        self.http_endpoint_url = Value::string(subscription.http_endpoint.url.as_str());
        self.http_endpoint_headers = Value::from_option(subscription.http_endpoint.headers.clone());
        self.verify_tls_certificates = Value::known(subscription.verify_tls_certificates);
        self.tls_client_auth_key_pair_id = string_ok_to_tf(
            subscription
                .tls_client_auth_key_pair
                .as_ref()
                .map(|key| key.id.as_str()),
        );
        self.format = Value::string(subscription.format.as_str());
        self.filter_options = Value::known(FilterOptionsModel::from_api(&subscription.filter_options));
    }
}

fn included_ids_attribute(description: &str) -> Attribute {
    Attribute::set(AttributeType::String, description)
        .optional()
        .validator(at_most_n_elements(MAX_INCLUDED_IDS))
        .validator(elements(p1_resource_id()))
}

#[async_trait]
impl Resource for WebhookResource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_webhook"
    }

    fn schema(&self) -> Schema {
        Schema::new("Resource to create and manage PingOne Webhooks / Data Subscriptions.")
            .version(1)
            .attribute("id", id_attribute())
            .attribute("environment_id", environment_id_attribute("create the webhook in"))
            .attribute(
                "name",
                Attribute::string("The webhook name.")
                    .required()
                    .validator(length_at_least(1)),
            )
            .attribute(
                "enabled",
                Attribute::bool("Whether the webhook is active.  A suspended webhook keeps matched events for up to two weeks and delivers them once re-enabled.  Defaults to `false`.")
                    .optional()
                    .computed()
                    .default_value(json!(false)),
            )
            .attribute(
                "http_endpoint_url",
                Attribute::string("The HTTPS URL event messages are sent to.")
                    .required()
                    .validator(regex_matches(HTTPS_URL.clone(), "Must be a valid HTTPS URL")),
            )
            .attribute(
                "http_endpoint_headers",
                Attribute::map(
                    AttributeType::String,
                    "Headers applied to the outbound request, for example `Authorization`, so the endpoint can authenticate PingOne.",
                )
                .optional()
                .sensitive(),
            )
            .attribute(
                "verify_tls_certificates",
                Attribute::bool("Whether the endpoint certificate is verified.  Defaults to `true`.")
                    .optional()
                    .computed()
                    .default_value(json!(true)),
            )
            .attribute(
                "tls_client_auth_key_pair_id",
                Attribute::string("The ID of an `OUTBOUND_MTLS` key used to authenticate the webhook.  Requires `verify_tls_certificates` to be `true`.")
                    .optional()
                    .validator(p1_resource_id()),
            )
            .attribute(
                "format",
                Attribute::string("The format events are delivered in.")
                    .required()
                    .validator(one_of(FORMATS)),
            )
            .attribute(
                "filter_options",
                Attribute::single_nested(
                    vec![
                        (
                            "included_action_types",
                            Attribute::set(AttributeType::String, "Action types that trigger the webhook.")
                                .required()
                                .validator(at_least_n_elements(1))
                                .validator(elements(length_at_least(1))),
                        ),
                        (
                            "included_application_ids",
                            included_ids_attribute("Applications whose events are monitored, at most 10.  All applications when unset."),
                        ),
                        (
                            "included_population_ids",
                            included_ids_attribute("Populations whose users' events are monitored, at most 10."),
                        ),
                        (
                            "included_tags",
                            Attribute::set(AttributeType::String, "Tags an event must carry to be monitored.")
                                .optional()
                                .validator(elements(one_of(INCLUDED_TAGS))),
                        ),
                        (
                            "ip_address_exposed",
                            Attribute::bool("Whether the actor's IP address is present in the event source.  Defaults to `false`.")
                                .optional()
                                .computed()
                                .default_value(json!(false)),
                        ),
                        (
                            "useragent_exposed",
                            Attribute::bool("Whether the User-Agent header is present in the event source.  Defaults to `false`.")
                                .optional()
                                .computed()
                                .default_value(json!(false)),
                        ),
                    ],
                    "The platform event filters that trigger this webhook.",
                )
                .required(),
            )
    }

    #[instrument(skip_all, fields(resource = "pingone_webhook"))]
    async fn create(&self, ctx: &ProviderContext, request: CreateRequest) -> CreateResponse {
        let mut response = CreateResponse::default();
        let Some(mut plan) = decode::<WebhookModel>(&request.plan, &mut response.diagnostics) else {
            return response;
        };
        let body = match plan.expand() {
            Ok(body) => body,
            Err(diags) => {
                response.diagnostics.append(diags);
                return response;
            }
        };

        let client = &ctx.client;
        let environment_id = plan.environment_id.value_str().to_string();
        let (environment_id, body) = (environment_id.as_str(), &body);

        let (created, diags) = invoke(
            ctx,
            "CreateSubscription",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.create_subscription(environment_id, body).await,
                )
                .await
            },
            &DefaultClassifier,
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        let Some(created) = created.filter(|_| !response.diagnostics.has_error()) else {
            return response;
        };

        plan.to_state(&created);
        response.state = encode(&plan, &mut response.diagnostics);
        response
    }

    #[instrument(skip_all, fields(resource = "pingone_webhook"))]
    async fn read(&self, ctx: &ProviderContext, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();
        let Some(mut data) = decode::<WebhookModel>(&request.state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str().to_string();
        let id = data.id.value_str().to_string();
        let (environment_id, id) = (environment_id.as_str(), id.as_str());

        let (found, diags) = invoke(
            ctx,
            "ReadOneSubscription",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.read_subscription(environment_id, id).await,
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
        let Some(found) = found else {
            return response;
        };

        data.to_state(&found);
        response.state = encode(&data, &mut response.diagnostics);
        response
    }

    #[instrument(skip_all, fields(resource = "pingone_webhook"))]
    async fn update(&self, ctx: &ProviderContext, request: UpdateRequest) -> UpdateResponse {
        let mut response = UpdateResponse::default();
        let Some(mut plan) = decode::<WebhookModel>(&request.plan, &mut response.diagnostics) else {
            return response;
        };
        let body = match plan.expand() {
            Ok(body) => body,
            Err(diags) => {
                response.diagnostics.append(diags);
                return response;
            }
        };

        let client = &ctx.client;
        let environment_id = plan.environment_id.value_str().to_string();
        let id = plan.id.value_str().to_string();
        let (environment_id, id, body) = (environment_id.as_str(), id.as_str(), &body);

        let (updated, diags) = invoke(
            ctx,
            "UpdateSubscription",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.update_subscription(environment_id, id, body).await,
                )
                .await
            },
            &update_classifier(DefaultClassifier),
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        let Some(updated) = updated.filter(|_| !response.diagnostics.has_error()) else {
            return response;
        };

        plan.to_state(&updated);
        response.state = encode(&plan, &mut response.diagnostics);
        response
    }

    #[instrument(skip_all, fields(resource = "pingone_webhook"))]
    async fn delete(&self, ctx: &ProviderContext, request: DeleteRequest) -> DeleteResponse {
        let mut response = DeleteResponse::default();
        let Some(data) = decode::<WebhookModel>(&request.prior_state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();
        let id = data.id.value_str();

        let (_, diags) = invoke(
            ctx,
            "DeleteSubscription",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.delete_subscription(environment_id, id).await,
                )
                .await
            },
            &not_found_warning,
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        response
    }

    fn import_components(&self) -> Option<Vec<ImportComponent>> {
        Some(vec![
            ImportComponent::new("environment_id", "environment_id", P1_RESOURCE_ID_PATTERN),
            ImportComponent::primary("subscription_id", P1_RESOURCE_ID_PATTERN),
        ])
    }

    fn upgrade_registry(&self) -> UpgradeRegistry {
        UpgradeRegistry::new(1).register(0, webhook_upgrade::v0_to_v1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV: &str = "11111111-1111-1111-1111-111111111111";

    fn config() -> serde_json::Value {
        json!({
            "environment_id": ENV,
            "name": "audit",
            "http_endpoint_url": "https://hooks.example.com/p1",
            "format": "ACTIVITY",
            "filter_options": {"included_action_types": ["USER.CREATED"]}
        })
    }

    #[test]
    fn test_expand_applies_planned_defaults() {
        let schema = WebhookResource.schema();
        let planned = pingone_framework::plan::plan_resource_change(&schema, None, &config()).planned;
        let model: WebhookModel = serde_json::from_value(planned).unwrap();
        let body = serde_json::to_value(model.expand().unwrap()).unwrap();
        assert_eq!(body["enabled"], json!(false));
        assert_eq!(body["verifyTlsCertificates"], json!(true));
        assert_eq!(body["filterOptions"]["ipAddressExposed"], json!(false));
        assert_eq!(body["filterOptions"]["userAgentExposed"], json!(false));
        assert!(body.get("tlsClientAuthKeyPair").is_none());
    }

    #[test]
    fn test_key_pair_requires_tls_verification() {
        let model = WebhookModel {
            verify_tls_certificates: Value::known(false),
            tls_client_auth_key_pair_id: Value::string(ENV),
            ..WebhookModel::default()
        };
        assert!(model.expand().unwrap_err().has_error());
    }

    #[test]
    fn test_plain_http_rejected() {
        let mut config = config();
        config["http_endpoint_url"] = json!("http://hooks.example.com/p1");
        let diags = WebhookResource.schema().validate_config(&config);
        assert_eq!(
            diags.errors().next().and_then(|d| d.path.as_ref()).map(ToString::to_string),
            Some("http_endpoint_url".to_string())
        );
    }

    #[test]
    fn test_to_state_maps_included_ids() {
        let mut model = WebhookModel::default();
        let subscription: Subscription = serde_json::from_value(json!({
            "id": "w1",
            "environment": {"id": ENV},
            "name": "audit",
            "enabled": true,
            "httpEndpoint": {"url": "https://hooks.example.com/p1"},
            "verifyTlsCertificates": true,
            "format": "SPLUNK",
            "filterOptions": {
                "includedActionTypes": ["USER.CREATED", "USER.DELETED"],
                "includedApplications": [{"id": "a2"}, {"id": "a1"}]
            }
        }))
        .unwrap();
        model.to_state(&subscription);

        let filter = model.filter_options.as_known().unwrap();
        assert_eq!(
            filter.included_application_ids,
            Value::known(BTreeSet::from(["a1".to_string(), "a2".to_string()]))
        );
        assert!(filter.included_population_ids.is_null());
        assert!(filter.ip_address_exposed.is_null());
        assert!(model.http_endpoint_headers.is_null());
        assert!(model.tls_client_auth_key_pair_id.is_null());
    }

    #[test]
    fn test_upgrade_chain_is_contiguous() {
        assert!(WebhookResource.upgrade_registry().verify("pingone_webhook").is_ok());
    }
}
