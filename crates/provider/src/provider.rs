//! The provider server: configuration and routing of host requests by type name.

use std::collections::BTreeMap;
use std::sync::Arc;

use pingone_framework::validator::one_of;
use pingone_framework::{
    ApplyResult, Attribute, DataSource, DataSourceServer, Diagnostics, PlanResult, ReadResult, Resource,
    ResourceServer, Schema, State,
};
use pingone_sdk::{ApiClient, ClientConfig, ProviderContext, Region};
use pingone_verify::p1_resource_id;
use serde_json::Value as Json;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::{data_sources, resources};

/// Prefix every type name carries.
pub const TYPE_PREFIX: &str = "pingone";

/// Version reported in the user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Routes host requests to the registered resource and data source types.
///
/// A server starts unconfigured; [`ProviderServer::configure`] builds the
/// API client. Offline operations (schemas, validation, state upgrades) work
/// without it.
#[derive(Debug, Clone)]
pub struct ProviderServer {
    resources: BTreeMap<&'static str, ResourceServer<ProviderContext>>,
    data_sources: BTreeMap<&'static str, DataSourceServer<ProviderContext>>,
    context: Option<ProviderContext>,
}

impl ProviderServer {
    /// A server for every built-in type.
    pub fn new() -> Result<Self> {
        Self::with_types(resources::all(), data_sources::all())
    }

    /// A server for the given types.
    ///
    /// Fails when a name lacks the `pingone_` prefix, when two types of the
    /// same kind share a name, or when a resource's upgraders do not cover
    /// every prior schema version.
    pub fn with_types(
        resources: Vec<Arc<dyn Resource<Context = ProviderContext>>>,
        data_sources: Vec<Arc<dyn DataSource<Context = ProviderContext>>>,
    ) -> Result<Self> {
        let mut resource_servers = BTreeMap::new();
        for resource in resources {
            let type_name = check_type_name(resource.type_name())?;
            resource.upgrade_registry().verify(type_name)?;
            if resource_servers
                .insert(type_name, ResourceServer::new(resource))
                .is_some()
            {
                return Err(duplicate(type_name));
            }
        }

        let mut data_source_servers = BTreeMap::new();
        for data_source in data_sources {
            let type_name = check_type_name(data_source.type_name())?;
            if data_source_servers
                .insert(type_name, DataSourceServer::new(data_source))
                .is_some()
            {
                return Err(duplicate(type_name));
            }
        }

        Ok(Self {
            resources: resource_servers,
            data_sources: data_source_servers,
            context: None,
        })
    }

    /// Uses an existing context instead of configuring one.
    #[must_use]
    pub fn with_context(mut self, context: ProviderContext) -> Self {
        self.context = Some(context);
        self
    }

    /// A view of this server whose calls observe `cancel`.
    #[must_use]
    pub fn for_request(&self, cancel: CancellationToken) -> Self {
        Self {
            resources: self.resources.clone(),
            data_sources: self.data_sources.clone(),
            context: self.context.as_ref().map(|ctx| ctx.with_cancellation(cancel)),
        }
    }

    /// Whether [`configure`](Self::configure) has succeeded.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.context.is_some()
    }

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Registered data source type names, sorted.
    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    /// The server for a resource type.
    pub fn resource(&self, type_name: &str) -> Result<&ResourceServer<ProviderContext>> {
        self.resources
            .get(type_name)
            .ok_or_else(|| Error::unknown_type(type_name))
    }

    /// The server for a data source type.
    pub fn data_source(&self, type_name: &str) -> Result<&DataSourceServer<ProviderContext>> {
        self.data_sources
            .get(type_name)
            .ok_or_else(|| Error::unknown_type(type_name))
    }

    /// Provider configuration schema.
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new("The PingOne provider manages PingOne Identity Cloud configuration.")
            .attribute(
                "client_id",
                Attribute::string("Client ID for the worker app client.  Default value can be set with the `PINGONE_CLIENT_ID` environment variable.")
                    .optional(),
            )
            .attribute(
                "client_secret",
                Attribute::string("Client secret for the worker app client.  Default value can be set with the `PINGONE_CLIENT_SECRET` environment variable.")
                    .optional()
                    .sensitive(),
            )
            .attribute(
                "environment_id",
                Attribute::string("Environment ID for the worker app client.  Default value can be set with the `PINGONE_ENVIRONMENT_ID` environment variable.")
                    .optional()
                    .validator(p1_resource_id()),
            )
            .attribute(
                "api_access_token",
                Attribute::string("The access token used for provider resource management against the PingOne management API.  Default value can be set with the `PINGONE_API_ACCESS_TOKEN` environment variable.")
                    .optional()
                    .sensitive(),
            )
            .attribute(
                "region_code",
                Attribute::string(&format!(
                    "The PingOne region to use, which selects the appropriate service endpoints.  Options are {}.  Default value can be set with the `PINGONE_REGION_CODE` environment variable.",
                    Region::valid_codes()
                ))
                .optional()
                .validator(one_of(&Region::ALL.map(Region::code))),
            )
            .attribute(
                "http_proxy",
                Attribute::string("Full URL for the http/https proxy service, for example `http://127.0.0.1:8090`.  Default value can be set with the `HTTP_PROXY` or `HTTPS_PROXY` environment variables.")
                    .optional(),
            )
            .attribute(
                "append_user_agent",
                Attribute::string("A custom string value to append to the end of the `User-Agent` header when making API requests to the PingOne service.  Default value can be set with the `PINGONE_TF_APPEND_USER_AGENT` environment variable.")
                    .optional(),
            )
            .attribute(
                "service_endpoints",
                Attribute::single_nested(
                    vec![
                        (
                            "api_hostname",
                            Attribute::string("Hostname for the PingOne management service API.  Default value can be set with the `PINGONE_API_SERVICE_HOSTNAME` environment variable.")
                                .required(),
                        ),
                        (
                            "auth_hostname",
                            Attribute::string("Hostname for the PingOne authentication service API.  Default value can be set with the `PINGONE_AUTH_SERVICE_HOSTNAME` environment variable.")
                                .required(),
                        ),
                    ],
                    "A single block containing configuration items to override API service endpoints.",
                )
                .optional(),
            )
    }

    /// Validates the provider block, merges environment defaults and builds
    /// the API client.
    #[instrument(skip_all)]
    pub fn configure(&mut self, config: &Json) -> Diagnostics {
        let mut diagnostics = Self::schema().validate_config(config);
        if diagnostics.has_error() {
            return diagnostics;
        }

        let client_config = match serde_json::from_value::<ClientConfig>(config.clone()) {
            Ok(client_config) => client_config.with_env_overrides(),
            Err(e) => {
                diagnostics.add_error(
                    "Unable to read provider configuration",
                    format!("The provider block could not be decoded: {e}"),
                );
                return diagnostics;
            }
        };

        match ApiClient::new(&client_config, VERSION) {
            Ok(client) => {
                info!(api_base = client.api_base(), "Provider configured");
                self.context = Some(ProviderContext::new(Arc::new(client), client_config.retry));
            }
            Err(e) => diagnostics.add_error(
                "Unable to configure the PingOne client",
                format!("{e}  Check the provider block and the PINGONE_* environment variables."),
            ),
        }
        diagnostics
    }

    fn context(&self) -> std::result::Result<&ProviderContext, Diagnostics> {
        self.context.as_ref().ok_or_else(|| {
            Diagnostics::from_error(
                "Provider not configured",
                "The provider has not been configured, so the request cannot reach PingOne. Please report this issue to the provider maintainers.",
            )
        })
    }

    /// Validates a resource configuration.
    #[must_use]
    pub fn validate_resource_config(&self, type_name: &str, config: &Json) -> Diagnostics {
        match self.resource(type_name) {
            Ok(server) => server.validate_config(config),
            Err(e) => unknown_type_diagnostics(&e),
        }
    }

    /// Validates a data source configuration.
    #[must_use]
    pub fn validate_data_source_config(&self, type_name: &str, config: &Json) -> Diagnostics {
        match self.data_source(type_name) {
            Ok(server) => server.schema().validate_config(config),
            Err(e) => unknown_type_diagnostics(&e),
        }
    }

    /// Plans a change to one resource.
    pub async fn plan_resource_change(&self, type_name: &str, prior: &State, config: &Json) -> PlanResult {
        let (server, ctx) = match self.route(type_name) {
            Ok(routed) => routed,
            Err(diagnostics) => {
                return PlanResult {
                    diagnostics,
                    ..PlanResult::default()
                };
            }
        };
        server.plan_change(ctx, prior, config).await
    }

    /// Applies a planned change to one resource.
    pub async fn apply_resource_change(
        &self,
        type_name: &str,
        prior: &State,
        planned: &State,
        config: &Json,
    ) -> ApplyResult {
        let (server, ctx) = match self.route(type_name) {
            Ok(routed) => routed,
            Err(diagnostics) => {
                return ApplyResult {
                    state: prior.clone(),
                    diagnostics,
                };
            }
        };
        server.apply_change(ctx, prior, planned, config).await
    }

    /// Refreshes one resource.
    pub async fn read_resource(&self, type_name: &str, state: &State) -> ReadResult {
        match self.route(type_name) {
            Ok((server, ctx)) => server.read(ctx, state).await,
            Err(diagnostics) => ReadResult {
                state: state.clone(),
                diagnostics,
            },
        }
    }

    /// Imports one resource by its composite ID.
    pub async fn import_resource(&self, type_name: &str, id: &str) -> ReadResult {
        match self.route(type_name) {
            Ok((server, ctx)) => server.import(ctx, id).await,
            Err(diagnostics) => ReadResult {
                diagnostics,
                ..ReadResult::default()
            },
        }
    }

    /// Upgrades stored state written at `version` to the current schema.
    pub fn upgrade_resource_state(&self, type_name: &str, version: i64, raw: &Json) -> std::result::Result<Json, Diagnostics> {
        self.resource(type_name)
            .map_err(|e| unknown_type_diagnostics(&e))?
            .upgrade_state(version, raw)
    }

    /// Reads one data source.
    pub async fn read_data_source(&self, type_name: &str, config: &Json) -> ReadResult {
        let server = match self.data_source(type_name) {
            Ok(server) => server,
            Err(e) => {
                return ReadResult {
                    diagnostics: unknown_type_diagnostics(&e),
                    ..ReadResult::default()
                };
            }
        };
        match self.context() {
            Ok(ctx) => server.read(ctx, config).await,
            Err(diagnostics) => ReadResult {
                diagnostics,
                ..ReadResult::default()
            },
        }
    }

    fn route(
        &self,
        type_name: &str,
    ) -> std::result::Result<(&ResourceServer<ProviderContext>, &ProviderContext), Diagnostics> {
        let server = self
            .resource(type_name)
            .map_err(|e| unknown_type_diagnostics(&e))?;
        Ok((server, self.context()?))
    }
}

fn check_type_name(type_name: &'static str) -> Result<&'static str> {
    if type_name
        .strip_prefix(TYPE_PREFIX)
        .is_some_and(|rest| rest.len() > 1 && rest.starts_with('_'))
    {
        Ok(type_name)
    } else {
        Err(pingone_framework::Error::TypeNamePrefix {
            type_name: type_name.to_string(),
            prefix: TYPE_PREFIX.to_string(),
        }
        .into())
    }
}

fn duplicate(type_name: &str) -> Error {
    pingone_framework::Error::DuplicateTypeName {
        type_name: type_name.to_string(),
    }
    .into()
}

fn unknown_type_diagnostics(err: &Error) -> Diagnostics {
    Diagnostics::from_error("Unknown type", err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::TrustedEmailDomainResource;
    use serde_json::json;

    #[test]
    fn test_builtin_types_register() {
        let server = ProviderServer::new().unwrap();
        assert_eq!(
            server.resource_types().collect::<Vec<_>>(),
            [
                "pingone_gateway",
                "pingone_notification_policy",
                "pingone_notification_template_content",
                "pingone_trusted_email_domain",
                "pingone_user_role_assignment",
                "pingone_webhook",
            ]
        );
        assert_eq!(
            server.data_source_types().collect::<Vec<_>>(),
            ["pingone_licenses", "pingone_trusted_email_domain"]
        );
        assert!(!server.is_configured());
    }

    #[test]
    fn test_duplicate_resource_rejected() {
        let err = ProviderServer::with_types(
            vec![Arc::new(TrustedEmailDomainResource), Arc::new(TrustedEmailDomainResource)],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(pingone_framework::Error::DuplicateTypeName { .. })
        ));
    }

    #[test]
    fn test_type_name_prefix() {
        assert!(check_type_name("pingone_webhook").is_ok());
        assert!(check_type_name("pingone_").is_err());
        assert!(check_type_name("pingonewebhook").is_err());
        assert!(check_type_name("aws_webhook").is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_read_reports_error() {
        let server = ProviderServer::new().unwrap();
        let state = State::new(json!({"id": "d1"}));
        let result = server.read_resource("pingone_trusted_email_domain", &state).await;
        assert_eq!(
            result.diagnostics.errors().next().map(|d| d.summary.as_str()),
            Some("Provider not configured")
        );
        assert_eq!(result.state, state);
    }

    #[tokio::test]
    async fn test_unknown_type_reported() {
        let server = ProviderServer::new().unwrap();
        let result = server.import_resource("pingone_environment", "a/b").await;
        assert_eq!(
            result.diagnostics.errors().next().map(|d| d.detail.as_str()),
            Some("Unknown resource or data source type \"pingone_environment\"")
        );
    }

    #[test]
    fn test_offline_validation_needs_no_client() {
        let server = ProviderServer::new().unwrap();
        let diags = server.validate_resource_config(
            "pingone_trusted_email_domain",
            &json!({"environment_id": "nope", "domain_name": "demo.example.org"}),
        );
        assert!(diags.has_error());
    }

    #[test]
    fn test_configure_with_token() {
        temp_env::with_vars_unset(
            [
                "PINGONE_CLIENT_ID",
                "PINGONE_CLIENT_SECRET",
                "PINGONE_ENVIRONMENT_ID",
                "PINGONE_API_ACCESS_TOKEN",
                "PINGONE_REGION_CODE",
                "PINGONE_API_SERVICE_HOSTNAME",
                "PINGONE_AUTH_SERVICE_HOSTNAME",
            ],
            || {
                let mut server = ProviderServer::new().unwrap();
                let diags = server.configure(&json!({"api_access_token": "token", "region_code": "EU"}));
                assert!(!diags.has_error(), "{diags:?}");
                assert!(server.is_configured());
            },
        );
    }

    #[test]
    fn test_configure_without_credentials_fails() {
        temp_env::with_vars_unset(
            [
                "PINGONE_CLIENT_ID",
                "PINGONE_CLIENT_SECRET",
                "PINGONE_ENVIRONMENT_ID",
                "PINGONE_API_ACCESS_TOKEN",
            ],
            || {
                let mut server = ProviderServer::new().unwrap();
                let diags = server.configure(&json!({"client_id": "abc"}));
                assert!(diags.has_error());
                assert!(!server.is_configured());
            },
        );
    }

    #[test]
    fn test_bad_region_rejected() {
        let mut server = ProviderServer::new().unwrap();
        let diags = server.configure(&json!({"api_access_token": "token", "region_code": "XX"}));
        assert_eq!(
            diags.errors().next().and_then(|d| d.path.as_ref()).map(ToString::to_string),
            Some("region_code".to_string())
        );
    }
}
