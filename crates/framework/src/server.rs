//! Host-side driver for resources and data sources.
//!
//! [`ResourceServer`] walks a resource through the same steps the plugin host
//! does: validate configuration, plan, apply, refresh, import and upgrade.
//! It owns the checks that every resource would otherwise repeat, such as
//! rejecting unknown values in applied state.

use std::sync::Arc;

use serde_json::{Map, Value as Json};
use tracing::{debug, instrument, warn};

use crate::diag::Diagnostics;
use crate::import::parse_import_id;
use crate::path::AttributePath;
use crate::plan::{plan_resource_change, replaced_attributes};
use crate::resource::{
    CreateRequest, DataSource, DataSourceReadRequest, DeleteRequest, ModifyPlanRequest,
    ReadRequest, Resource, UpdateRequest,
};
use crate::schema::Schema;
use crate::state::State;

/// Outcome of planning.
#[derive(Debug, Clone, Default)]
pub struct PlanResult {
    /// Proposed state; removed when destroying
    pub planned: State,
    /// Attributes that force a replacement
    pub requires_replace: Vec<AttributePath>,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Outcome of apply.
#[derive(Debug, Clone, Default)]
pub struct ApplyResult {
    /// New state; removed after a destroy
    pub state: State,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Outcome of refresh, import and data source reads.
#[derive(Debug, Clone, Default)]
pub struct ReadResult {
    /// Resulting state; removed when the remote object is gone
    pub state: State,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Drives one resource type.
pub struct ResourceServer<C> {
    resource: Arc<dyn Resource<Context = C>>,
    schema: Schema,
}

impl<C> Clone for ResourceServer<C> {
    fn clone(&self) -> Self {
        Self {
            resource: Arc::clone(&self.resource),
            schema: self.schema.clone(),
        }
    }
}

impl<C: Send + Sync> std::fmt::Debug for ResourceServer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceServer")
            .field("type_name", &self.resource.type_name())
            .field("version", &self.schema.version)
            .finish()
    }
}

impl<C: Send + Sync> ResourceServer<C> {
    /// Wraps a resource, caching its schema.
    pub fn new(resource: Arc<dyn Resource<Context = C>>) -> Self {
        let schema = resource.schema();
        Self { resource, schema }
    }

    /// The resource's type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.resource.type_name()
    }

    /// The resource's schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates a configuration document against the schema.
    #[must_use]
    pub fn validate_config(&self, config: &Json) -> Diagnostics {
        self.schema.validate_config(config)
    }

    /// Plans a create, update or (with a `null` config) destroy.
    #[instrument(skip_all, fields(resource = self.type_name()))]
    pub async fn plan_change(&self, ctx: &C, prior: &State, config: &Json) -> PlanResult {
        if config.is_null() {
            return PlanResult {
                planned: State::removed(),
                ..PlanResult::default()
            };
        }

        let mut diagnostics = self.validate_config(config);
        if diagnostics.has_error() {
            return PlanResult {
                diagnostics,
                ..PlanResult::default()
            };
        }

        let change = plan_resource_change(&self.schema, prior.raw(), config);
        let response = self
            .resource
            .modify_plan(
                ctx,
                ModifyPlanRequest {
                    config: State::new(config.clone()),
                    prior_state: prior.clone(),
                    plan: State::new(change.planned),
                },
            )
            .await;
        diagnostics.append(response.diagnostics);

        let requires_replace = match (prior.raw(), response.plan.raw()) {
            (Some(prior), Some(planned)) => replaced_attributes(&self.schema, prior, planned),
            _ => Vec::new(),
        };
        if !requires_replace.is_empty() {
            debug!(attributes = ?requires_replace.iter().map(ToString::to_string).collect::<Vec<_>>(), "Plan requires replacement");
        }

        PlanResult {
            planned: response.plan,
            requires_replace,
            diagnostics,
        }
    }

    /// Applies a planned change.
    ///
    /// A missing prior state means create; a removed plan means destroy.
    #[instrument(skip_all, fields(resource = self.type_name()))]
    pub async fn apply_change(&self, ctx: &C, prior: &State, planned: &State, config: &Json) -> ApplyResult {
        match (prior.is_present(), planned.is_present()) {
            (false, false) => ApplyResult::default(),
            (false, true) => {
                let response = self
                    .resource
                    .create(
                        ctx,
                        CreateRequest {
                            plan: planned.clone(),
                            config: State::new(config.clone()),
                        },
                    )
                    .await;
                self.check_applied(response.state, response.diagnostics)
            }
            (true, false) => {
                let response = self
                    .resource
                    .delete(
                        ctx,
                        DeleteRequest {
                            prior_state: prior.clone(),
                        },
                    )
                    .await;
                let state = if response.diagnostics.has_error() {
                    prior.clone()
                } else {
                    State::removed()
                };
                ApplyResult {
                    state,
                    diagnostics: response.diagnostics,
                }
            }
            (true, true) => {
                if let (Some(before), Some(after)) = (prior.raw(), planned.raw()) {
                    let replaced = replaced_attributes(&self.schema, before, after);
                    if !replaced.is_empty() {
                        let names: Vec<String> = replaced.iter().map(ToString::to_string).collect();
                        return ApplyResult {
                            state: prior.clone(),
                            diagnostics: Diagnostics::from_error(
                                "Resource Replacement Required",
                                format!(
                                    "The change to {} requires the resource to be destroyed and recreated; it cannot be updated in place.",
                                    names.join(", ")
                                ),
                            ),
                        };
                    }
                }
                let response = self
                    .resource
                    .update(
                        ctx,
                        UpdateRequest {
                            plan: planned.clone(),
                            prior_state: prior.clone(),
                            config: State::new(config.clone()),
                        },
                    )
                    .await;
                if response.diagnostics.has_error() && !response.state.is_present() {
                    return ApplyResult {
                        state: prior.clone(),
                        diagnostics: response.diagnostics,
                    };
                }
                self.check_applied(response.state, response.diagnostics)
            }
        }
    }

    /// Refreshes state. A removed result means the remote object is gone.
    #[instrument(skip_all, fields(resource = self.type_name()))]
    pub async fn read(&self, ctx: &C, state: &State) -> ReadResult {
        if !state.is_present() {
            return ReadResult::default();
        }
        let response = self
            .resource
            .read(ctx, ReadRequest { state: state.clone() })
            .await;
        let mut diagnostics = response.diagnostics;
        if response.state.has_unknown() {
            diagnostics.add_error(
                "Provider returned invalid result object after refresh",
                format!("The refreshed state for {} contains unknown values. Please report this issue to the provider maintainers.", self.type_name()),
            );
        }
        if !response.state.is_present() {
            warn!(resource = self.type_name(), "Remote object no longer exists, removing from state");
        }
        ReadResult {
            state: response.state,
            diagnostics,
        }
    }

    /// Imports an existing remote object by its composite identifier.
    #[instrument(skip_all, fields(resource = self.type_name(), id = %id))]
    pub async fn import(&self, ctx: &C, id: &str) -> ReadResult {
        let Some(components) = self.resource.import_components() else {
            return ReadResult {
                diagnostics: Diagnostics::from_error(
                    "Resource Import Not Implemented",
                    format!("This resource type does not support import: {}", self.type_name()),
                ),
                ..ReadResult::default()
            };
        };

        let imported = match parse_import_id(id, &components, self.resource.import_separator()) {
            Ok(imported) => imported,
            Err(diagnostic) => {
                return ReadResult {
                    diagnostics: diagnostic.into(),
                    ..ReadResult::default()
                };
            }
        };

        let mut seed = Map::new();
        for name in self.schema.attributes.keys() {
            seed.insert(name.clone(), Json::Null);
        }
        for (attribute, value) in imported.attributes {
            seed.insert(attribute, Json::String(value));
        }

        let mut result = self.read(ctx, &State::new(Json::Object(seed))).await;
        if !result.state.is_present() && !result.diagnostics.has_error() {
            result.diagnostics.add_error(
                "Cannot import non-existent remote object",
                format!(
                    "While attempting to import an existing object to \"{}\", the provider detected that no object exists with the given id. Only pre-existing objects can be imported; check that the id is correct and that it is associated with the provider's configured region or endpoint, or use \"terraform apply\" to create a new remote object for this resource.",
                    self.type_name()
                ),
            );
        }
        result
    }

    /// Upgrades raw stored state written at `version`.
    pub fn upgrade_state(&self, version: i64, raw: &Json) -> Result<Json, Diagnostics> {
        let registry = self.resource.upgrade_registry();
        registry.verify(self.type_name()).map_err(|e| {
            Diagnostics::from_error(
                "Unable to Upgrade Resource State",
                format!("{e}. Please report this issue to the provider maintainers."),
            )
        })?;
        registry.upgrade(version, raw)
    }

    fn check_applied(&self, state: State, mut diagnostics: Diagnostics) -> ApplyResult {
        if state.has_unknown() {
            diagnostics.add_error(
                "Provider returned invalid result object after apply",
                format!(
                    "After the apply operation, the provider still indicated an unknown value for {}. All values must be known after apply, so this is always a bug in the provider and should be reported in the provider's own repository.",
                    self.type_name()
                ),
            );
        }
        ApplyResult { state, diagnostics }
    }
}

/// Drives one data source type.
pub struct DataSourceServer<C> {
    data_source: Arc<dyn DataSource<Context = C>>,
    schema: Schema,
}

impl<C> Clone for DataSourceServer<C> {
    fn clone(&self) -> Self {
        Self {
            data_source: Arc::clone(&self.data_source),
            schema: self.schema.clone(),
        }
    }
}

impl<C: Send + Sync> std::fmt::Debug for DataSourceServer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceServer")
            .field("type_name", &self.data_source.type_name())
            .finish()
    }
}

impl<C: Send + Sync> DataSourceServer<C> {
    /// Wraps a data source, caching its schema.
    pub fn new(data_source: Arc<dyn DataSource<Context = C>>) -> Self {
        let schema = data_source.schema();
        Self { data_source, schema }
    }

    /// The data source's type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.data_source.type_name()
    }

    /// The data source's schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates, then reads.
    #[instrument(skip_all, fields(data_source = self.type_name()))]
    pub async fn read(&self, ctx: &C, config: &Json) -> ReadResult {
        let diagnostics = self.schema.validate_config(config);
        if diagnostics.has_error() {
            return ReadResult {
                diagnostics,
                ..ReadResult::default()
            };
        }
        let response = self
            .data_source
            .read(
                ctx,
                DataSourceReadRequest {
                    config: State::new(config.clone()),
                },
            )
            .await;
        let mut all = diagnostics;
        all.append(response.diagnostics);
        ReadResult {
            state: response.state,
            diagnostics: all,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportComponent;
    use crate::resource::{CreateResponse, DeleteResponse, ReadResponse, UpdateResponse};
    use crate::schema::Attribute;
    use crate::upgrade::UpgradeRegistry;
    use crate::value::UNKNOWN_SENTINEL;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory remote store keyed by ID.
    #[derive(Default)]
    struct Remote {
        objects: Mutex<Map<String, Json>>,
        leave_unknown: bool,
    }

    struct Widget;

    #[async_trait]
    impl Resource for Widget {
        type Context = Remote;

        fn type_name(&self) -> &'static str {
            "pingone_widget"
        }

        fn schema(&self) -> Schema {
            Schema::new("widget")
                .version(1)
                .attribute("id", Attribute::string("").computed().use_state_for_unknown())
                .attribute("environment_id", Attribute::string("").required().requires_replace())
                .attribute("name", Attribute::string("").required())
        }

        async fn create(&self, ctx: &Remote, request: CreateRequest) -> CreateResponse {
            let mut state = request.plan.raw().cloned().unwrap_or(Json::Null);
            if !ctx.leave_unknown {
                state["id"] = json!("w1");
            }
            ctx.objects.lock().unwrap().insert("w1".to_string(), state.clone());
            CreateResponse {
                state: State::new(state),
                diagnostics: Diagnostics::new(),
            }
        }

        async fn read(&self, ctx: &Remote, request: ReadRequest) -> ReadResponse {
            let id = request
                .state
                .get_attribute(&AttributePath::new("id"))
                .and_then(Json::as_str)
                .unwrap_or_default()
                .to_string();
            let state = ctx
                .objects
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .map_or_else(State::removed, State::new);
            ReadResponse {
                state,
                diagnostics: Diagnostics::new(),
            }
        }

        async fn update(&self, ctx: &Remote, request: UpdateRequest) -> UpdateResponse {
            let state = request.plan.raw().cloned().unwrap_or(Json::Null);
            ctx.objects.lock().unwrap().insert("w1".to_string(), state.clone());
            UpdateResponse {
                state: State::new(state),
                diagnostics: Diagnostics::new(),
            }
        }

        async fn delete(&self, ctx: &Remote, _request: DeleteRequest) -> DeleteResponse {
            ctx.objects.lock().unwrap().remove("w1");
            DeleteResponse::default()
        }

        fn import_components(&self) -> Option<Vec<ImportComponent>> {
            Some(vec![
                ImportComponent::new("environmentID", "environment_id", "[a-z0-9]+"),
                ImportComponent::primary("widgetID", "[a-z0-9]+"),
            ])
        }

        fn upgrade_registry(&self) -> UpgradeRegistry {
            UpgradeRegistry::new(1).register(0, |state| {
                let mut next = state.clone();
                if let Some(object) = next.as_object_mut()
                    && let Some(label) = object.remove("label")
                {
                    object.insert("name".to_string(), label);
                }
                Ok(next)
            })
        }
    }

    fn server() -> ResourceServer<Remote> {
        ResourceServer::new(Arc::new(Widget))
    }

    #[test]
    fn test_debug_names_type_and_version() {
        let rendered = format!("{:?}", server());
        assert!(rendered.contains("pingone_widget"), "{rendered}");
        assert!(rendered.contains("version: 1"), "{rendered}");
    }

    #[tokio::test]
    async fn test_create_update_read_delete() {
        let server = server();
        let remote = Remote::default();
        let config = json!({"environment_id": "e1", "name": "first"});

        let plan = server.plan_change(&remote, &State::removed(), &config).await;
        assert!(!plan.diagnostics.has_error());
        assert_eq!(plan.planned.raw().unwrap()["id"], json!(UNKNOWN_SENTINEL));

        let applied = server.apply_change(&remote, &State::removed(), &plan.planned, &config).await;
        assert!(applied.diagnostics.is_empty(), "{}", applied.diagnostics);
        assert_eq!(applied.state.raw().unwrap()["id"], json!("w1"));

        let config = json!({"environment_id": "e1", "name": "second"});
        let plan = server.plan_change(&remote, &applied.state, &config).await;
        assert!(plan.requires_replace.is_empty());
        assert_eq!(plan.planned.raw().unwrap()["id"], json!("w1"));
        let updated = server.apply_change(&remote, &applied.state, &plan.planned, &config).await;
        assert_eq!(updated.state.raw().unwrap()["name"], json!("second"));

        let refreshed = server.read(&remote, &updated.state).await;
        assert_eq!(refreshed.state, updated.state);

        let plan = server.plan_change(&remote, &updated.state, &Json::Null).await;
        let destroyed = server.apply_change(&remote, &updated.state, &plan.planned, &Json::Null).await;
        assert!(!destroyed.state.is_present());

        let gone = server.read(&remote, &updated.state).await;
        assert!(!gone.state.is_present());
        assert!(gone.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_requires_replace_blocks_update() {
        let server = server();
        let remote = Remote::default();
        let prior = State::new(json!({"id": "w1", "environment_id": "e1", "name": "n"}));
        let config = json!({"environment_id": "e2", "name": "n"});

        let plan = server.plan_change(&remote, &prior, &config).await;
        assert_eq!(plan.requires_replace, vec![AttributePath::new("environment_id")]);

        let applied = server.apply_change(&remote, &prior, &plan.planned, &config).await;
        assert!(applied.diagnostics.has_error());
        assert_eq!(applied.state, prior);
    }

    #[tokio::test]
    async fn test_unknown_after_apply_is_an_error() {
        let server = server();
        let remote = Remote {
            leave_unknown: true,
            ..Remote::default()
        };
        let config = json!({"environment_id": "e1", "name": "n"});
        let plan = server.plan_change(&remote, &State::removed(), &config).await;
        let applied = server.apply_change(&remote, &State::removed(), &plan.planned, &config).await;
        assert!(
            applied
                .diagnostics
                .errors()
                .any(|d| d.summary == "Provider returned invalid result object after apply")
        );
    }

    #[tokio::test]
    async fn test_invalid_config_stops_plan() {
        let plan = server()
            .plan_change(&Remote::default(), &State::removed(), &json!({"name": "n"}))
            .await;
        assert!(plan.diagnostics.has_error());
        assert!(!plan.planned.is_present());
    }

    #[tokio::test]
    async fn test_import() {
        let server = server();
        let remote = Remote::default();
        remote
            .objects
            .lock()
            .unwrap()
            .insert("w1".to_string(), json!({"id": "w1", "environment_id": "e1", "name": "n"}));

        let imported = server.import(&remote, "e1/w1").await;
        assert!(imported.diagnostics.is_empty(), "{}", imported.diagnostics);
        assert_eq!(imported.state.raw().unwrap()["name"], json!("n"));

        let missing = server.import(&remote, "e1/w2").await;
        assert!(
            missing
                .diagnostics
                .errors()
                .any(|d| d.summary == "Cannot import non-existent remote object")
        );

        let malformed = server.import(&remote, "e1").await;
        assert!(
            malformed
                .diagnostics
                .errors()
                .any(|d| d.summary == "Unexpected Import Identifier")
        );
    }

    #[test]
    fn test_upgrade_state() {
        let upgraded = server()
            .upgrade_state(0, &json!({"id": "w1", "environment_id": "e1", "label": "n"}))
            .unwrap();
        assert_eq!(upgraded, json!({"id": "w1", "environment_id": "e1", "name": "n"}));
    }
}
