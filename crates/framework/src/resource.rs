//! Lifecycle traits implemented by each resource and data source.
//!
//! The host hands a resource JSON documents ([`State`]) and collects
//! diagnostics back. Every operation receives the provider's shared context,
//! which carries the API client and cancellation token.

use async_trait::async_trait;

use crate::diag::Diagnostics;
use crate::import::ImportComponent;
use crate::schema::Schema;
use crate::state::{Config, Plan, State};
use crate::upgrade::UpgradeRegistry;

/// Input to [`Resource::create`].
#[derive(Debug, Clone)]
pub struct CreateRequest {
    /// Planned values; computed attributes may be unknown
    pub plan: Plan,
    /// Configuration as written
    pub config: Config,
}

/// Output of [`Resource::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateResponse {
    /// State after creation; left empty on failure
    pub state: State,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Input to [`Resource::read`].
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Current stored state
    pub state: State,
}

/// Output of [`Resource::read`].
#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    /// Refreshed state; removed when the remote object is gone
    pub state: State,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Input to [`Resource::update`].
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Planned values
    pub plan: Plan,
    /// State before the update
    pub prior_state: State,
    /// Configuration as written
    pub config: Config,
}

/// Output of [`Resource::update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateResponse {
    /// State after the update
    pub state: State,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Input to [`Resource::delete`].
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    /// State being destroyed
    pub prior_state: State,
}

/// Output of [`Resource::delete`].
#[derive(Debug, Clone, Default)]
pub struct DeleteResponse {
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Input to [`Resource::modify_plan`].
#[derive(Debug, Clone)]
pub struct ModifyPlanRequest {
    /// Configuration as written
    pub config: Config,
    /// State before the change; removed for creates
    pub prior_state: State,
    /// Plan computed so far; removed for destroys
    pub plan: Plan,
}

/// Output of [`Resource::modify_plan`].
#[derive(Debug, Clone, Default)]
pub struct ModifyPlanResponse {
    /// Adjusted plan
    pub plan: Plan,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// Input to [`DataSource::read`].
#[derive(Debug, Clone)]
pub struct DataSourceReadRequest {
    /// Configuration as written
    pub config: Config,
}

/// Output of [`DataSource::read`].
#[derive(Debug, Clone, Default)]
pub struct DataSourceReadResponse {
    /// Result document
    pub state: State,
    /// Feedback
    pub diagnostics: Diagnostics,
}

/// A managed resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Shared provider context passed to every operation.
    type Context: Send + Sync;

    /// Type name, e.g. `pingone_gateway`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema at the current version.
    fn schema(&self) -> Schema;

    /// Creates the remote object.
    async fn create(&self, ctx: &Self::Context, request: CreateRequest) -> CreateResponse;

    /// Refreshes state from the remote object.
    async fn read(&self, ctx: &Self::Context, request: ReadRequest) -> ReadResponse;

    /// Updates the remote object in place.
    async fn update(&self, ctx: &Self::Context, request: UpdateRequest) -> UpdateResponse;

    /// Deletes the remote object.
    async fn delete(&self, ctx: &Self::Context, request: DeleteRequest) -> DeleteResponse;

    /// Import identifier segments; `None` disables import.
    fn import_components(&self) -> Option<Vec<ImportComponent>> {
        None
    }

    /// Separator between import identifier segments.
    fn import_separator(&self) -> &'static str {
        "/"
    }

    /// Adjusts the computed plan. The default leaves it untouched.
    async fn modify_plan(&self, _ctx: &Self::Context, request: ModifyPlanRequest) -> ModifyPlanResponse {
        ModifyPlanResponse {
            plan: request.plan,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Upgraders for prior schema versions.
    fn upgrade_registry(&self) -> UpgradeRegistry {
        UpgradeRegistry::new(self.schema().version)
    }
}

/// A read-only data source type.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Shared provider context passed to every operation.
    type Context: Send + Sync;

    /// Type name, e.g. `pingone_licenses`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Looks up the remote objects.
    async fn read(&self, ctx: &Self::Context, request: DataSourceReadRequest) -> DataSourceReadResponse;
}
