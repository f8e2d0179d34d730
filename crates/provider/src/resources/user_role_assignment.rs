//! `pingone_user_role_assignment`

use async_trait::async_trait;
use pingone_framework::bridge::string_ok_to_tf;
use pingone_framework::validator::exactly_one_of;
use pingone_framework::{
    Attribute, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, Diagnostics, ImportComponent,
    ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse, Value,
};
use pingone_sdk::classify::role_scope;
use pingone_sdk::management::{RoleAssignment, ScopeType};
use pingone_sdk::{
    ProviderContext, RetryPolicy, check_environment_exists_on_permissions_error, invoke, not_found_warning,
};
use pingone_verify::p1_resource_id;
use pingone_verify::patterns::P1_RESOURCE_ID_PATTERN;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{decode, encode, environment_id_attribute, id_attribute};

const SCOPE_ATTRIBUTES: &[&str] = &[
    "scope_application_id",
    "scope_environment_id",
    "scope_organization_id",
    "scope_population_id",
];

/// User admin role assignment resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRoleAssignmentResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct UserRoleAssignmentModel {
    id: Value<String>,
    environment_id: Value<String>,
    user_id: Value<String>,
    role_id: Value<String>,
    scope_application_id: Value<String>,
    scope_environment_id: Value<String>,
    scope_organization_id: Value<String>,
    scope_population_id: Value<String>,
    read_only: Value<bool>,
}

impl UserRoleAssignmentModel {
    fn expand(&self) -> Result<RoleAssignment, Diagnostics> {
        let scopes = [
            (&self.scope_application_id, ScopeType::Application),
            (&self.scope_environment_id, ScopeType::Environment),
            (&self.scope_organization_id, ScopeType::Organization),
            (&self.scope_population_id, ScopeType::Population),
        ];
        let Some((scope_id, scope_type)) = scopes
            .into_iter()
            .find_map(|(cell, scope_type)| cell.as_known().map(|id| (id.as_str(), scope_type)))
        else {
            return Err(Diagnostics::from_error(
                "Invalid configuration",
                "One of scope_application_id, scope_organization_id, scope_environment_id or scope_population_id must be set",
            ));
        };
        Ok(RoleAssignment::new(self.role_id.value_str(), scope_id, scope_type))
    }

    fn to_state(&mut self, assignment: &RoleAssignment) {
        self.id = string_ok_to_tf(assignment.id.as_deref());
        if let Some(environment) = &assignment.environment {
            self.environment_id = Value::string(environment.id.as_str());
        }
        self.role_id = Value::string(assignment.role.id.as_str());
        self.read_only = Value::known(assignment.read_only.unwrap_or(false));

        let scope_id = Value::string(assignment.scope.id.as_str());
        self.scope_application_id = Value::Null;
        self.scope_environment_id = Value::Null;
        self.scope_organization_id = Value::Null;
        self.scope_population_id = Value::Null;
        match assignment.scope.scope_type {
            ScopeType::Application => self.scope_application_id = scope_id,
            ScopeType::Environment => self.scope_environment_id = scope_id,
            ScopeType::Organization => self.scope_organization_id = scope_id,
            ScopeType::Population => self.scope_population_id = scope_id,
        }
    }
}

fn scope_attribute(scope: &str) -> Attribute {
    Attribute::string(&format!(
        "The ID of the {scope} to scope the admin role assignment to.  Exactly one of `scope_application_id`, `scope_environment_id`, `scope_organization_id` or `scope_population_id` must be set.  This field is immutable and will trigger a replace plan if changed."
    ))
    .optional()
    .requires_replace()
    .validator(p1_resource_id())
    .validator(exactly_one_of(SCOPE_ATTRIBUTES))
}

fn link_attribute(description: &str) -> Attribute {
    Attribute::string(description)
        .required()
        .requires_replace()
        .validator(p1_resource_id())
}

#[async_trait]
impl Resource for UserRoleAssignmentResource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_user_role_assignment"
    }

    fn schema(&self) -> Schema {
        Schema::new("Resource to create and manage PingOne admin role assignments to administrator defined users.")
            .attribute("id", id_attribute())
            .attribute(
                "environment_id",
                environment_id_attribute("that contains the user to assign the admin role to"),
            )
            .attribute(
                "user_id",
                link_attribute("The ID of a user to assign an admin role to.  This field is immutable and will trigger a replace plan if changed."),
            )
            .attribute(
                "role_id",
                link_attribute("The ID of an admin role to assign to the user.  This field is immutable and will trigger a replace plan if changed."),
            )
            .attribute("scope_application_id", scope_attribute("application"))
            .attribute("scope_environment_id", scope_attribute("environment"))
            .attribute("scope_organization_id", scope_attribute("organization"))
            .attribute("scope_population_id", scope_attribute("population"))
            .attribute(
                "read_only",
                Attribute::bool("A flag to show whether the admin role assignment is read only or can be changed.")
                    .computed()
                    .use_state_for_unknown(),
            )
    }

    #[instrument(skip_all, fields(resource = "pingone_user_role_assignment"))]
    async fn create(&self, ctx: &ProviderContext, request: CreateRequest) -> CreateResponse {
        let mut response = CreateResponse::default();
        let Some(mut plan) = decode::<UserRoleAssignmentModel>(&request.plan, &mut response.diagnostics) else {
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
        let user_id = plan.user_id.value_str().to_string();
        let (environment_id, user_id, body) = (environment_id.as_str(), user_id.as_str(), &body);

        let (created, diags) = invoke(
            ctx,
            "CreateUserRoleAssignment",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.create_user_role_assignment(environment_id, user_id, body).await,
                )
                .await
            },
            &role_scope,
            &RetryPolicy::role_assignment(),
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

    #[instrument(skip_all, fields(resource = "pingone_user_role_assignment"))]
    async fn read(&self, ctx: &ProviderContext, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();
        let Some(mut data) = decode::<UserRoleAssignmentModel>(&request.state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str().to_string();
        let user_id = data.user_id.value_str().to_string();
        let id = data.id.value_str().to_string();
        let (environment_id, user_id, id) = (environment_id.as_str(), user_id.as_str(), id.as_str());

        let (found, diags) = invoke(
            ctx,
            "ReadOneUserRoleAssignment",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.read_user_role_assignment(environment_id, user_id, id).await,
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

    async fn update(&self, _ctx: &ProviderContext, request: UpdateRequest) -> UpdateResponse {
        UpdateResponse {
            state: request.plan,
            ..UpdateResponse::default()
        }
    }

    #[instrument(skip_all, fields(resource = "pingone_user_role_assignment"))]
    async fn delete(&self, ctx: &ProviderContext, request: DeleteRequest) -> DeleteResponse {
        let mut response = DeleteResponse::default();
        let Some(data) = decode::<UserRoleAssignmentModel>(&request.prior_state, &mut response.diagnostics) else {
            return response;
        };

        if data.read_only == Value::known(true) {
            response.diagnostics.add_error(
                "Cannot destroy read only role assignment",
                format!("Role assignment {} cannot be deleted as it is read only", data.id.value_str()),
            );
            return response;
        }

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();
        let user_id = data.user_id.value_str();
        let id = data.id.value_str();

        let (_, diags) = invoke(
            ctx,
            "DeleteUserRoleAssignment",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.delete_user_role_assignment(environment_id, user_id, id).await,
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
            ImportComponent::new("userID", "user_id", P1_RESOURCE_ID_PATTERN),
            ImportComponent::primary("roleAssignmentID", P1_RESOURCE_ID_PATTERN),
        ])
    }
}
