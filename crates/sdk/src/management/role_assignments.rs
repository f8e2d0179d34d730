//! Admin role assignments granted to users.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::client::{ApiClient, ApiResponse};
use crate::error::Result;

/// What a role assignment is limited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    /// One application
    Application,
    /// One environment
    Environment,
    /// The whole organization
    Organization,
    /// One population
    Population,
}

impl ScopeType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "APPLICATION",
            Self::Environment => "ENVIRONMENT",
            Self::Organization => "ORGANIZATION",
            Self::Population => "POPULATION",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope of a role assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignmentScope {
    /// Scoped object's ID
    pub id: String,
    /// Kind of object
    #[serde(rename = "type")]
    pub scope_type: ScopeType,
}

/// A role granted to a user at a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    /// Server-assigned ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Role granted
    pub role: ObjectRef,
    /// Where it applies
    pub scope: RoleAssignmentScope,
    /// Set by the service for assignments users cannot change
    #[serde(default, skip_serializing)]
    pub read_only: Option<bool>,
    /// Owning environment, response only
    #[serde(default, skip_serializing)]
    pub environment: Option<ObjectRef>,
}

impl RoleAssignment {
    /// A create request.
    pub fn new(role_id: impl Into<String>, scope_id: impl Into<String>, scope_type: ScopeType) -> Self {
        Self {
            id: None,
            role: ObjectRef::new(role_id),
            scope: RoleAssignmentScope {
                id: scope_id.into(),
                scope_type,
            },
            read_only: None,
            environment: None,
        }
    }
}

fn collection(environment_id: &str, user_id: &str) -> String {
    format!("/environments/{environment_id}/users/{user_id}/roleAssignments")
}

impl ApiClient {
    /// `CreateUserRoleAssignment`
    pub async fn create_user_role_assignment(
        &self,
        environment_id: &str,
        user_id: &str,
        body: &RoleAssignment,
    ) -> Result<ApiResponse<RoleAssignment>> {
        self.post("CreateUserRoleAssignment", &collection(environment_id, user_id), body)
            .await
    }

    /// `ReadOneUserRoleAssignment`
    pub async fn read_user_role_assignment(
        &self,
        environment_id: &str,
        user_id: &str,
        id: &str,
    ) -> Result<ApiResponse<RoleAssignment>> {
        self.get(
            "ReadOneUserRoleAssignment",
            &format!("{}/{id}", collection(environment_id, user_id)),
        )
        .await
    }

    /// `DeleteUserRoleAssignment`
    pub async fn delete_user_role_assignment(
        &self,
        environment_id: &str,
        user_id: &str,
        id: &str,
    ) -> Result<ApiResponse<()>> {
        self.delete(
            "DeleteUserRoleAssignment",
            &format!("{}/{id}", collection(environment_id, user_id)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(RoleAssignment::new("r1", "e1", ScopeType::Environment)).unwrap();
        assert_eq!(
            body,
            json!({"role": {"id": "r1"}, "scope": {"id": "e1", "type": "ENVIRONMENT"}})
        );
    }

    #[test]
    fn test_response_keeps_read_only() {
        let assignment: RoleAssignment = serde_json::from_value(json!({
            "id": "a1",
            "role": {"id": "r1"},
            "scope": {"id": "p1", "type": "POPULATION"},
            "readOnly": true,
            "environment": {"id": "e1"}
        }))
        .unwrap();
        assert_eq!(assignment.read_only, Some(true));
        assert_eq!(assignment.scope.scope_type, ScopeType::Population);
    }
}
