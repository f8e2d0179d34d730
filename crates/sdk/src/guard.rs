//! Environment-existence check for permission failures.
//!
//! PingOne answers requests into a deleted environment with an authorization
//! failure rather than a 404. Wrapping a call's result in
//! [`check_environment_exists_on_permissions_error`] looks up the environment
//! and, when it is gone, swaps in the lookup's 404 so the usual not-found
//! handling applies.

use serde_json::Value as Json;
use tracing::warn;

use crate::client::ApiClient;
use crate::error::Result;

/// Statuses that trigger the environment lookup.
pub const PERMISSION_STATUSES: [u16; 3] = [400, 401, 403];

/// Replaces a permission failure with the environment's 404 when the
/// environment no longer exists; any other outcome passes through.
pub async fn check_environment_exists_on_permissions_error<T>(
    client: &ApiClient,
    environment_id: &str,
    result: Result<T>,
) -> Result<T> {
    let err = match result {
        Err(err) if err.status().is_some_and(|s| PERMISSION_STATUSES.contains(&s)) => err,
        other => return other,
    };

    let lookup = client
        .get::<Json>("ReadOneEnvironment", &format!("/environments/{environment_id}"))
        .await;
    match lookup {
        Err(lookup_err) if lookup_err.status() == Some(404) => {
            warn!(
                environment_id,
                status = err.status(),
                "API responded with a permissions error and the environment does not exist, overriding the response"
            );
            Err(lookup_err)
        }
        _ => Err(err),
    }
}
