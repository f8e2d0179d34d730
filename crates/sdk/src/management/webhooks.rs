//! Webhook subscriptions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::client::{ApiClient, ApiResponse};
use crate::error::Result;

/// Formats a subscription can deliver events in.
pub const FORMATS: &[&str] = &["ACTIVITY", "SPLUNK", "NEWRELIC"];

/// Tags an event filter can require.
pub const INCLUDED_TAGS: &[&str] = &["adminIdentityEvent"];

/// Where events are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpEndpoint {
    /// HTTPS URL
    pub url: String,
    /// Headers sent with every delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// Which events a subscription receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Action types, e.g. `USER.CREATED`
    pub included_action_types: Vec<String>,
    /// Applications whose events are included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_applications: Option<Vec<ObjectRef>>,
    /// Populations whose users' events are included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_populations: Option<Vec<ObjectRef>>,
    /// Required event tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_tags: Option<Vec<String>>,
    /// Whether client IP addresses are included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address_exposed: Option<bool>,
    /// Whether user agents are included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent_exposed: Option<bool>,
}

/// A webhook subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Server-assigned ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning environment, response only
    #[serde(default, skip_serializing)]
    pub environment: Option<ObjectRef>,
    /// Display name
    pub name: String,
    /// Suspended subscriptions queue events for up to two weeks
    pub enabled: bool,
    /// Delivery target
    pub http_endpoint: HttpEndpoint,
    /// Whether the endpoint certificate is checked
    pub verify_tls_certificates: bool,
    /// Key used for outbound mutual TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_auth_key_pair: Option<ObjectRef>,
    /// One of [`FORMATS`]
    pub format: String,
    /// Event filter
    pub filter_options: FilterOptions,
}

fn collection(environment_id: &str) -> String {
    format!("/environments/{environment_id}/subscriptions")
}

impl ApiClient {
    /// `CreateSubscription`
    pub async fn create_subscription(&self, environment_id: &str, body: &Subscription) -> Result<ApiResponse<Subscription>> {
        self.post("CreateSubscription", &collection(environment_id), body)
            .await
    }

    /// `ReadOneSubscription`
    pub async fn read_subscription(&self, environment_id: &str, id: &str) -> Result<ApiResponse<Subscription>> {
        self.get("ReadOneSubscription", &format!("{}/{id}", collection(environment_id)))
            .await
    }

    /// `UpdateSubscription`
    pub async fn update_subscription(
        &self,
        environment_id: &str,
        id: &str,
        body: &Subscription,
    ) -> Result<ApiResponse<Subscription>> {
        self.put("UpdateSubscription", &format!("{}/{id}", collection(environment_id)), body)
            .await
    }

    /// `DeleteSubscription`
    pub async fn delete_subscription(&self, environment_id: &str, id: &str) -> Result<ApiResponse<()>> {
        self.delete("DeleteSubscription", &format!("{}/{id}", collection(environment_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let subscription = Subscription {
            id: None,
            environment: None,
            name: "audit".to_string(),
            enabled: true,
            http_endpoint: HttpEndpoint {
                url: "https://hooks.example.com/p1".to_string(),
                headers: Some(BTreeMap::from([("Authorization".to_string(), "Basic abc".to_string())])),
            },
            verify_tls_certificates: true,
            tls_client_auth_key_pair: None,
            format: "ACTIVITY".to_string(),
            filter_options: FilterOptions {
                included_action_types: vec!["USER.CREATED".to_string()],
                included_populations: Some(vec![ObjectRef::new("p1")]),
                ip_address_exposed: Some(false),
                ..FilterOptions::default()
            },
        };

        assert_eq!(
            serde_json::to_value(&subscription).unwrap(),
            json!({
                "name": "audit",
                "enabled": true,
                "httpEndpoint": {"url": "https://hooks.example.com/p1", "headers": {"Authorization": "Basic abc"}},
                "verifyTlsCertificates": true,
                "format": "ACTIVITY",
                "filterOptions": {
                    "includedActionTypes": ["USER.CREATED"],
                    "includedPopulations": [{"id": "p1"}],
                    "ipAddressExposed": false
                }
            })
        );
    }
}
