//! Notification policies: quotas, country limits, cooldowns and provider
//! fallback chains for OTP delivery.

use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::client::{ApiClient, ApiResponse};
use crate::error::Result;

/// A quota on notifications sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    /// `ENVIRONMENT` or `USER`
    #[serde(rename = "type")]
    pub quota_type: String,
    /// Methods the quota counts, e.g. `SMS` and `Voice`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_methods: Option<Vec<String>>,
    /// Combined limit; excludes `claimed` and `unclaimed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i32>,
    /// Successful deliveries allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed: Option<i32>,
    /// Failed deliveries allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unclaimed: Option<i32>,
}

/// Countries notifications may or may not be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryLimit {
    /// `NONE`, `ALLOWED` or `DENIED`
    #[serde(rename = "type")]
    pub limit_type: String,
    /// Methods the limit applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_methods: Option<Vec<String>>,
    /// ISO 3166-1 alpha-2 codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
}

/// One wait interval between resends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownPeriod {
    /// Length in `time_unit`
    pub duration: i32,
    /// `SECONDS` or `MINUTES`
    pub time_unit: String,
}

/// Cooldown rules for one delivery method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownMethod {
    /// Whether cooldowns apply
    pub enabled: bool,
    /// First, second and subsequent waits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<CooldownPeriod>>,
    /// `USER_ID` to count per user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    /// Resends allowed before a 30 minute block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resend_limit: Option<i32>,
}

/// Cooldown rules per delivery method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownConfiguration {
    /// Email
    pub email: CooldownMethod,
    /// SMS
    pub sms: CooldownMethod,
    /// Voice
    pub voice: CooldownMethod,
    /// WhatsApp
    pub whats_app: CooldownMethod,
}

/// A provider fallback rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCondition {
    /// `SMS` or `Voice`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_methods: Option<Vec<String>>,
    /// Countries the rule applies to; `ALL` is a valid entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    /// Providers tried in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_chain: Option<Vec<ObjectRef>>,
}

/// Provider fallback rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfiguration {
    /// Rules in priority order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ProviderCondition>>,
}

/// A notifications policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsPolicy {
    /// Server-assigned ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning environment, response only
    #[serde(default, skip_serializing)]
    pub environment: Option<ObjectRef>,
    /// Unique name
    pub name: String,
    /// Whether this is the environment's default policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
    /// Country limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_limit: Option<CountryLimit>,
    /// Cooldowns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_configuration: Option<CooldownConfiguration>,
    /// Provider fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_configuration: Option<ProviderConfiguration>,
    /// Quotas; always sent, possibly empty
    #[serde(default)]
    pub quotas: Vec<Quota>,
}

fn collection(environment_id: &str) -> String {
    format!("/environments/{environment_id}/notificationsPolicies")
}

impl ApiClient {
    /// `CreateNotificationsPolicy`
    pub async fn create_notifications_policy(
        &self,
        environment_id: &str,
        body: &NotificationsPolicy,
    ) -> Result<ApiResponse<NotificationsPolicy>> {
        self.post("CreateNotificationsPolicy", &collection(environment_id), body)
            .await
    }

    /// `ReadOneNotificationsPolicy`
    pub async fn read_notifications_policy(
        &self,
        environment_id: &str,
        id: &str,
    ) -> Result<ApiResponse<NotificationsPolicy>> {
        self.get("ReadOneNotificationsPolicy", &format!("{}/{id}", collection(environment_id)))
            .await
    }

    /// `UpdateNotificationsPolicy`
    pub async fn update_notifications_policy(
        &self,
        environment_id: &str,
        id: &str,
        body: &NotificationsPolicy,
    ) -> Result<ApiResponse<NotificationsPolicy>> {
        self.put(
            "UpdateNotificationsPolicy",
            &format!("{}/{id}", collection(environment_id)),
            body,
        )
        .await
    }

    /// `DeleteNotificationsPolicy`
    pub async fn delete_notifications_policy(&self, environment_id: &str, id: &str) -> Result<ApiResponse<()>> {
        self.delete("DeleteNotificationsPolicy", &format!("{}/{id}", collection(environment_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_policy() {
        let policy: NotificationsPolicy = serde_json::from_value(json!({
            "id": "np1",
            "environment": {"id": "e1"},
            "name": "Default",
            "default": true,
            "countryLimit": {"type": "ALLOWED", "deliveryMethods": ["SMS"], "countries": ["GB"]},
            "cooldownConfiguration": {
                "email": {"enabled": false},
                "sms": {
                    "enabled": true,
                    "periods": [
                        {"duration": 30, "timeUnit": "SECONDS"},
                        {"duration": 1, "timeUnit": "MINUTES"},
                        {"duration": 5, "timeUnit": "MINUTES"}
                    ],
                    "resendLimit": 5
                },
                "voice": {"enabled": false},
                "whatsApp": {"enabled": false}
            },
            "providerConfiguration": {"conditions": [{"countries": ["ALL"], "fallbackChain": [{"id": "PINGONE_TWILIO"}]}]},
            "quotas": [{"type": "USER", "deliveryMethods": ["SMS", "Voice"], "claimed": 20, "unclaimed": 10}]
        }))
        .unwrap();

        assert_eq!(policy.default, Some(true));
        let sms = &policy.cooldown_configuration.unwrap().sms;
        assert_eq!(sms.periods.as_ref().map(Vec::len), Some(3));
        assert_eq!(policy.quotas[0].claimed, Some(20));
        assert_eq!(policy.quotas[0].total, None);
    }

    #[test]
    fn test_request_always_sends_quotas() {
        let policy = NotificationsPolicy {
            id: None,
            environment: None,
            name: "p".to_string(),
            default: Some(false),
            country_limit: None,
            cooldown_configuration: None,
            provider_configuration: None,
            quotas: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&policy).unwrap(),
            json!({"name": "p", "default": false, "quotas": []})
        );
    }
}
