//! Gateways: a discriminated union over the `type` field.
//!
//! PingOne returns three shapes from the same endpoint. [`GatewayVariant`]
//! reads `type` first and decodes the matching shape; an unrecognised type
//! fails decoding rather than silently dropping fields.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;

use super::ObjectRef;
use crate::client::{ApiClient, ApiResponse};
use crate::error::Result;

/// Gateway kinds understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayType {
    /// PingFederate
    PingFederate,
    /// API gateway integration
    ApiGatewayIntegration,
    /// LDAP directory
    Ldap,
    /// RADIUS server
    Radius,
    /// PingIntelligence
    PingIntelligence,
}

impl GatewayType {
    /// Every type, in documentation order.
    pub const ALL: [Self; 5] = [
        Self::PingFederate,
        Self::ApiGatewayIntegration,
        Self::Ldap,
        Self::Radius,
        Self::PingIntelligence,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PingFederate => "PING_FEDERATE",
            Self::ApiGatewayIntegration => "API_GATEWAY_INTEGRATION",
            Self::Ldap => "LDAP",
            Self::Radius => "RADIUS",
            Self::PingIntelligence => "PING_INTELLIGENCE",
        }
    }
}

impl AsRef<str> for GatewayType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GatewayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown gateway type \"{s}\""))
    }
}

/// Fields shared by every gateway type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    /// Server-assigned ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning environment, response only
    #[serde(default, skip_serializing)]
    pub environment: Option<ObjectRef>,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Discriminator
    #[serde(rename = "type")]
    pub gateway_type: GatewayType,
    /// Whether the gateway accepts connections
    pub enabled: bool,
}

/// Kerberos service account settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kerberos {
    /// Service account user principal name
    pub service_account_user_principal_name: String,
    /// Service account password; never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_password: Option<String>,
    /// Minutes the previous credentials stay valid after a change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_to_retain_previous_credentials: Option<i32>,
}

/// Maps a PingOne user attribute to an LDAP attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeMapping {
    /// PingOne attribute name
    pub name: String,
    /// LDAP attribute expression
    pub value: String,
}

/// How to find and create a PingOne user on first LDAP sign-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserLookup {
    /// Attribute mappings applied to the new user
    #[serde(default)]
    pub attribute_mappings: Vec<AttributeMapping>,
    /// LDAP filter that finds the user, e.g. `(uid=${identifier})`
    pub ldap_filter_pattern: String,
    /// Population the user is created in
    pub population: ObjectRef,
}

/// An LDAP user type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserType {
    /// Server-assigned ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique name within the gateway
    pub name: String,
    /// Attributes that link PingOne and LDAP users, in priority order
    #[serde(default)]
    pub ordered_correlation_attributes: Vec<String>,
    /// `PING_ONE` or `LDAP`
    pub password_authority: String,
    /// Base DN for user searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_base_dn: Option<String>,
    /// Whether PingOne may push password changes to LDAP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_password_changes: Option<bool>,
    /// Whether PingOne refreshes the user from LDAP on each sign-on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_user_on_successful_authentication: Option<bool>,
    /// Just-in-time creation settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_user_lookup: Option<NewUserLookup>,
}

/// An LDAP gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdapGateway {
    /// Shared fields
    #[serde(flatten)]
    pub gateway: Gateway,
    /// Bind distinguished name
    #[serde(rename = "bindDN")]
    pub bind_dn: String,
    /// Bind password; never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<String>,
    /// `None`, `TLS` or `StartTLS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_security: Option<String>,
    /// Whether referrals are chased
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_referrals: Option<bool>,
    /// Kerberos settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kerberos: Option<Kerberos>,
    /// Directory servers as `host:port`
    #[serde(default)]
    pub servers_host_and_port: Vec<String>,
    /// Whether server certificates are checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_tls_certificates: Option<bool>,
    /// Directory vendor
    pub vendor: String,
    /// User types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_types: Option<Vec<UserType>>,
}

/// A RADIUS client allowed to call the gateway.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusClient {
    /// Client IP address
    pub ip: String,
    /// Per-client shared secret; never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,
}

/// DaVinci policy reference for RADIUS gateways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DavinciPolicy {
    /// The policy
    pub policy: ObjectRef,
}

/// A Network Policy Server the gateway delegates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPolicyServer {
    /// Server IP address
    pub ip: String,
    /// Server port
    pub port: i32,
}

/// A RADIUS gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusGateway {
    /// Shared fields
    #[serde(flatten)]
    pub gateway: Gateway,
    /// Policy that handles authentication
    pub davinci: DavinciPolicy,
    /// Secret for clients without their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_shared_secret: Option<String>,
    /// Allowed clients
    #[serde(default)]
    pub radius_clients: Vec<RadiusClient>,
    /// Network Policy Server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_policy_server: Option<NetworkPolicyServer>,
}

/// Any gateway, keyed by its `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GatewayVariant {
    /// `PING_FEDERATE`, `API_GATEWAY_INTEGRATION` or `PING_INTELLIGENCE`
    Generic(Gateway),
    /// `LDAP`
    Ldap(LdapGateway),
    /// `RADIUS`
    Radius(RadiusGateway),
}

impl GatewayVariant {
    /// Fields shared by every variant.
    #[must_use]
    pub const fn common(&self) -> &Gateway {
        match self {
            Self::Generic(gateway) => gateway,
            Self::Ldap(ldap) => &ldap.gateway,
            Self::Radius(radius) => &radius.gateway,
        }
    }

    /// The discriminator.
    #[must_use]
    pub const fn gateway_type(&self) -> GatewayType {
        self.common().gateway_type
    }
}

impl<'de> Deserialize<'de> for GatewayVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Json::deserialize(deserializer)?;
        let discriminator = raw
            .get("type")
            .and_then(Json::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?;
        let gateway_type = GatewayType::from_str(discriminator).map_err(D::Error::custom)?;

        let decoded = match gateway_type {
            GatewayType::Ldap => serde_json::from_value(raw).map(Self::Ldap),
            GatewayType::Radius => serde_json::from_value(raw).map(Self::Radius),
            GatewayType::PingFederate | GatewayType::ApiGatewayIntegration | GatewayType::PingIntelligence => {
                serde_json::from_value(raw).map(Self::Generic)
            }
        };
        decoded.map_err(D::Error::custom)
    }
}

fn collection(environment_id: &str) -> String {
    format!("/environments/{environment_id}/gateways")
}

impl ApiClient {
    /// `CreateGateway`
    pub async fn create_gateway(&self, environment_id: &str, body: &GatewayVariant) -> Result<ApiResponse<GatewayVariant>> {
        self.post("CreateGateway", &collection(environment_id), body).await
    }

    /// `ReadOneGateway`
    pub async fn read_gateway(&self, environment_id: &str, id: &str) -> Result<ApiResponse<GatewayVariant>> {
        self.get("ReadOneGateway", &format!("{}/{id}", collection(environment_id)))
            .await
    }

    /// `UpdateGateway`
    pub async fn update_gateway(
        &self,
        environment_id: &str,
        id: &str,
        body: &GatewayVariant,
    ) -> Result<ApiResponse<GatewayVariant>> {
        self.put("UpdateGateway", &format!("{}/{id}", collection(environment_id)), body)
            .await
    }

    /// `DeleteGateway`
    pub async fn delete_gateway(&self, environment_id: &str, id: &str) -> Result<ApiResponse<()>> {
        self.delete("DeleteGateway", &format!("{}/{id}", collection(environment_id)))
            .await
    }
}
