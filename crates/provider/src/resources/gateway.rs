//! `pingone_gateway`
//!
//! One resource type covers every gateway kind. The `type` attribute selects
//! the wire shape: LDAP and RADIUS gateways carry their own attribute groups,
//! the remaining kinds only the common fields. Attributes belonging to another
//! kind must stay null, and after a read they are always null.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use pingone_framework::bridge::{
    bool_ok_to_tf, enum_ok_to_tf, int32_ok_to_tf, object_ok_to_tf, set_to_vec, string_ok_to_tf,
};
use pingone_framework::validator::{
    at_least_n_elements, length_at_least, one_of, required_if_matches_value,
};
use pingone_framework::{
    Attribute, AttributeType, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, Diagnostics,
    ImportComponent, NestingMode, ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse,
    UpgradeRegistry, Value,
};
use pingone_sdk::classify::gateway_write_errors;
use pingone_sdk::management::gateways::DavinciPolicy;
use pingone_sdk::management::{
    AttributeMapping, Gateway, GatewayType, GatewayVariant, Kerberos, LdapGateway, NetworkPolicyServer,
    NewUserLookup, ObjectRef, RadiusClient, RadiusGateway, UserType,
};
use pingone_sdk::{
    ProviderContext, RetryPolicy, check_environment_exists_on_permissions_error, invoke, not_found_warning,
};
use pingone_verify::patterns::P1_RESOURCE_ID_PATTERN;
use pingone_verify::{ip_or_cidr, p1_resource_id};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{decode, encode, environment_id_attribute, gateway_upgrade, id_attribute, update_classifier};

/// LDAP directory vendors.
pub const LDAP_VENDORS: &[&str] = &[
    "CA Directory",
    "IBM (Tivoli) Security Directory Server",
    "LDAP v3 compliant Directory Server",
    "Microsoft Active Directory",
    "OpenDJ Directory",
    "Oracle Directory Server Enterprise Edition",
    "Oracle Unified Directory",
    "PingDirectory",
];

/// LDAP connection security modes.
pub const CONNECTION_SECURITY: &[&str] = &["None", "TLS", "StartTLS"];

const DEFAULT_CONNECTION_SECURITY: &str = "None";

/// Attributes that only apply to LDAP gateways.
const LDAP_ATTRIBUTES: &[&str] = &[
    "bind_dn",
    "bind_password",
    "connection_security",
    "follow_referrals",
    "kerberos",
    "servers",
    "user_types",
    "validate_tls_certificates",
    "vendor",
];

/// Attributes that only apply to RADIUS gateways.
const RADIUS_ATTRIBUTES: &[&str] = &[
    "radius_clients",
    "radius_davinci_policy_id",
    "radius_default_shared_secret",
    "radius_network_policy_server",
];

/// Gateway resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GatewayModel {
    pub id: Value<String>,
    pub environment_id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    #[serde(rename = "type")]
    pub gateway_type: Value<String>,
    pub enabled: Value<bool>,
    pub bind_dn: Value<String>,
    pub bind_password: Value<String>,
    pub connection_security: Value<String>,
    pub follow_referrals: Value<bool>,
    pub kerberos: Value<KerberosModel>,
    pub servers: Value<BTreeSet<String>>,
    pub validate_tls_certificates: Value<bool>,
    pub vendor: Value<String>,
    pub user_types: Value<BTreeMap<String, UserTypeModel>>,
    pub radius_clients: Value<BTreeSet<RadiusClientModel>>,
    pub radius_davinci_policy_id: Value<String>,
    pub radius_default_shared_secret: Value<String>,
    pub radius_network_policy_server: Value<NetworkPolicyServerModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct KerberosModel {
    pub service_account_upn: Value<String>,
    pub service_account_password: Value<String>,
    pub retain_previous_credentials_mins: Value<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct UserTypeModel {
    pub id: Value<String>,
    pub password_authority: Value<String>,
    pub search_base_dn: Value<String>,
    pub user_link_attributes: Value<Vec<String>>,
    pub allow_password_changes: Value<bool>,
    pub update_user_on_successful_authentication: Value<bool>,
    pub new_user_lookup: Value<NewUserLookupModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NewUserLookupModel {
    pub ldap_filter_pattern: Value<String>,
    pub population_id: Value<String>,
    pub attribute_mappings: Value<BTreeSet<AttributeMappingModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AttributeMappingModel {
    pub name: Value<String>,
    pub value: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RadiusClientModel {
    pub ip: Value<String>,
    pub shared_secret: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NetworkPolicyServerModel {
    pub ip: Value<String>,
    pub port: Value<i64>,
}

/// Unknown cells are computed, not configured.
fn is_set<T>(value: &Value<T>) -> bool {
    value.is_known()
}

impl GatewayModel {
    fn configured_attributes(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("bind_dn", is_set(&self.bind_dn)),
            ("bind_password", is_set(&self.bind_password)),
            ("connection_security", is_set(&self.connection_security)),
            ("follow_referrals", is_set(&self.follow_referrals)),
            ("kerberos", is_set(&self.kerberos)),
            ("servers", is_set(&self.servers)),
            ("user_types", is_set(&self.user_types)),
            ("validate_tls_certificates", is_set(&self.validate_tls_certificates)),
            ("vendor", is_set(&self.vendor)),
            ("radius_clients", is_set(&self.radius_clients)),
            ("radius_davinci_policy_id", is_set(&self.radius_davinci_policy_id)),
            ("radius_default_shared_secret", is_set(&self.radius_default_shared_secret)),
            ("radius_network_policy_server", is_set(&self.radius_network_policy_server)),
        ]
    }

    /// Rejects attributes that belong to another gateway type.
    fn check_illegal_params(&self, gateway_type: GatewayType) -> Diagnostics {
        let mut diags = Diagnostics::new();
        for (attribute, configured) in self.configured_attributes() {
            let applies = match gateway_type {
                GatewayType::Ldap => !RADIUS_ATTRIBUTES.contains(&attribute),
                GatewayType::Radius => !LDAP_ATTRIBUTES.contains(&attribute),
                _ => false,
            };
            if configured && !applies {
                diags.add_error(
                    format!("Unexpected parameter {attribute} for {gateway_type} gateway type."),
                    format!("The parameter {attribute} does not apply to this gateway type."),
                );
            }
        }
        diags
    }

    /// Builds the request body for the configured gateway type.
    pub(crate) fn expand(&self) -> Result<GatewayVariant, Diagnostics> {
        let Ok(gateway_type) = self.gateway_type.value_str().parse::<GatewayType>() else {
            return Err(Diagnostics::from_error(
                "Cannot determine the gateway type",
                "Ensure that the `type` parameter is set appropriately.",
            ));
        };

        let diags = self.check_illegal_params(gateway_type);
        if diags.has_error() {
            return Err(diags);
        }

        let gateway = Gateway {
            id: None,
            environment: None,
            name: self.name.value_str().to_string(),
            description: self.description.to_option(),
            gateway_type,
            enabled: self.enabled.to_option().unwrap_or(false),
        };

        let variant = match gateway_type {
            GatewayType::Ldap => GatewayVariant::Ldap(self.expand_ldap(gateway)),
            GatewayType::Radius => GatewayVariant::Radius(self.expand_radius(gateway)?),
            GatewayType::PingFederate | GatewayType::ApiGatewayIntegration | GatewayType::PingIntelligence => {
                GatewayVariant::Generic(gateway)
            }
        };
        Ok(variant)
    }

    fn expand_ldap(&self, gateway: Gateway) -> LdapGateway {
        let user_types = self.user_types.as_known().map(|types| {
            types
                .iter()
                .map(|(name, user_type)| user_type.expand(name))
                .collect()
        });

        LdapGateway {
            gateway,
            bind_dn: self.bind_dn.value_str().to_string(),
            bind_password: self.bind_password.to_option(),
            connection_security: Some(
                self.connection_security
                    .to_option()
                    .unwrap_or_else(|| DEFAULT_CONNECTION_SECURITY.to_string()),
            ),
            follow_referrals: self.follow_referrals.to_option(),
            kerberos: self.kerberos.as_known().map(KerberosModel::expand),
            servers_host_and_port: set_to_vec(&self.servers).unwrap_or_default(),
            validate_tls_certificates: Some(self.validate_tls_certificates.to_option().unwrap_or(true)),
            vendor: self.vendor.value_str().to_string(),
            user_types,
        }
    }

    fn expand_radius(&self, gateway: Gateway) -> Result<RadiusGateway, Diagnostics> {
        let radius_clients: Vec<RadiusClient> = self
            .radius_clients
            .as_known()
            .map(|clients| {
                clients
                    .iter()
                    .map(|client| RadiusClient {
                        ip: client.ip.value_str().to_string(),
                        shared_secret: client.shared_secret.to_option().filter(|s| !s.is_empty()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        if radius_clients.is_empty() {
            return Err(Diagnostics::from_error(
                "Missing RADIUS Clients",
                "Ensure that the `radius_clients` parameter is set appropriately.",
            ));
        }

        let network_policy_server = match self.radius_network_policy_server.as_known() {
            Some(server) => Some(NetworkPolicyServer {
                ip: server.ip.value_str().to_string(),
                port: narrow(server.port.as_known().copied(), "radius_network_policy_server.port")?.unwrap_or_default(),
            }),
            None => None,
        };

        Ok(RadiusGateway {
            gateway,
            davinci: DavinciPolicy {
                policy: ObjectRef::new(self.radius_davinci_policy_id.value_str()),
            },
            default_shared_secret: self.radius_default_shared_secret.to_option(),
            radius_clients,
            network_policy_server,
        })
    }

    /// Refreshes the model from a gateway of any type.
    ///
    /// Secrets the service does not echo back keep their current values.
    pub(crate) fn to_state(&mut self, variant: &GatewayVariant) {
        let common = variant.common();
        self.id = string_ok_to_tf(common.id.as_deref());
        if let Some(environment) = &common.environment {
            self.environment_id = Value::string(environment.id.as_str());
        }
        self.name = Value::string(common.name.as_str());
        self.description = string_ok_to_tf(common.description.as_deref());
        self.gateway_type = enum_ok_to_tf(Some(&common.gateway_type));
        self.enabled = Value::known(common.enabled);

        match variant {
            GatewayVariant::Generic(_) => {
                self.clear_ldap();
                self.clear_radius();
            }
            GatewayVariant::Ldap(ldap) => {
                self.ldap_to_state(ldap);
                self.clear_radius();
            }
            GatewayVariant::Radius(radius) => {
                self.radius_to_state(radius);
                self.clear_ldap();
            }
        }
    }

    fn ldap_to_state(&mut self, ldap: &LdapGateway) {
        self.bind_dn = Value::string(ldap.bind_dn.as_str());
        if let Some(password) = &ldap.bind_password {
            self.bind_password = Value::string(password.as_str());
        }
        self.connection_security = Value::from_option(
            ldap.connection_security
                .clone()
                .or_else(|| Some(DEFAULT_CONNECTION_SECURITY.to_string())),
        );
        self.follow_referrals = bool_ok_to_tf(ldap.follow_referrals);

        let prior_password = self
            .kerberos
            .as_known()
            .map(|k| k.service_account_password.clone())
            .unwrap_or_default();
        self.kerberos = object_ok_to_tf(ldap.kerberos.as_ref(), |kerberos| KerberosModel {
            service_account_upn: Value::string(kerberos.service_account_user_principal_name.as_str()),
            service_account_password: kerberos
                .service_account_password
                .as_deref()
                .map_or(prior_password, Value::string),
            retain_previous_credentials_mins: int32_ok_to_tf(kerberos.minutes_to_retain_previous_credentials),
        });

        self.servers = Value::known(ldap.servers_host_and_port.iter().cloned().collect());
        self.validate_tls_certificates = bool_ok_to_tf(ldap.validate_tls_certificates);
        self.vendor = Value::string(ldap.vendor.as_str());
        self.user_types = match ldap.user_types.as_deref() {
            Some(types) if !types.is_empty() => Value::known(
                types
                    .iter()
                    .map(|user_type| (user_type.name.clone(), UserTypeModel::from_api(user_type)))
                    .collect(),
            ),
            _ => Value::Null,
        };
    }

    fn radius_to_state(&mut self, radius: &RadiusGateway) {
        let prior_secrets: BTreeMap<String, Value<String>> = self
            .radius_clients
            .as_known()
            .map(|clients| {
                clients
                    .iter()
                    .map(|c| (c.ip.value_str().to_string(), c.shared_secret.clone()))
                    .collect()
            })
            .unwrap_or_default();

        self.radius_davinci_policy_id = Value::string(radius.davinci.policy.id.as_str());
        if let Some(secret) = &radius.default_shared_secret {
            self.radius_default_shared_secret = Value::string(secret.as_str());
        }
        self.radius_clients = Value::known(
            radius
                .radius_clients
                .iter()
                .map(|client| RadiusClientModel {
                    ip: Value::string(client.ip.as_str()),
                    shared_secret: match &client.shared_secret {
                        Some(secret) => Value::string(secret.as_str()),
                        None => prior_secrets.get(&client.ip).cloned().unwrap_or_default(),
                    },
                })
                .collect(),
        );
        self.radius_network_policy_server =
            object_ok_to_tf(radius.network_policy_server.as_ref(), |server| NetworkPolicyServerModel {
                ip: Value::string(server.ip.as_str()),
                port: Value::known(i64::from(server.port)),
            });
    }

    fn clear_ldap(&mut self) {
        self.bind_dn = Value::Null;
        self.bind_password = Value::Null;
        self.connection_security = Value::Null;
        self.follow_referrals = Value::Null;
        self.kerberos = Value::Null;
        self.servers = Value::Null;
        self.validate_tls_certificates = Value::Null;
        self.vendor = Value::Null;
        self.user_types = Value::Null;
    }

    fn clear_radius(&mut self) {
        self.radius_clients = Value::Null;
        self.radius_davinci_policy_id = Value::Null;
        self.radius_default_shared_secret = Value::Null;
        self.radius_network_policy_server = Value::Null;
    }
}

fn narrow(value: Option<i64>, attribute: &str) -> Result<Option<i32>, Diagnostics> {
    value
        .map(|v| {
            i32::try_from(v).map_err(|_| {
                Diagnostics::from_error(
                    "Value out of range",
                    format!("The value {v} for {attribute} does not fit in a 32-bit integer."),
                )
            })
        })
        .transpose()
}

impl KerberosModel {
    fn expand(&self) -> Kerberos {
        Kerberos {
            service_account_user_principal_name: self.service_account_upn.value_str().to_string(),
            service_account_password: self.service_account_password.to_option(),
            minutes_to_retain_previous_credentials: self
                .retain_previous_credentials_mins
                .as_known()
                .and_then(|v| i32::try_from(*v).ok()),
        }
    }
}

impl UserTypeModel {
    fn expand(&self, name: &str) -> UserType {
        UserType {
            id: self.id.to_option(),
            name: name.to_string(),
            ordered_correlation_attributes: self.user_link_attributes.to_option().unwrap_or_default(),
            password_authority: self.password_authority.value_str().to_string(),
            search_base_dn: self.search_base_dn.to_option(),
            allow_password_changes: self.allow_password_changes.to_option(),
            update_user_on_successful_authentication: self.update_user_on_successful_authentication.to_option(),
            new_user_lookup: self.new_user_lookup.as_known().map(|lookup| NewUserLookup {
                attribute_mappings: lookup
                    .attribute_mappings
                    .as_known()
                    .map(|mappings| {
                        mappings
                            .iter()
                            .map(|m| AttributeMapping {
                                name: m.name.value_str().to_string(),
                                value: m.value.value_str().to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                ldap_filter_pattern: lookup.ldap_filter_pattern.value_str().to_string(),
                population: ObjectRef::new(lookup.population_id.value_str()),
            }),
        }
    }

    fn from_api(user_type: &UserType) -> Self {
        Self {
            id: string_ok_to_tf(user_type.id.as_deref()),
            password_authority: Value::string(user_type.password_authority.as_str()),
            search_base_dn: string_ok_to_tf(user_type.search_base_dn.as_deref()),
            user_link_attributes: Value::known(user_type.ordered_correlation_attributes.clone()),
            allow_password_changes: bool_ok_to_tf(user_type.allow_password_changes),
            update_user_on_successful_authentication: bool_ok_to_tf(
                user_type.update_user_on_successful_authentication,
            ),
            new_user_lookup: object_ok_to_tf(user_type.new_user_lookup.as_ref(), |lookup| NewUserLookupModel {
                ldap_filter_pattern: Value::string(lookup.ldap_filter_pattern.as_str()),
                population_id: Value::string(lookup.population.id.as_str()),
                attribute_mappings: Value::known(
                    lookup
                        .attribute_mappings
                        .iter()
                        .map(|m| AttributeMappingModel {
                            name: Value::string(m.name.as_str()),
                            value: Value::string(m.value.as_str()),
                        })
                        .collect(),
                ),
            }),
        }
    }
}

fn gateway_types() -> Vec<&'static str> {
    GatewayType::ALL.iter().map(|t| t.as_str()).collect()
}

fn user_type_attributes() -> Vec<(&'static str, Attribute)> {
    vec![
        (
            "id",
            Attribute::string("The ID of the user type.").computed().use_state_for_unknown(),
        ),
        (
            "password_authority",
            Attribute::string("Whether PingOne or the LDAP directory is the password authority for users of this type.")
                .required()
                .validator(one_of(&["PING_ONE", "LDAP"])),
        ),
        (
            "search_base_dn",
            Attribute::string("The LDAP base domain name (DN) for this user type.").required(),
        ),
        (
            "user_link_attributes",
            Attribute::list(
                AttributeType::String,
                "Attributes used to link PingOne users to LDAP users of this type, in priority order.",
            )
            .required()
            .validator(at_least_n_elements(1)),
        ),
        (
            "allow_password_changes",
            Attribute::bool("Whether users of this type can change their password in PingOne.")
                .optional()
                .computed()
                .default_value(serde_json::Value::Bool(false)),
        ),
        (
            "update_user_on_successful_authentication",
            Attribute::bool("Whether PingOne updates the user from LDAP after each successful authentication.")
                .optional()
                .computed()
                .default_value(serde_json::Value::Bool(false)),
        ),
        (
            "new_user_lookup",
            Attribute::single_nested(
                vec![
                    (
                        "ldap_filter_pattern",
                        Attribute::string("The LDAP user search filter used to find new users.").required(),
                    ),
                    (
                        "population_id",
                        Attribute::string("The population new users are created in.")
                            .required()
                            .validator(p1_resource_id()),
                    ),
                    (
                        "attribute_mappings",
                        Attribute::nested(
                            NestingMode::Set,
                            vec![
                                ("name", Attribute::string("The PingOne user attribute.").required()),
                                ("value", Attribute::string("The LDAP attribute expression.").required()),
                            ],
                            "Mappings from LDAP attributes to PingOne user attributes.",
                        )
                        .required(),
                    ),
                ],
                "How new users are found and created when they authenticate.",
            )
            .optional(),
        ),
    ]
}

#[async_trait]
impl Resource for GatewayResource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_gateway"
    }

    fn schema(&self) -> Schema {
        let types = gateway_types();
        Schema::new("Resource to create and manage a PingOne gateway.")
            .version(1)
            .attribute("id", id_attribute())
            .attribute("environment_id", environment_id_attribute("create the gateway in"))
            .attribute(
                "name",
                Attribute::string("The name of the gateway, unique within the environment.")
                    .required()
                    .validator(length_at_least(1)),
            )
            .attribute("description", Attribute::string("A description of the gateway.").optional())
            .attribute(
                "type",
                Attribute::string("The type of gateway.  This field is immutable and will trigger a replace plan if changed.")
                    .required()
                    .requires_replace()
                    .validator(one_of(&types)),
            )
            .attribute("enabled", Attribute::bool("Whether the gateway is enabled.").required())
            .attribute(
                "bind_dn",
                Attribute::string("For LDAP gateways, the distinguished name used to bind to the directory.")
                    .optional()
                    .validator(required_if_matches_value("type", &["LDAP"])),
            )
            .attribute(
                "bind_password",
                Attribute::string("For LDAP gateways, the password of the bind account.")
                    .optional()
                    .sensitive()
                    .validator(required_if_matches_value("type", &["LDAP"])),
            )
            .attribute(
                "connection_security",
                Attribute::string("For LDAP gateways, the connection security mode.  Defaults to `None`.")
                    .optional()
                    .computed()
                    .validator(one_of(CONNECTION_SECURITY)),
            )
            .attribute(
                "follow_referrals",
                Attribute::bool("For LDAP gateways, whether referrals are followed (Active Directory only).").optional(),
            )
            .attribute(
                "kerberos",
                Attribute::single_nested(
                    vec![
                        (
                            "service_account_upn",
                            Attribute::string("The Kerberos service account user principal name.").required(),
                        ),
                        (
                            "service_account_password",
                            Attribute::string("The Kerberos service account password.").optional().sensitive(),
                        ),
                        (
                            "retain_previous_credentials_mins",
                            Attribute::int64("Minutes to keep accepting the previous service account credentials.")
                                .optional(),
                        ),
                    ],
                    "For LDAP gateways, the Kerberos configuration.",
                )
                .optional(),
            )
            .attribute(
                "servers",
                Attribute::set(AttributeType::String, "For LDAP gateways, the directory servers as `host:port`.")
                    .optional()
                    .validator(required_if_matches_value("type", &["LDAP"]))
                    .validator(at_least_n_elements(1)),
            )
            .attribute(
                "validate_tls_certificates",
                Attribute::bool("For LDAP gateways, whether server certificates are validated.  Defaults to `true`.")
                    .optional()
                    .computed(),
            )
            .attribute(
                "vendor",
                Attribute::string("For LDAP gateways, the directory vendor.")
                    .optional()
                    .validator(required_if_matches_value("type", &["LDAP"]))
                    .validator(one_of(LDAP_VENDORS)),
            )
            .attribute(
                "user_types",
                Attribute::nested(
                    NestingMode::Map,
                    user_type_attributes(),
                    "For LDAP gateways, the user types keyed by name.",
                )
                .optional(),
            )
            .attribute(
                "radius_clients",
                Attribute::nested(
                    NestingMode::Set,
                    vec![
                        (
                            "ip",
                            Attribute::string("The IP address of the RADIUS client.")
                                .required()
                                .validator(ip_or_cidr()),
                        ),
                        (
                            "shared_secret",
                            Attribute::string("The shared secret for this client; the default is used when unset.")
                                .optional()
                                .sensitive(),
                        ),
                    ],
                    "For RADIUS gateways, the clients allowed to connect.",
                )
                .optional()
                .validator(required_if_matches_value("type", &["RADIUS"])),
            )
            .attribute(
                "radius_davinci_policy_id",
                Attribute::string("For RADIUS gateways, the DaVinci policy that handles requests.")
                    .optional()
                    .validator(required_if_matches_value("type", &["RADIUS"])),
            )
            .attribute(
                "radius_default_shared_secret",
                Attribute::string("For RADIUS gateways, the shared secret for clients without their own.")
                    .optional()
                    .sensitive(),
            )
            .attribute(
                "radius_network_policy_server",
                Attribute::single_nested(
                    vec![
                        ("ip", Attribute::string("The IP address of the network policy server.").required()),
                        ("port", Attribute::int64("The port of the network policy server.").required()),
                    ],
                    "For RADIUS gateways, the network policy server to forward requests to.",
                )
                .optional(),
            )
    }

    #[instrument(skip_all, fields(resource = "pingone_gateway"))]
    async fn create(&self, ctx: &ProviderContext, request: CreateRequest) -> CreateResponse {
        let mut response = CreateResponse::default();
        let Some(mut plan) = decode::<GatewayModel>(&request.plan, &mut response.diagnostics) else {
            return response;
        };
        let body = match plan.expand() {
            Ok(body) => body,
            Err(diags) => {
                response.diagnostics.append(diags);
                return response;
            }
        };
        debug!(gateway_type = %body.gateway_type(), "Creating gateway");

        let client = &ctx.client;
        let environment_id = plan.environment_id.value_str().to_string();
        let (environment_id, body) = (environment_id.as_str(), &body);

        let (created, diags) = invoke(
            ctx,
            "CreateGateway",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.create_gateway(environment_id, body).await,
                )
                .await
            },
            &gateway_write_errors,
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

    #[instrument(skip_all, fields(resource = "pingone_gateway"))]
    async fn read(&self, ctx: &ProviderContext, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();
        let Some(mut data) = decode::<GatewayModel>(&request.state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str().to_string();
        let id = data.id.value_str().to_string();
        let (environment_id, id) = (environment_id.as_str(), id.as_str());

        let (found, diags) = invoke(
            ctx,
            "ReadOneGateway",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.read_gateway(environment_id, id).await,
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

    #[instrument(skip_all, fields(resource = "pingone_gateway"))]
    async fn update(&self, ctx: &ProviderContext, request: UpdateRequest) -> UpdateResponse {
        let mut response = UpdateResponse::default();
        let Some(mut plan) = decode::<GatewayModel>(&request.plan, &mut response.diagnostics) else {
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
            "UpdateGateway",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.update_gateway(environment_id, id, body).await,
                )
                .await
            },
            &update_classifier(gateway_write_errors),
            &RetryPolicy::default(),
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

    #[instrument(skip_all, fields(resource = "pingone_gateway"))]
    async fn delete(&self, ctx: &ProviderContext, request: DeleteRequest) -> DeleteResponse {
        let mut response = DeleteResponse::default();
        let Some(data) = decode::<GatewayModel>(&request.prior_state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();
        let id = data.id.value_str();

        let (_, diags) = invoke(
            ctx,
            "DeleteGateway",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.delete_gateway(environment_id, id).await,
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
            ImportComponent::primary("gatewayID", P1_RESOURCE_ID_PATTERN),
        ])
    }

    fn upgrade_registry(&self) -> UpgradeRegistry {
        UpgradeRegistry::new(1).register(0, gateway_upgrade::v0_to_v1)
    }
}
