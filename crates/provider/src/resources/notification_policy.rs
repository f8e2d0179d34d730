//! `pingone_notification_policy`

use std::collections::BTreeSet;

use async_trait::async_trait;
use pingone_framework::bridge::{bool_ok_to_tf, int32_ok_to_tf, object_ok_to_tf, set_to_vec, string_ok_to_tf};
use pingone_framework::validator::{
    also_requires, at_least_n_elements, at_most_n_elements, conflicts_if_matches_value, conflicts_with,
    elements, int64_between, length_at_least, one_of, required_if_matches_value,
};
use pingone_framework::{
    Attribute, AttributePath, AttributeType, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse,
    Diagnostics, ImportComponent, ModifyPlanRequest, ModifyPlanResponse, NestingMode, ReadRequest, ReadResponse,
    Resource, Schema, UpdateRequest, UpdateResponse, ValidationRequest, Validator, Value,
};
use pingone_sdk::classify::Uniqueness;
use pingone_sdk::management::{
    CooldownConfiguration, CooldownMethod, CooldownPeriod, CountryLimit, NotificationsPolicy, ObjectRef,
    ProviderCondition, ProviderConfiguration, Quota,
};
use pingone_sdk::{
    P1Error, ProviderContext, RetryPolicy, check_environment_exists_on_permissions_error, invoke,
    not_found_warning,
};
use pingone_verify::country_code;
use pingone_verify::patterns::P1_RESOURCE_ID_PATTERN;
use serde::{Deserialize, Serialize};
use serde_json::{Value as Json, json};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{decode, encode, environment_id_attribute, id_attribute, update_classifier};

const USER_QUOTA_MAX: i64 = 50;
const COUNTRY_LIMIT_TYPES: &[&str] = &["NONE", "ALLOWED", "DENIED"];
const PHONE_DELIVERY_METHODS: &[&str] = &["SMS", "Voice"];
const QUOTA_DELIVERY_METHODS: &[&str] = &["SMS", "Voice", "Email"];
const PROVIDER_DELIVERY_METHODS: &[&str] = &["SMS", "Voice"];

/// Notification policy resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationPolicyResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct NotificationPolicyModel {
    id: Value<String>,
    environment_id: Value<String>,
    name: Value<String>,
    default: Value<bool>,
    country_limit: Value<CountryLimitModel>,
    cooldown_configuration: Value<CooldownConfigurationModel>,
    provider_configuration: Value<ProviderConfigurationModel>,
    quota: Value<BTreeSet<QuotaModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(default)]
struct QuotaModel {
    #[serde(rename = "type")]
    quota_type: Value<String>,
    delivery_methods: Value<BTreeSet<String>>,
    total: Value<i64>,
    used: Value<i64>,
    unused: Value<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct CountryLimitModel {
    #[serde(rename = "type")]
    limit_type: Value<String>,
    delivery_methods: Value<BTreeSet<String>>,
    countries: Value<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct CooldownConfigurationModel {
    email: Value<CooldownMethodModel>,
    sms: Value<CooldownMethodModel>,
    voice: Value<CooldownMethodModel>,
    whats_app: Value<CooldownMethodModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct CooldownMethodModel {
    enabled: Value<bool>,
    periods: Value<Vec<CooldownPeriodModel>>,
    group_by: Value<String>,
    resend_limit: Value<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct CooldownPeriodModel {
    duration: Value<i64>,
    time_unit: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ProviderConfigurationModel {
    conditions: Value<Vec<ProviderConditionModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ProviderConditionModel {
    delivery_methods: Value<BTreeSet<String>>,
    countries: Value<BTreeSet<String>>,
    fallback_chain: Value<Vec<FallbackChainItemModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct FallbackChainItemModel {
    id: Value<String>,
}

/// Limits go over the wire as 32-bit integers.
const WIRE_INT_MAX: i64 = 2_147_483_647;

fn narrow(value: &Value<i64>, path: AttributePath, diags: &mut Diagnostics) -> Option<i32> {
    let v = *value.as_known()?;
    match i32::try_from(v) {
        Ok(narrowed) => Some(narrowed),
        Err(_) => {
            diags.add_attribute_error(
                path,
                "Value out of range",
                format!("The value {v} does not fit in a 32-bit integer (maximum {WIRE_INT_MAX})."),
            );
            None
        }
    }
}

/// Null for a missing or empty list, the set of its members otherwise.
fn string_set(values: Option<&[String]>) -> Value<BTreeSet<String>> {
    match values {
        Some(values) if !values.is_empty() => Value::known(values.iter().cloned().collect()),
        _ => Value::Null,
    }
}

impl QuotaModel {
    fn expand(&self, diags: &mut Diagnostics) -> Quota {
        let delivery_methods = set_to_vec(&self.delivery_methods).unwrap_or_default();
        let has_email = delivery_methods.iter().any(|m| m == "Email");
        if has_email && delivery_methods.len() > 1 {
            diags.add_attribute_error(
                AttributePath::new("quota"),
                "Invalid parameter",
                "Email quota limits cannot be configured alongside SMS or Voice limits in the same quota.",
            );
        }

        let limits = [&self.total, &self.used, &self.unused];
        if self.quota_type.value_str() == "USER"
            && limits.iter().any(|v| v.as_known().is_some_and(|v| *v > USER_QUOTA_MAX))
        {
            diags.add_error(
                "Invalid parameter",
                format!(
                    "User quota (parameters \"total\", \"used\" and \"unused\") for paid environment must be maximum of {USER_QUOTA_MAX}"
                ),
            );
        }

        Quota {
            quota_type: self.quota_type.value_str().to_string(),
            delivery_methods: Some(delivery_methods),
            total: narrow(&self.total, AttributePath::new("quota").attribute("total"), diags),
            claimed: narrow(&self.used, AttributePath::new("quota").attribute("used"), diags),
            unclaimed: narrow(&self.unused, AttributePath::new("quota").attribute("unused"), diags),
        }
    }

    fn from_api(quota: &Quota) -> Self {
        Self {
            quota_type: Value::string(quota.quota_type.as_str()),
            delivery_methods: string_set(quota.delivery_methods.as_deref()),
            total: int32_ok_to_tf(quota.total),
            used: int32_ok_to_tf(quota.claimed),
            unused: int32_ok_to_tf(quota.unclaimed),
        }
    }
}

impl CooldownMethodModel {
    fn expand(&self, path: &AttributePath, diags: &mut Diagnostics) -> CooldownMethod {
        let enabled = self.enabled.to_option().unwrap_or(false);
        let mut method = CooldownMethod {
            enabled,
            group_by: self.group_by.to_option(),
            ..CooldownMethod::default()
        };
        if enabled {
            method.periods = self.periods.as_known().map(|periods| {
                periods
                    .iter()
                    .map(|p| CooldownPeriod {
                        duration: narrow(&p.duration, path.clone().attribute("periods").attribute("duration"), diags)
                            .unwrap_or_default(),
                        time_unit: p.time_unit.value_str().to_string(),
                    })
                    .collect()
            });
            method.resend_limit = narrow(&self.resend_limit, path.clone().attribute("resend_limit"), diags);
        }
        method
    }

    fn from_api(method: &CooldownMethod) -> Self {
        Self {
            enabled: Value::known(method.enabled),
            periods: match method.periods.as_deref() {
                Some(periods) if !periods.is_empty() => Value::known(
                    periods
                        .iter()
                        .map(|p| CooldownPeriodModel {
                            duration: Value::known(i64::from(p.duration)),
                            time_unit: Value::string(p.time_unit.as_str()),
                        })
                        .collect(),
                ),
                _ => Value::Null,
            },
            group_by: string_ok_to_tf(method.group_by.as_deref()),
            resend_limit: int32_ok_to_tf(method.resend_limit),
        }
    }
}

fn expand_method(method: &Value<CooldownMethodModel>, channel: &str, diags: &mut Diagnostics) -> CooldownMethod {
    let path = AttributePath::new("cooldown_configuration").attribute(channel);
    method
        .as_known()
        .map(|m| m.expand(&path, diags))
        .unwrap_or_default()
}

impl NotificationPolicyModel {
    fn expand(&self) -> Result<NotificationsPolicy, Diagnostics> {
        let mut diags = Diagnostics::new();

        let quotas = self
            .quota
            .as_known()
            .map(|quotas| quotas.iter().map(|q| q.expand(&mut diags)).collect())
            .unwrap_or_default();

        let country_limit = self.country_limit.as_known().map(|limit| CountryLimit {
            limit_type: limit.limit_type.value_str().to_string(),
            delivery_methods: set_to_vec(&limit.delivery_methods),
            countries: Some(set_to_vec(&limit.countries).unwrap_or_default()),
        });

        let cooldown_configuration = self.cooldown_configuration.as_known().map(|cooldown| CooldownConfiguration {
            email: expand_method(&cooldown.email, "email", &mut diags),
            sms: expand_method(&cooldown.sms, "sms", &mut diags),
            voice: expand_method(&cooldown.voice, "voice", &mut diags),
            whats_app: expand_method(&cooldown.whats_app, "whats_app", &mut diags),
        });

        let provider_configuration = self.provider_configuration.as_known().map(|config| ProviderConfiguration {
            conditions: config.conditions.as_known().map(|conditions| {
                conditions
                    .iter()
                    .map(|c| ProviderCondition {
                        delivery_methods: set_to_vec(&c.delivery_methods),
                        countries: set_to_vec(&c.countries),
                        fallback_chain: c
                            .fallback_chain
                            .as_known()
                            .map(|chain| chain.iter().map(|f| ObjectRef::new(f.id.value_str())).collect()),
                    })
                    .collect()
            }),
        });

        if diags.has_error() {
            return Err(diags);
        }

        Ok(NotificationsPolicy {
            id: None,
            environment: None,
            name: self.name.value_str().to_string(),
            default: Some(self.default.to_option().unwrap_or(false)),
            country_limit,
            cooldown_configuration,
            provider_configuration,
            quotas,
        })
    }

    fn to_state(&mut self, policy: &NotificationsPolicy) {
        self.id = string_ok_to_tf(policy.id.as_deref());
        if let Some(environment) = &policy.environment {
            self.environment_id = Value::string(environment.id.as_str());
        }
        self.name = Value::string(policy.name.as_str());
        self.default = bool_ok_to_tf(policy.default);
        self.quota = if policy.quotas.is_empty() {
            Value::Null
        } else {
            Value::known(policy.quotas.iter().map(QuotaModel::from_api).collect())
        };
        self.country_limit = object_ok_to_tf(policy.country_limit.as_ref(), |limit| CountryLimitModel {
            limit_type: Value::string(limit.limit_type.as_str()),
            delivery_methods: string_set(limit.delivery_methods.as_deref()),
            countries: string_set(limit.countries.as_deref()),
        });
        self.cooldown_configuration =
            object_ok_to_tf(policy.cooldown_configuration.as_ref(), |cooldown| CooldownConfigurationModel {
                email: Value::known(CooldownMethodModel::from_api(&cooldown.email)),
                sms: Value::known(CooldownMethodModel::from_api(&cooldown.sms)),
                voice: Value::known(CooldownMethodModel::from_api(&cooldown.voice)),
                whats_app: Value::known(CooldownMethodModel::from_api(&cooldown.whats_app)),
            });
        self.provider_configuration =
            object_ok_to_tf(policy.provider_configuration.as_ref(), |config| ProviderConfigurationModel {
                conditions: match config.conditions.as_deref() {
                    Some(conditions) if !conditions.is_empty() => Value::known(
                        conditions
                            .iter()
                            .map(|c| ProviderConditionModel {
                                delivery_methods: string_set(c.delivery_methods.as_deref()),
                                countries: string_set(c.countries.as_deref()),
                                fallback_chain: match c.fallback_chain.as_deref() {
                                    Some(chain) if !chain.is_empty() => Value::known(
                                        chain
                                            .iter()
                                            .map(|f| FallbackChainItemModel {
                                                id: Value::string(f.id.as_str()),
                                            })
                                            .collect(),
                                    ),
                                    _ => Value::Null,
                                },
                            })
                            .collect(),
                    ),
                    _ => Value::Null,
                },
            });
    }
}

/// Cooldown period duration, ranged by the sibling `time_unit`.
#[derive(Debug)]
struct CooldownDuration;

impl Validator for CooldownDuration {
    fn description(&self) -> String {
        "10 - 600 when `time_unit` is `SECONDS`, 1 - 10 when `time_unit` is `MINUTES`".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(duration) = request.value.as_i64() else {
            return;
        };
        let (unit, min, max) = match request.sibling("time_unit").as_str() {
            Some("SECONDS") => ("SECONDS", 10, 600),
            Some("MINUTES") => ("MINUTES", 1, 10),
            _ => return,
        };
        if duration < min || duration > max {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value",
                format!("If `time_unit` is `{unit}`, the allowed duration range is {min} - {max}."),
            );
        }
    }
}

/// Required when the sibling `enabled` is `true`.
#[derive(Debug)]
struct RequiredWhenEnabled;

impl Validator for RequiredWhenEnabled {
    fn description(&self) -> String {
        "required when `enabled` is `true`".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        if request.is_null() && request.sibling("enabled") == &Json::Bool(true) {
            diags.add_attribute_error(
                request.path.clone(),
                "Missing required argument",
                format!(
                    "The argument \"{}\" is required because \"{}\" is configured as: true.",
                    request.path,
                    request.path.sibling("enabled")
                ),
            );
        }
    }
}

fn cooldown_method_attribute(channel: &str) -> Attribute {
    Attribute::single_nested(
        vec![
            (
                "enabled",
                Attribute::bool("Whether notification cooldown periods apply to this channel.").required(),
            ),
            (
                "periods",
                Attribute::nested(
                    NestingMode::List,
                    vec![
                        (
                            "duration",
                            Attribute::int64("Used with `time_unit` to specify the waiting period.")
                                .required()
                                .validator(Arc::new(CooldownDuration)),
                        ),
                        (
                            "time_unit",
                            Attribute::string("Used with `duration` to specify the waiting period.")
                                .required()
                                .validator(one_of(&["SECONDS", "MINUTES"])),
                        ),
                    ],
                    "The waits before the first retry, the second retry and any later retries.  Required when `enabled` is `true`.",
                )
                .optional()
                .validator(at_least_n_elements(3))
                .validator(at_most_n_elements(3))
                .validator(Arc::new(RequiredWhenEnabled)),
            ),
            (
                "group_by",
                Attribute::string("Set to `USER_ID` to apply the settings per user for the address or number.").optional(),
            ),
            (
                "resend_limit",
                Attribute::int64("Requests allowed before the user is blocked for 30 minutes.  Required when `enabled` is `true`.")
                    .optional()
                    .validator(int64_between(1, 10))
                    .validator(Arc::new(RequiredWhenEnabled)),
            ),
        ],
        &format!("Notification cooldown settings for {channel} notifications."),
    )
    .required()
}

fn cooldown_default() -> Json {
    let method = json!({"enabled": false, "periods": null, "group_by": null, "resend_limit": null});
    json!({"email": method, "sms": method, "voice": method, "whats_app": method})
}

fn delete_errors(status: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
    let default_policy = error
        .and_then(P1Error::first_detail)
        .filter(|d| d.code.as_deref() == Some("CONSTRAINT_VIOLATION"))
        .and_then(|d| d.message.as_deref())
        .is_some_and(|m| m.contains("remove default notifications policy"));
    if default_policy {
        let mut diags = Diagnostics::new();
        diags.add_warning(
            "Cannot delete the default notifications policy",
            "Due to API restrictions, the provider cannot delete the default notifications policy for an environment.  The policy has been removed from Terraform state but has been left in place in the PingOne service.",
        );
        return Some(diags);
    }
    not_found_warning(status, error)
}

#[async_trait]
impl Resource for NotificationPolicyResource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_notification_policy"
    }

    fn schema(&self) -> Schema {
        Schema::new("Resource to create and manage notification policies in a PingOne environment.")
            .attribute("id", id_attribute())
            .attribute("environment_id", environment_id_attribute("associate the notification policy with"))
            .attribute(
                "name",
                Attribute::string("The name to use for the notification policy.  Must be unique among the notification policies in the environment.")
                    .required()
                    .validator(length_at_least(1)),
            )
            .attribute(
                "default",
                Attribute::bool("Whether this policy is the default notification policy for the environment.")
                    .computed()
                    .use_state_for_unknown(),
            )
            .attribute(
                "country_limit",
                Attribute::single_nested(
                    vec![
                        (
                            "type",
                            Attribute::string("The kind of limitation being defined.")
                                .required()
                                .validator(one_of(COUNTRY_LIMIT_TYPES)),
                        ),
                        (
                            "delivery_methods",
                            Attribute::set(
                                AttributeType::String,
                                "The delivery methods the limitation applies to.  Defaults to `SMS` and `Voice`.",
                            )
                            .optional()
                            .computed()
                            .validator(at_least_n_elements(1))
                            .validator(elements(one_of(PHONE_DELIVERY_METHODS)))
                            .validator(conflicts_if_matches_value("type", &["NONE"])),
                        ),
                        (
                            "countries",
                            Attribute::set(
                                AttributeType::String,
                                "ISO 3166-1 two-letter codes of the countries to allow or deny.  Required when `type` is not `NONE`.",
                            )
                            .optional()
                            .validator(at_least_n_elements(1))
                            .validator(elements(country_code()))
                            .validator(required_if_matches_value("type", &["ALLOWED", "DENIED"])),
                        ),
                    ],
                    "Limits the countries where SMS and voice notifications can be sent.",
                )
                .optional()
                .computed()
                .default_value(json!({"type": "NONE", "delivery_methods": null, "countries": null})),
            )
            .attribute(
                "cooldown_configuration",
                Attribute::single_nested(
                    vec![
                        ("email", cooldown_method_attribute("email")),
                        ("sms", cooldown_method_attribute("SMS")),
                        ("voice", cooldown_method_attribute("voice")),
                        ("whats_app", cooldown_method_attribute("WhatsApp")),
                    ],
                    "How long users must wait before requesting another notification such as an OTP.",
                )
                .optional()
                .computed()
                .default_value(cooldown_default()),
            )
            .attribute(
                "provider_configuration",
                Attribute::single_nested(
                    vec![(
                        "conditions",
                        Attribute::nested(
                            NestingMode::List,
                            vec![
                                (
                                    "delivery_methods",
                                    Attribute::set(AttributeType::String, "The delivery methods the fallback order applies to.")
                                        .optional()
                                        .validator(at_least_n_elements(1))
                                        .validator(elements(one_of(PROVIDER_DELIVERY_METHODS))),
                                ),
                                (
                                    "countries",
                                    Attribute::set(AttributeType::String, "ISO 3166-1 two-letter codes of the countries the fallback order applies to.")
                                        .optional()
                                        .validator(at_least_n_elements(1))
                                        .validator(elements(country_code())),
                                ),
                                (
                                    "fallback_chain",
                                    Attribute::nested(
                                        NestingMode::List,
                                        vec![(
                                            "id",
                                            Attribute::string("The ID of a custom provider.").required(),
                                        )],
                                        "Custom providers in the order they should be used.",
                                    )
                                    .required()
                                    .validator(at_least_n_elements(1)),
                                ),
                            ],
                            "Provider fallback orders for groups of countries and delivery methods.  The last condition must not set `countries`.",
                        )
                        .required()
                        .validator(at_least_n_elements(1)),
                    )],
                    "Custom notification providers for countries and delivery methods.",
                )
                .optional(),
            )
            .attribute(
                "quota",
                Attribute::nested(
                    NestingMode::Set,
                    vec![
                        (
                            "type",
                            Attribute::string("Whether the limit is per user or per environment.")
                                .required()
                                .validator(one_of(&["USER", "ENVIRONMENT"])),
                        ),
                        (
                            "delivery_methods",
                            Attribute::set(
                                AttributeType::String,
                                "The delivery methods the limit applies to.  `Email` cannot be combined with `SMS` or `Voice`.",
                            )
                            .optional()
                            .computed()
                            .default_value(json!(["SMS", "Voice"]))
                            .validator(at_least_n_elements(1))
                            .validator(elements(one_of(QUOTA_DELIVERY_METHODS))),
                        ),
                        (
                            "total",
                            Attribute::int64("Maximum notifications per day.  Cannot be set with `used` and `unused`.")
                                .optional()
                                .validator(int64_between(0, WIRE_INT_MAX))
                                .validator(conflicts_with(&["used", "unused"])),
                        ),
                        (
                            "used",
                            Attribute::int64("Maximum notifications received and responded to per day.")
                                .optional()
                                .validator(int64_between(0, WIRE_INT_MAX))
                                .validator(conflicts_with(&["total"]))
                                .validator(also_requires(&["unused"])),
                        ),
                        (
                            "unused",
                            Attribute::int64("Maximum notifications received and not responded to per day.")
                                .optional()
                                .validator(int64_between(0, WIRE_INT_MAX))
                                .validator(conflicts_with(&["total"]))
                                .validator(also_requires(&["used"])),
                        ),
                    ],
                    "SMS, voice and email limits.  At most one SMS/voice quota and one email quota.",
                )
                .optional()
                .validator(at_most_n_elements(2)),
            )
    }

    async fn modify_plan(&self, _ctx: &ProviderContext, request: ModifyPlanRequest) -> ModifyPlanResponse {
        let mut response = ModifyPlanResponse {
            plan: request.plan,
            ..ModifyPlanResponse::default()
        };
        if !response.plan.is_present() {
            return response;
        }

        let limit_path = AttributePath::new("country_limit");
        let limit: Value<CountryLimitModel> = match response.plan.get_attribute_as(&limit_path) {
            Ok(limit) => limit,
            Err(diags) => {
                response.diagnostics.append(diags);
                return response;
            }
        };
        let Some(limit) = limit.as_known() else {
            return response;
        };

        if let Some(limit_type) = limit.limit_type.as_known()
            && limit.delivery_methods.is_unknown()
        {
            let methods: Value<BTreeSet<String>> = if limit_type == "NONE" {
                Value::Null
            } else {
                Value::known(PHONE_DELIVERY_METHODS.iter().map(ToString::to_string).collect())
            };
            debug!(limit_type = %limit_type, "Resolving country limit delivery methods");
            let diags = response
                .plan
                .set_attribute(&limit_path.attribute("delivery_methods"), &methods);
            response.diagnostics.append(diags);
        }
        response
    }

    #[instrument(skip_all, fields(resource = "pingone_notification_policy"))]
    async fn create(&self, ctx: &ProviderContext, request: CreateRequest) -> CreateResponse {
        let mut response = CreateResponse::default();
        let Some(mut plan) = decode::<NotificationPolicyModel>(&request.plan, &mut response.diagnostics) else {
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
        let (environment_id, body) = (environment_id.as_str(), &body);

        let (created, diags) = invoke(
            ctx,
            "CreateNotificationsPolicy",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.create_notifications_policy(environment_id, body).await,
                )
                .await
            },
            &Uniqueness("A notification policy with this name already exists in the environment."),
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

    #[instrument(skip_all, fields(resource = "pingone_notification_policy"))]
    async fn read(&self, ctx: &ProviderContext, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();
        let Some(mut data) = decode::<NotificationPolicyModel>(&request.state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str().to_string();
        let id = data.id.value_str().to_string();
        let (environment_id, id) = (environment_id.as_str(), id.as_str());

        let (found, diags) = invoke(
            ctx,
            "ReadOneNotificationsPolicy",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.read_notifications_policy(environment_id, id).await,
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

    #[instrument(skip_all, fields(resource = "pingone_notification_policy"))]
    async fn update(&self, ctx: &ProviderContext, request: UpdateRequest) -> UpdateResponse {
        let mut response = UpdateResponse::default();
        let Some(mut plan) = decode::<NotificationPolicyModel>(&request.plan, &mut response.diagnostics) else {
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
            "UpdateNotificationsPolicy",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.update_notifications_policy(environment_id, id, body).await,
                )
                .await
            },
            &update_classifier(Uniqueness("A notification policy with this name already exists in the environment.")),
            &RetryPolicy::create_read(),
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

    #[instrument(skip_all, fields(resource = "pingone_notification_policy"))]
    async fn delete(&self, ctx: &ProviderContext, request: DeleteRequest) -> DeleteResponse {
        let mut response = DeleteResponse::default();
        let Some(data) = decode::<NotificationPolicyModel>(&request.prior_state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();
        let id = data.id.value_str();

        let (_, diags) = invoke(
            ctx,
            "DeleteNotificationsPolicy",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.delete_notifications_policy(environment_id, id).await,
                )
                .await
            },
            &delete_errors,
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        response
    }

    fn import_components(&self) -> Option<Vec<ImportComponent>> {
        Some(vec![
            ImportComponent::new("environment_id", "environment_id", P1_RESOURCE_ID_PATTERN),
            ImportComponent::primary("notification_policy_id", P1_RESOURCE_ID_PATTERN),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingone_framework::State;
    use pingone_sdk::P1ErrorDetail;

    const ENV: &str = "11111111-1111-1111-1111-111111111111";

    fn planned(country_limit: Json) -> ModifyPlanRequest {
        ModifyPlanRequest {
            config: State::removed(),
            prior_state: State::removed(),
            plan: State::new(json!({
                "environment_id": ENV,
                "name": "policy",
                "country_limit": country_limit
            })),
        }
    }

    #[tokio::test]
    async fn test_modify_plan_resolves_delivery_methods() {
        let ctx = crate::testing::offline_context();
        let unknown = pingone_framework::value::unknown_json();

        let response = NotificationPolicyResource
            .modify_plan(&ctx, planned(json!({"type": "ALLOWED", "delivery_methods": unknown, "countries": ["GB"]})))
            .await;
        assert!(response.diagnostics.is_empty());
        assert_eq!(
            response.plan.raw().unwrap()["country_limit"]["delivery_methods"],
            json!(["SMS", "Voice"])
        );

        let response = NotificationPolicyResource
            .modify_plan(&ctx, planned(json!({"type": "NONE", "delivery_methods": unknown, "countries": null})))
            .await;
        assert_eq!(response.plan.raw().unwrap()["country_limit"]["delivery_methods"], Json::Null);
    }

    #[tokio::test]
    async fn test_modify_plan_keeps_configured_methods() {
        let ctx = crate::testing::offline_context();
        let response = NotificationPolicyResource
            .modify_plan(&ctx, planned(json!({"type": "ALLOWED", "delivery_methods": ["SMS"], "countries": ["GB"]})))
            .await;
        assert_eq!(response.plan.raw().unwrap()["country_limit"]["delivery_methods"], json!(["SMS"]));
    }

    #[test]
    fn test_user_quota_limit() {
        let model = NotificationPolicyModel {
            name: Value::string("policy"),
            quota: Value::known(BTreeSet::from([QuotaModel {
                quota_type: Value::string("USER"),
                delivery_methods: Value::known(BTreeSet::from(["SMS".to_string()])),
                used: Value::known(51),
                unused: Value::known(10),
                ..QuotaModel::default()
            }])),
            ..NotificationPolicyModel::default()
        };
        let diags = model.expand().unwrap_err();
        assert_eq!(diags.errors().next().map(|d| d.summary.as_str()), Some("Invalid parameter"));
    }

    #[test]
    fn test_expand_maps_used_to_claimed() {
        let model = NotificationPolicyModel {
            name: Value::string("policy"),
            quota: Value::known(BTreeSet::from([QuotaModel {
                quota_type: Value::string("ENVIRONMENT"),
                delivery_methods: Value::known(BTreeSet::from(["SMS".to_string(), "Voice".to_string()])),
                used: Value::known(200),
                unused: Value::known(100),
                ..QuotaModel::default()
            }])),
            ..NotificationPolicyModel::default()
        };
        let body = model.expand().unwrap();
        assert_eq!(body.quotas[0].claimed, Some(200));
        assert_eq!(body.quotas[0].unclaimed, Some(100));
        assert_eq!(body.default, Some(false));
    }

    #[test]
    fn test_to_state_nulls_empty_collections() {
        let mut model = NotificationPolicyModel::default();
        let policy: NotificationsPolicy = serde_json::from_value(json!({
            "id": "np1",
            "environment": {"id": ENV},
            "name": "policy",
            "default": false,
            "countryLimit": {"type": "NONE", "countries": []},
            "quotas": []
        }))
        .unwrap();
        model.to_state(&policy);
        assert!(model.quota.is_null());
        let limit = model.country_limit.as_known().unwrap();
        assert!(limit.countries.is_null());
        assert!(limit.delivery_methods.is_null());
        assert!(model.cooldown_configuration.is_null());
    }

    #[test]
    fn test_expand_rejects_quota_beyond_wire_range() {
        let model = NotificationPolicyModel {
            name: Value::string("policy"),
            quota: Value::known(BTreeSet::from([QuotaModel {
                quota_type: Value::string("ENVIRONMENT"),
                delivery_methods: Value::known(BTreeSet::from(["SMS".to_string()])),
                total: Value::known(3_000_000_000),
                ..QuotaModel::default()
            }])),
            ..NotificationPolicyModel::default()
        };
        let diags = model.expand().unwrap_err();
        let error = diags.errors().next().unwrap();
        assert_eq!(error.summary, "Value out of range");
        assert_eq!(error.path.as_ref().map(ToString::to_string).as_deref(), Some("quota.total"));
    }

    #[test]
    fn test_quota_limits_validated_against_wire_range() {
        let schema = NotificationPolicyResource.schema();
        let config = |total: i64| {
            json!({
                "environment_id": ENV,
                "name": "policy",
                "quota": [{"type": "ENVIRONMENT", "delivery_methods": ["SMS"], "total": total}]
            })
        };
        assert!(!schema.validate_config(&config(WIRE_INT_MAX)).has_error());
        let diags = schema.validate_config(&config(WIRE_INT_MAX + 1));
        assert!(diags.errors().any(|d| d.path.as_ref().is_some_and(|p| p.to_string().ends_with("total"))));
    }

    #[test]
    fn test_cooldown_duration_depends_on_unit() {
        let schema = NotificationPolicyResource.schema();
        let period = |duration: i64, unit: &str| {
            let sms = json!({
                "enabled": true,
                "periods": [
                    {"duration": duration, "time_unit": unit},
                    {"duration": 1, "time_unit": "MINUTES"},
                    {"duration": 2, "time_unit": "MINUTES"}
                ],
                "resend_limit": 5
            });
            let off = json!({"enabled": false});
            json!({
                "environment_id": ENV,
                "name": "policy",
                "cooldown_configuration": {"email": off, "sms": sms, "voice": off, "whats_app": off}
            })
        };
        assert!(!schema.validate_config(&period(30, "SECONDS")).has_error());
        assert!(schema.validate_config(&period(30, "MINUTES")).has_error());
        assert!(schema.validate_config(&period(5, "SECONDS")).has_error());
    }

    #[test]
    fn test_enabled_cooldown_requires_resend_limit() {
        let off = json!({"enabled": false});
        let diags = NotificationPolicyResource.schema().validate_config(&json!({
            "environment_id": ENV,
            "name": "policy",
            "cooldown_configuration": {"email": {"enabled": true}, "sms": off, "voice": off, "whats_app": off}
        }));
        let paths: Vec<String> = diags
            .errors()
            .filter_map(|d| d.path.as_ref().map(ToString::to_string))
            .collect();
        assert!(paths.iter().any(|p| p.ends_with("resend_limit")));
        assert!(paths.iter().any(|p| p.ends_with("periods")));
    }

    #[test]
    fn test_default_policy_delete_is_a_warning() {
        let error = P1Error {
            id: "x".to_string(),
            code: "INVALID_REQUEST".to_string(),
            message: "bad".to_string(),
            details: vec![P1ErrorDetail {
                code: Some("CONSTRAINT_VIOLATION".to_string()),
                target: None,
                message: Some("Cannot remove default notifications policy".to_string()),
                inner_error: None,
            }],
        };
        let diags = delete_errors(Some(400), Some(&error)).unwrap();
        assert!(!diags.has_error());
        assert_eq!(
            diags.warnings().next().map(|d| d.summary.as_str()),
            Some("Cannot delete the default notifications policy")
        );
    }
}
