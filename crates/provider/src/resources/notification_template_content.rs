//! `pingone_notification_template_content`
//!
//! One localised content item for a notification template. The `email`,
//! `push`, `sms` and `voice` blocks are mutually exclusive and pick the
//! delivery method; each maps onto one arm of [`TemplateContent`].

use std::sync::LazyLock;

use async_trait::async_trait;
use pingone_framework::bridge::{bool_ok_to_tf, object_ok_to_tf, string_ok_to_tf};
use pingone_framework::validator::{exactly_one_of, length_between, one_of};
use pingone_framework::{
    Attribute, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, Diagnostics, ImportComponent,
    ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse, Value,
};
use pingone_sdk::management::template_contents::{
    EmailAddress, TEMPLATE_NAMES, TemplateContent, TemplateContentCommon, TemplateContentEmail, TemplateContentPush,
    TemplateContentSms, TemplateContentVoice,
};
use pingone_sdk::{
    P1Error, ProviderContext, RetryPolicy, check_environment_exists_on_permissions_error, invoke,
    not_found_warning,
};
use pingone_verify::locale;
use pingone_verify::patterns::P1_RESOURCE_ID_PATTERN;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::{decode, encode, environment_id_attribute, id_attribute, update_classifier};

const DELIVERY_METHODS: &[&str] = &["email", "push", "sms", "voice"];
const PUSH_CATEGORIES: &[&str] = &["BANNER_BUTTONS", "WITHOUT_BANNER_BUTTONS", "APPROVE_AND_OPEN_APP"];
const DEFAULT_SENDER_NAME: &str = "PingOne";
const DEFAULT_SENDER_ADDRESS: &str = "noreply@pingidentity.com";

static TEMPLATE_NAME_PATTERN: LazyLock<String> = LazyLock::new(|| format!("({})", TEMPLATE_NAMES.join("|")));

/// Notification template content resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationTemplateContentResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct TemplateContentModel {
    id: Value<String>,
    environment_id: Value<String>,
    template_name: Value<String>,
    locale: Value<String>,
    default: Value<bool>,
    variant: Value<String>,
    email: Value<EmailModel>,
    push: Value<PushModel>,
    sms: Value<SmsModel>,
    voice: Value<VoiceModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct EmailModel {
    body: Value<String>,
    from: Value<AddressModel>,
    subject: Value<String>,
    reply_to: Value<AddressModel>,
    character_set: Value<String>,
    content_type: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct AddressModel {
    name: Value<String>,
    address: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PushModel {
    category: Value<String>,
    body: Value<String>,
    title: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SmsModel {
    content: Value<String>,
    sender: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct VoiceModel {
    content: Value<String>,
    #[serde(rename = "type")]
    voice_type: Value<String>,
}

impl AddressModel {
    fn expand(&self) -> EmailAddress {
        EmailAddress {
            name: self.name.to_option(),
            address: self.address.to_option(),
        }
    }

    fn from_api(address: &EmailAddress) -> Self {
        Self {
            name: string_ok_to_tf(address.name.as_deref()),
            address: string_ok_to_tf(address.address.as_deref()),
        }
    }
}

impl TemplateContentModel {
    fn expand(&self) -> Result<TemplateContent, Diagnostics> {
        let common = TemplateContentCommon {
            id: None,
            locale: self.locale.value_str().to_string(),
            default: None,
            variant: self.variant.to_option(),
        };

        if let Some(email) = self.email.as_known() {
            return Ok(TemplateContent::Email(TemplateContentEmail {
                common,
                body: email.body.value_str().to_string(),
                subject: email.subject.to_option(),
                from: email.from.as_known().map(AddressModel::expand),
                reply_to: email.reply_to.as_known().map(AddressModel::expand),
                charset: email.character_set.to_option(),
                email_content_type: email.content_type.to_option(),
            }));
        }
        if let Some(push) = self.push.as_known() {
            return Ok(TemplateContent::Push(TemplateContentPush {
                common,
                title: push.title.value_str().to_string(),
                body: push.body.value_str().to_string(),
                push_category: push.category.to_option(),
            }));
        }
        if let Some(sms) = self.sms.as_known() {
            return Ok(TemplateContent::Sms(TemplateContentSms {
                common,
                content: sms.content.value_str().to_string(),
                sender: sms.sender.to_option(),
            }));
        }
        if let Some(voice) = self.voice.as_known() {
            return Ok(TemplateContent::Voice(TemplateContentVoice {
                common,
                content: voice.content.value_str().to_string(),
                voice: voice.voice_type.to_option(),
            }));
        }

        Err(Diagnostics::from_error(
            "Missing delivery method",
            "Exactly one of `email`, `push`, `sms` or `voice` must be specified.",
        ))
    }

    fn to_state(&mut self, content: &TemplateContent) {
        let common = content.common();
        self.id = string_ok_to_tf(common.id.as_deref());
        self.locale = Value::string(common.locale.as_str());
        self.default = bool_ok_to_tf(common.default);
        self.variant = string_ok_to_tf(common.variant.as_deref());

        self.email = Value::Null;
        self.push = Value::Null;
        self.sms = Value::Null;
        self.voice = Value::Null;

        match content {
            TemplateContent::Email(email) => {
                self.email = Value::known(EmailModel {
                    body: Value::string(email.body.as_str()),
                    from: object_ok_to_tf(email.from.as_ref(), AddressModel::from_api),
                    subject: string_ok_to_tf(email.subject.as_deref()),
                    reply_to: object_ok_to_tf(email.reply_to.as_ref(), AddressModel::from_api),
                    character_set: string_ok_to_tf(email.charset.as_deref()),
                    content_type: string_ok_to_tf(email.email_content_type.as_deref()),
                });
            }
            TemplateContent::Push(push) => {
                self.push = Value::known(PushModel {
                    category: string_ok_to_tf(push.push_category.as_deref()),
                    body: Value::string(push.body.as_str()),
                    title: Value::string(push.title.as_str()),
                });
            }
            TemplateContent::Sms(sms) => {
                self.sms = Value::known(SmsModel {
                    content: Value::string(sms.content.as_str()),
                    sender: string_ok_to_tf(sms.sender.as_deref()),
                });
            }
            TemplateContent::Voice(voice) => {
                self.voice = Value::known(VoiceModel {
                    content: Value::string(voice.content.as_str()),
                    voice_type: string_ok_to_tf(voice.voice.as_deref()),
                });
            }
        }
    }
}

fn write_errors(_: Option<u16>, error: Option<&P1Error>) -> Option<Diagnostics> {
    let detail = error?.first_detail()?;
    let code = detail.code.as_deref()?;
    let target = detail.target.as_deref();

    let (summary, detail) = match (code, target) {
        ("INVALID_VALUE", Some("deliveryMethod")) => (
            "The configured delivery method does not apply to the selected template.",
            "Please ensure that the delivery method (`email`, `sms`, `push`, `voice`) is applicable to the selected template.".to_string(),
        ),
        ("INVALID_VALUE", Some("language")) => (
            "The locale is not valid for the environment.",
            "Please ensure that the associated language for the locale has been created in the environment.".to_string(),
        ),
        ("REQUIRED_VALUE", _) => (
            "Content body is missing a required value.",
            detail.message.clone().unwrap_or_default(),
        ),
        ("UNIQUENESS_VIOLATION", _) => (
            "Customized content for the template, locale and variant combination already exists.",
            "Please ensure that:\n\t1.\tThe notification content for the template, locale and variant is not being managed by another process and is conflicting.\n\t2.\tAny custom content for the combination has been restored to default values.".to_string(),
        ),
        _ => return None,
    };
    Some(Diagnostics::from_error(summary, detail))
}

fn delivery_method_attribute(nested: Vec<(&str, Attribute)>, method: &str) -> Attribute {
    Attribute::single_nested(
        nested,
        &format!(
            "Properties for the `{method}` delivery method.  Exactly one of `email`, `push`, `sms` or `voice` must be specified."
        ),
    )
    .optional()
    .validator(exactly_one_of(DELIVERY_METHODS))
}

fn address_attribute(description: &str) -> Attribute {
    Attribute::single_nested(
        vec![
            (
                "name",
                Attribute::string("The display name.")
                    .optional()
                    .computed()
                    .default_value(json!(DEFAULT_SENDER_NAME)),
            ),
            (
                "address",
                Attribute::string("The email address.")
                    .optional()
                    .computed()
                    .default_value(json!(DEFAULT_SENDER_ADDRESS)),
            ),
        ],
        description,
    )
}

#[async_trait]
impl Resource for NotificationTemplateContentResource {
    type Context = ProviderContext;

    fn type_name(&self) -> &'static str {
        "pingone_notification_template_content"
    }

    fn schema(&self) -> Schema {
        Schema::new("Resource to create and manage PingOne notification template contents for push, SMS, email and voice notifications in an environment.")
            .attribute("id", id_attribute())
            .attribute("environment_id", environment_id_attribute("manage notification template contents in"))
            .attribute(
                "template_name",
                Attribute::string("The ID of the template to manage localised contents for.  This field is immutable and will trigger a replace plan if changed.")
                    .required()
                    .requires_replace()
                    .validator(one_of(TEMPLATE_NAMES)),
            )
            .attribute(
                "locale",
                Attribute::string("An ISO standard language code.  This field is immutable and will trigger a replace plan if changed.")
                    .required()
                    .requires_replace()
                    .validator(locale()),
            )
            .attribute(
                "default",
                Attribute::bool("Whether the content is a predefined default.")
                    .computed()
                    .use_state_for_unknown(),
            )
            .attribute(
                "variant",
                Attribute::string("A case-insensitive name for each content variant sharing the same template, delivery method and locale.")
                    .optional()
                    .validator(length_between(1, 100)),
            )
            .attribute(
                "email",
                delivery_method_attribute(
                    vec![
                        (
                            "body",
                            Attribute::string("The email body.  May contain HTML and variables, up to 100 kB.")
                                .required()
                                .validator(length_between(1, 100_000)),
                        ),
                        (
                            "from",
                            address_attribute("The email sender.")
                                .optional()
                                .computed()
                                .default_value(json!({"name": DEFAULT_SENDER_NAME, "address": DEFAULT_SENDER_ADDRESS})),
                        ),
                        (
                            "subject",
                            Attribute::string("The email subject line.  May contain variables.")
                                .optional()
                                .validator(length_between(1, 256)),
                        ),
                        ("reply_to", address_attribute("The email \"reply to\" address.").optional()),
                        (
                            "character_set",
                            Attribute::string("The email character set.  Defaults to `UTF-8`.")
                                .optional()
                                .computed()
                                .default_value(json!("UTF-8")),
                        ),
                        (
                            "content_type",
                            Attribute::string("The email content type.  Defaults to `text/html`.")
                                .optional()
                                .computed()
                                .default_value(json!("text/html")),
                        ),
                    ],
                    "email",
                ),
            )
            .attribute(
                "push",
                delivery_method_attribute(
                    vec![
                        (
                            "category",
                            Attribute::string("The banner shown to the user.  Defaults to `BANNER_BUTTONS`.")
                                .optional()
                                .computed()
                                .default_value(json!("BANNER_BUTTONS"))
                                .validator(one_of(PUSH_CATEGORIES)),
                        ),
                        (
                            "body",
                            Attribute::string("The push notification text.")
                                .required()
                                .validator(length_between(1, 400)),
                        ),
                        (
                            "title",
                            Attribute::string("The push notification title.")
                                .required()
                                .validator(length_between(1, 200)),
                        ),
                    ],
                    "push",
                ),
            )
            .attribute(
                "sms",
                delivery_method_attribute(
                    vec![
                        ("content", Attribute::string("The SMS text.").required()),
                        (
                            "sender",
                            Attribute::string("The SMS sender ID: alphanumerics and spaces, at most 11 characters.").optional(),
                        ),
                    ],
                    "sms",
                ),
            )
            .attribute(
                "voice",
                delivery_method_attribute(
                    vec![
                        (
                            "content",
                            Attribute::string("The text to read.")
                                .required()
                                .validator(length_between(1, 1024)),
                        ),
                        (
                            "type",
                            Attribute::string("The voice type, e.g. `Man`, `Woman` or `Alice`.  Defaults to `Alice`.")
                                .optional()
                                .computed()
                                .default_value(json!("Alice")),
                        ),
                    ],
                    "voice",
                ),
            )
    }

    #[instrument(skip_all, fields(resource = "pingone_notification_template_content"))]
    async fn create(&self, ctx: &ProviderContext, request: CreateRequest) -> CreateResponse {
        let mut response = CreateResponse::default();
        let Some(mut plan) = decode::<TemplateContentModel>(&request.plan, &mut response.diagnostics) else {
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
        let template_name = plan.template_name.value_str().to_string();
        let (environment_id, template_name, body) = (environment_id.as_str(), template_name.as_str(), &body);

        let (created, diags) = invoke(
            ctx,
            "CreateContent",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.create_template_content(environment_id, template_name, body).await,
                )
                .await
            },
            &write_errors,
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

    #[instrument(skip_all, fields(resource = "pingone_notification_template_content"))]
    async fn read(&self, ctx: &ProviderContext, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();
        let Some(mut data) = decode::<TemplateContentModel>(&request.state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str().to_string();
        let template_name = data.template_name.value_str().to_string();
        let id = data.id.value_str().to_string();
        let (environment_id, template_name, id) = (environment_id.as_str(), template_name.as_str(), id.as_str());

        let (found, diags) = invoke(
            ctx,
            "ReadOneContent",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.read_template_content(environment_id, template_name, id).await,
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

    #[instrument(skip_all, fields(resource = "pingone_notification_template_content"))]
    async fn update(&self, ctx: &ProviderContext, request: UpdateRequest) -> UpdateResponse {
        let mut response = UpdateResponse::default();
        let Some(mut plan) = decode::<TemplateContentModel>(&request.plan, &mut response.diagnostics) else {
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
        let template_name = plan.template_name.value_str().to_string();
        let id = plan.id.value_str().to_string();
        let (environment_id, template_name, id, body) =
            (environment_id.as_str(), template_name.as_str(), id.as_str(), &body);

        let (updated, diags) = invoke(
            ctx,
            "UpdateContent",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.update_template_content(environment_id, template_name, id, body).await,
                )
                .await
            },
            &update_classifier(write_errors),
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

    #[instrument(skip_all, fields(resource = "pingone_notification_template_content"))]
    async fn delete(&self, ctx: &ProviderContext, request: DeleteRequest) -> DeleteResponse {
        let mut response = DeleteResponse::default();
        let Some(data) = decode::<TemplateContentModel>(&request.prior_state, &mut response.diagnostics) else {
            return response;
        };

        let client = &ctx.client;
        let environment_id = data.environment_id.value_str();
        let template_name = data.template_name.value_str();
        let id = data.id.value_str();

        let (_, diags) = invoke(
            ctx,
            "DeleteContent",
            || async move {
                check_environment_exists_on_permissions_error(
                    client,
                    environment_id,
                    client.delete_template_content(environment_id, template_name, id).await,
                )
                .await
            },
            &not_found_warning,
            &RetryPolicy::create_read(),
        )
        .await;
        response.diagnostics.append(diags);
        response
    }

    fn import_components(&self) -> Option<Vec<ImportComponent>> {
        Some(vec![
            ImportComponent::new("environment_id", "environment_id", P1_RESOURCE_ID_PATTERN),
            ImportComponent::new("template_name", "template_name", TEMPLATE_NAME_PATTERN.as_str()),
            ImportComponent::primary("template_content_id", P1_RESOURCE_ID_PATTERN),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingone_sdk::P1ErrorDetail;
    use serde_json::Value as Json;

    const ENV: &str = "11111111-1111-1111-1111-111111111111";

    fn error(code: &str, target: Option<&str>, message: &str) -> P1Error {
        P1Error {
            code: "INVALID_DATA".to_string(),
            message: "The request could not be completed.".to_string(),
            details: vec![P1ErrorDetail {
                code: Some(code.to_string()),
                target: target.map(str::to_string),
                message: Some(message.to_string()),
                inner_error: None,
            }],
            ..P1Error::default()
        }
    }

    #[test]
    fn test_expand_voice() {
        let model = TemplateContentModel {
            locale: Value::string("en"),
            variant: Value::string("calm"),
            voice: Value::known(VoiceModel {
                content: Value::string("Your code is ${otp}"),
                voice_type: Value::string("Alice"),
            }),
            ..TemplateContentModel::default()
        };
        let body = serde_json::to_value(model.expand().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "deliveryMethod": "Voice",
                "locale": "en",
                "variant": "calm",
                "content": "Your code is ${otp}",
                "voice": "Alice"
            })
        );
    }

    #[test]
    fn test_to_state_switches_delivery_method() {
        let mut model = TemplateContentModel {
            sms: Value::known(SmsModel::default()),
            ..TemplateContentModel::default()
        };
        let content: TemplateContent = serde_json::from_value(json!({
            "id": "c1",
            "deliveryMethod": "Push",
            "locale": "de",
            "default": false,
            "title": "Anmeldung",
            "body": "Bitte bestätigen",
            "pushCategory": "BANNER_BUTTONS"
        }))
        .unwrap();
        model.to_state(&content);
        assert!(model.sms.is_null());
        assert_eq!(model.default, Value::known(false));
        assert!(model.variant.is_null());
        let push = model.push.as_known().unwrap();
        assert_eq!(push.category, Value::string("BANNER_BUTTONS"));
    }

    #[test]
    fn test_uniqueness_violation_message() {
        let diags = write_errors(Some(400), Some(&error("UNIQUENESS_VIOLATION", None, "exists"))).unwrap();
        assert_eq!(
            diags.errors().next().map(|d| d.summary.as_str()),
            Some("Customized content for the template, locale and variant combination already exists.")
        );
    }

    #[test]
    fn test_required_value_keeps_service_message() {
        let diags = write_errors(Some(400), Some(&error("REQUIRED_VALUE", Some("content"), "Missing ${otp}"))).unwrap();
        let first = diags.errors().next().unwrap();
        assert_eq!(first.summary, "Content body is missing a required value.");
        assert_eq!(first.detail, "Missing ${otp}");
    }

    #[test]
    fn test_other_errors_fall_through() {
        assert!(write_errors(Some(400), Some(&error("INVALID_VALUE", Some("title"), "bad"))).is_none());
        assert!(write_errors(Some(500), None).is_none());
    }

    #[test]
    fn test_exactly_one_delivery_method() {
        let schema = NotificationTemplateContentResource.schema();
        let base = |extra: Json| {
            let mut config = json!({"environment_id": ENV, "template_name": "general", "locale": "en"});
            if let (Some(config), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
                config.extend(extra.clone());
            }
            config
        };
        assert!(!schema.validate_config(&base(json!({"sms": {"content": "hi"}}))).has_error());
        assert!(schema.validate_config(&base(json!({}))).has_error());
        assert!(
            schema
                .validate_config(&base(json!({"sms": {"content": "hi"}, "voice": {"content": "hi"}})))
                .has_error()
        );
    }

    #[test]
    fn test_email_defaults_are_planned() {
        let schema = NotificationTemplateContentResource.schema();
        let config = json!({
            "environment_id": ENV,
            "template_name": "general",
            "locale": "en",
            "email": {"body": "<p>Hello</p>"}
        });
        let change = pingone_framework::plan::plan_resource_change(&schema, None, &config);
        let email = &change.planned["email"];
        assert_eq!(email["from"], json!({"name": "PingOne", "address": "noreply@pingidentity.com"}));
        assert_eq!(email["character_set"], json!("UTF-8"));
        assert_eq!(email["content_type"], json!("text/html"));
        assert_eq!(email["reply_to"], Json::Null);
    }
}
