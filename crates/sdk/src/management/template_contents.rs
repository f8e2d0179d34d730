//! Localised notification template contents.
//!
//! Each content item targets one delivery method; the `deliveryMethod` field
//! selects which of the four shapes the body takes.

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiResponse};
use crate::error::Result;

/// Templates whose contents can be customised.
pub const TEMPLATE_NAMES: &[&str] = &[
    "credential_issued",
    "credential_revoked",
    "credential_updated",
    "device_pairing",
    "digital_wallet_pairing",
    "email_phone_verification",
    "email_verification_admin",
    "email_verification_user",
    "general",
    "id_verification",
    "new_device_paired",
    "recovery_code_template",
    "strong_authentication",
    "transaction",
    "verification_code_template",
];

/// Fields shared by every delivery method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContentCommon {
    /// Server-assigned ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// IETF language tag
    pub locale: String,
    /// Whether this is the built-in content, response only
    #[serde(default, skip_serializing)]
    pub default: Option<bool>,
    /// Variant name within template, method and locale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// Email sender or reply-to address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Email content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContentEmail {
    /// Shared fields
    #[serde(flatten)]
    pub common: TemplateContentCommon,
    /// Body, usually HTML
    pub body: String,
    /// Subject line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<EmailAddress>,
    /// Reply-to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<EmailAddress>,
    /// Character set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// MIME type of the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_content_type: Option<String>,
}

/// Push notification content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContentPush {
    /// Shared fields
    #[serde(flatten)]
    pub common: TemplateContentCommon,
    /// Title
    pub title: String,
    /// Body
    pub body: String,
    /// Banner style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_category: Option<String>,
}

/// SMS content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContentSms {
    /// Shared fields
    #[serde(flatten)]
    pub common: TemplateContentCommon,
    /// Message text
    pub content: String,
    /// Alphanumeric sender ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// Voice content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContentVoice {
    /// Shared fields
    #[serde(flatten)]
    pub common: TemplateContentCommon,
    /// Spoken text
    pub content: String,
    /// Voice name, e.g. `Alice`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// Template content keyed by `deliveryMethod`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "deliveryMethod")]
pub enum TemplateContent {
    /// `Email`
    Email(TemplateContentEmail),
    /// `Push`
    Push(TemplateContentPush),
    /// `SMS`
    #[serde(rename = "SMS")]
    Sms(TemplateContentSms),
    /// `Voice`
    Voice(TemplateContentVoice),
}

impl TemplateContent {
    /// Fields shared by every delivery method.
    #[must_use]
    pub const fn common(&self) -> &TemplateContentCommon {
        match self {
            Self::Email(email) => &email.common,
            Self::Push(push) => &push.common,
            Self::Sms(sms) => &sms.common,
            Self::Voice(voice) => &voice.common,
        }
    }

    /// Wire name of the delivery method.
    #[must_use]
    pub const fn delivery_method(&self) -> &'static str {
        match self {
            Self::Email(_) => "Email",
            Self::Push(_) => "Push",
            Self::Sms(_) => "SMS",
            Self::Voice(_) => "Voice",
        }
    }
}

fn collection(environment_id: &str, template_name: &str) -> String {
    format!("/environments/{environment_id}/templates/{template_name}/contents")
}

impl ApiClient {
    /// `CreateContent`
    pub async fn create_template_content(
        &self,
        environment_id: &str,
        template_name: &str,
        body: &TemplateContent,
    ) -> Result<ApiResponse<TemplateContent>> {
        self.post("CreateContent", &collection(environment_id, template_name), body)
            .await
    }

    /// `ReadOneContent`
    pub async fn read_template_content(
        &self,
        environment_id: &str,
        template_name: &str,
        id: &str,
    ) -> Result<ApiResponse<TemplateContent>> {
        self.get(
            "ReadOneContent",
            &format!("{}/{id}", collection(environment_id, template_name)),
        )
        .await
    }

    /// `UpdateContent`
    pub async fn update_template_content(
        &self,
        environment_id: &str,
        template_name: &str,
        id: &str,
        body: &TemplateContent,
    ) -> Result<ApiResponse<TemplateContent>> {
        self.put(
            "UpdateContent",
            &format!("{}/{id}", collection(environment_id, template_name)),
            body,
        )
        .await
    }

    /// `DeleteContent`
    pub async fn delete_template_content(
        &self,
        environment_id: &str,
        template_name: &str,
        id: &str,
    ) -> Result<ApiResponse<()>> {
        self.delete(
            "DeleteContent",
            &format!("{}/{id}", collection(environment_id, template_name)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sms_serializes_with_discriminator() {
        let content = TemplateContent::Sms(TemplateContentSms {
            common: TemplateContentCommon {
                locale: "en".to_string(),
                ..TemplateContentCommon::default()
            },
            content: "Your code is ${otp}".to_string(),
            sender: None,
        });
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({"deliveryMethod": "SMS", "locale": "en", "content": "Your code is ${otp}"})
        );
    }

    #[test]
    fn test_email_decodes() {
        let content: TemplateContent = serde_json::from_value(json!({
            "id": "c1",
            "deliveryMethod": "Email",
            "locale": "fr",
            "default": false,
            "body": "<p>Bonjour</p>",
            "subject": "Salut",
            "from": {"name": "PingOne", "address": "noreply@pingidentity.com"},
            "charset": "UTF-8",
            "emailContentType": "text/html"
        }))
        .unwrap();
        let TemplateContent::Email(email) = &content else {
            panic!("expected email");
        };
        assert_eq!(email.common.locale, "fr");
        assert_eq!(email.from.as_ref().and_then(|f| f.name.as_deref()), Some("PingOne"));
        assert_eq!(content.common().id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_unknown_delivery_method_fails() {
        assert!(
            serde_json::from_value::<TemplateContent>(json!({
                "deliveryMethod": "Fax", "locale": "en", "content": "x"
            }))
            .is_err()
        );
    }
}
