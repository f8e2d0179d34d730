//! Trusted email domains.

use futures::Stream;
use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::client::{ApiClient, ApiResponse};
use crate::error::Result;
use crate::pager::Page;

/// A domain the environment may send email from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDomain {
    /// Server-assigned ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning environment, response only
    #[serde(default, skip_serializing)]
    pub environment: Option<ObjectRef>,
    /// The domain name, e.g. `auth.example.com`
    pub domain_name: String,
}

impl EmailDomain {
    /// A create request for `domain_name`.
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            id: None,
            environment: None,
            domain_name: domain_name.into(),
        }
    }
}

fn collection(environment_id: &str) -> String {
    format!("/environments/{environment_id}/emailDomains")
}

impl ApiClient {
    /// `CreateTrustedEmailDomain`
    pub async fn create_trusted_email_domain(
        &self,
        environment_id: &str,
        body: &EmailDomain,
    ) -> Result<ApiResponse<EmailDomain>> {
        self.post("CreateTrustedEmailDomain", &collection(environment_id), body)
            .await
    }

    /// `ReadOneTrustedEmailDomain`
    pub async fn read_trusted_email_domain(&self, environment_id: &str, id: &str) -> Result<ApiResponse<EmailDomain>> {
        self.get("ReadOneTrustedEmailDomain", &format!("{}/{id}", collection(environment_id)))
            .await
    }

    /// `DeleteTrustedEmailDomain`
    pub async fn delete_trusted_email_domain(&self, environment_id: &str, id: &str) -> Result<ApiResponse<()>> {
        self.delete("DeleteTrustedEmailDomain", &format!("{}/{id}", collection(environment_id)))
            .await
    }

    /// `ReadAllTrustedEmailDomains`, one page at a time.
    pub fn trusted_email_domains<'a>(
        &'a self,
        environment_id: &str,
    ) -> impl Stream<Item = Result<Page<EmailDomain>>> + use<'a> {
        self.pages("ReadAllTrustedEmailDomains", &collection(environment_id), "emailDomains")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_server_fields() {
        let body = serde_json::to_value(EmailDomain::new("auth.example.com")).unwrap();
        assert_eq!(body, json!({"domainName": "auth.example.com"}));
    }

    #[test]
    fn test_response_decodes_environment() {
        let domain: EmailDomain = serde_json::from_value(json!({
            "id": "d1",
            "environment": {"id": "e1"},
            "domainName": "auth.example.com",
            "createdAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(domain.id.as_deref(), Some("d1"));
        assert_eq!(domain.environment, Some(ObjectRef::new("e1")));
    }
}
