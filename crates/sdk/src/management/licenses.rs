//! Organization licenses.

use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::pager::Page;

/// A license held by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// License ID
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Package, e.g. `MFA`
    #[serde(default)]
    pub package: Option<String>,
    /// `ACTIVE`, `EXPIRED`, `FUTURE` or `TERMINATED`
    #[serde(default)]
    pub status: Option<String>,
    /// Owning organization
    #[serde(default)]
    pub organization: Option<ObjectRef>,
    /// Start of validity
    #[serde(default)]
    pub begins_at: Option<DateTime<Utc>>,
    /// End of validity
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Early termination
    #[serde(default)]
    pub terminates_at: Option<DateTime<Utc>>,
}

impl License {
    /// Value of a filterable attribute (`name`, `package` or `status`).
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "package" => self.package.as_deref(),
            "status" => self.status.as_deref(),
            _ => None,
        }
    }
}

impl ApiClient {
    /// `ReadAllLicenses`, optionally narrowed by a SCIM filter.
    pub fn licenses<'a>(
        &'a self,
        organization_id: &str,
        scim_filter: Option<&str>,
    ) -> Result<impl Stream<Item = Result<Page<License>>> + use<'a>> {
        let base = format!("{}/organizations/{organization_id}/licenses", self.api_base());
        let url = match scim_filter {
            Some(filter) => reqwest::Url::parse_with_params(&base, &[("filter", filter)]),
            None => reqwest::Url::parse(&base),
        }
        .map_err(|e| Error::config(format!("invalid licenses URL: {e}")))?;

        Ok(self.pages("ReadAllLicenses", url.as_str(), "licenses"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_timestamps() {
        let license: License = serde_json::from_value(json!({
            "id": "l1",
            "name": "Trial",
            "package": "MFA",
            "status": "ACTIVE",
            "beginsAt": "2024-01-01T00:00:00.000Z",
            "expiresAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(license.attribute("package"), Some("MFA"));
        assert_eq!(license.attribute("id"), None);
        assert_eq!(
            license.begins_at.map(|t| t.to_rfc3339()),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
        assert!(license.terminates_at.is_none());
    }
}
