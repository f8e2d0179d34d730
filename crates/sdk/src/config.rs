//! Client configuration
//!
//! Values come from the provider block first; anything left unset falls back
//! to the `PINGONE_*` environment variables through
//! [`ClientConfig::with_env_overrides`]. Once a client is built from a
//! configuration the configuration is not consulted again.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::region::Region;

/// Environment variable names read by [`ClientConfig::with_env_overrides`].
pub mod env {
    /// Worker application client ID
    pub const CLIENT_ID: &str = "PINGONE_CLIENT_ID";
    /// Worker application client secret
    pub const CLIENT_SECRET: &str = "PINGONE_CLIENT_SECRET";
    /// Environment hosting the worker application
    pub const ENVIRONMENT_ID: &str = "PINGONE_ENVIRONMENT_ID";
    /// Pre-issued access token
    pub const API_ACCESS_TOKEN: &str = "PINGONE_API_ACCESS_TOKEN";
    /// Region code
    pub const REGION_CODE: &str = "PINGONE_REGION_CODE";
    /// Management API hostname override
    pub const API_SERVICE_HOSTNAME: &str = "PINGONE_API_SERVICE_HOSTNAME";
    /// Authorization server hostname override
    pub const AUTH_SERVICE_HOSTNAME: &str = "PINGONE_AUTH_SERVICE_HOSTNAME";
    /// Suffix for the user agent
    pub const APPEND_USER_AGENT: &str = "PINGONE_TF_APPEND_USER_AGENT";
    /// Outbound proxy
    pub const HTTPS_PROXY: &str = "HTTPS_PROXY";
}

/// PingOne connection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Worker application client ID
    #[serde(default)]
    pub client_id: Option<String>,

    /// Worker application client secret
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// Environment that hosts the worker application
    #[serde(default)]
    pub environment_id: Option<String>,

    /// Bearer token used instead of the client credentials grant
    #[serde(default)]
    pub api_access_token: Option<SecretString>,

    /// Region code, e.g. `NA`
    #[serde(default)]
    pub region_code: Option<String>,

    /// Outbound HTTP proxy URL
    #[serde(default)]
    pub http_proxy: Option<String>,

    /// Text appended to the user agent
    #[serde(default)]
    pub append_user_agent: Option<String>,

    /// Hostname overrides
    #[serde(default)]
    pub service_endpoints: Option<ServiceEndpoints>,

    /// Retry timing for API calls
    #[serde(default)]
    pub retry: RetryTiming,
}

/// Custom service hostnames.
///
/// A bare hostname is served over HTTPS; a value with a scheme is used as the
/// base URL unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceEndpoints {
    /// Management API host
    #[serde(default)]
    pub api_hostname: Option<String>,
    /// Authorization server host
    #[serde(default)]
    pub auth_hostname: Option<String>,
}

/// Backoff timing shared by every API call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetryTiming {
    /// Maximum calls per operation, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First backoff interval in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Growth factor between intervals
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Overall retry window in seconds
    #[serde(default = "default_max_elapsed_secs")]
    pub max_elapsed_secs: u64,
}

impl Default for RetryTiming {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_elapsed_secs: default_max_elapsed_secs(),
        }
    }
}

impl RetryTiming {
    /// Timing with near-zero waits, for tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            backoff_multiplier: 1.5,
            max_elapsed_secs: default_max_elapsed_secs(),
        }
    }

    /// First backoff interval.
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Backoff ceiling.
    #[must_use]
    pub const fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Overall retry window.
    #[must_use]
    pub const fn max_elapsed(&self) -> Duration {
        Duration::from_secs(self.max_elapsed_secs)
    }
}

fn default_max_attempts() -> u32 {
    20
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_elapsed_secs() -> u64 {
    600
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn from_env(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn base_url(hostname: &str, suffix: &str) -> String {
    let hostname = hostname.trim_end_matches('/');
    if hostname.starts_with("http://") || hostname.starts_with("https://") {
        format!("{hostname}{suffix}")
    } else {
        format!("https://{hostname}{suffix}")
    }
}

impl ClientConfig {
    /// Fills every unset field from its environment variable.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.client_id = non_empty(self.client_id).or_else(|| from_env(env::CLIENT_ID));
        if self.client_secret.is_none() {
            self.client_secret = from_env(env::CLIENT_SECRET).map(SecretString::from);
        }
        self.environment_id = non_empty(self.environment_id).or_else(|| from_env(env::ENVIRONMENT_ID));
        if self.api_access_token.is_none() {
            self.api_access_token = from_env(env::API_ACCESS_TOKEN).map(SecretString::from);
        }
        self.region_code = non_empty(self.region_code).or_else(|| from_env(env::REGION_CODE));
        self.http_proxy = non_empty(self.http_proxy).or_else(|| from_env(env::HTTPS_PROXY));
        self.append_user_agent = non_empty(self.append_user_agent).or_else(|| from_env(env::APPEND_USER_AGENT));

        let mut endpoints = self.service_endpoints.take().unwrap_or_default();
        endpoints.api_hostname = non_empty(endpoints.api_hostname).or_else(|| from_env(env::API_SERVICE_HOSTNAME));
        endpoints.auth_hostname = non_empty(endpoints.auth_hostname).or_else(|| from_env(env::AUTH_SERVICE_HOSTNAME));
        if endpoints != ServiceEndpoints::default() {
            self.service_endpoints = Some(endpoints);
        }
        self
    }

    /// The configured region, defaulting to North America.
    pub fn region(&self) -> Result<Region> {
        self.region_code.as_deref().map_or(Ok(Region::default()), str::parse)
    }

    /// Checks that either a token or a complete set of client credentials is present.
    pub fn validate(&self) -> Result<()> {
        self.region()?;

        if self
            .api_access_token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
        {
            return Ok(());
        }

        let mut missing = Vec::new();
        if self.client_id.is_none() {
            missing.push("client_id");
        }
        if self
            .client_secret
            .as_ref()
            .is_none_or(|secret| secret.expose_secret().is_empty())
        {
            missing.push("client_secret");
        }
        if self.environment_id.is_none() {
            missing.push("environment_id");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::config(format!(
                "Grant type client_credentials requires {}.",
                missing.join(" and ")
            )))
        }
    }

    /// Management API base URL, ending in `/v1`.
    pub fn api_base_url(&self) -> Result<String> {
        if let Some(host) = self.service_endpoints.as_ref().and_then(|e| e.api_hostname.as_deref()) {
            return Ok(base_url(host, "/v1"));
        }
        Ok(self.region()?.api_url())
    }

    /// Authorization server base URL.
    pub fn auth_base_url(&self) -> Result<String> {
        if let Some(host) = self.service_endpoints.as_ref().and_then(|e| e.auth_hostname.as_deref()) {
            return Ok(base_url(host, ""));
        }
        Ok(self.region()?.auth_url())
    }

    /// User agent sent with every request.
    #[must_use]
    pub fn user_agent(&self, version: &str) -> String {
        let base = format!("terraform-provider-pingone/{version}");
        match self.append_user_agent.as_deref() {
            Some(suffix) => format!("{base} {suffix}"),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 9] = [
        env::CLIENT_ID,
        env::CLIENT_SECRET,
        env::ENVIRONMENT_ID,
        env::API_ACCESS_TOKEN,
        env::REGION_CODE,
        env::API_SERVICE_HOSTNAME,
        env::AUTH_SERVICE_HOSTNAME,
        env::APPEND_USER_AGENT,
        env::HTTPS_PROXY,
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[test]
    fn test_retry_defaults() {
        let timing = RetryTiming::default();
        assert_eq!(timing.max_attempts, 20);
        assert_eq!(timing.initial_backoff(), Duration::from_millis(500));
        assert_eq!(timing.max_elapsed(), Duration::from_secs(600));
    }

    #[test]
    fn test_deserialize_partial_retry() {
        let config: ClientConfig = serde_json::from_str(r#"{"retry": {"max_attempts": 3}}"#).unwrap();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.max_backoff_ms, 10_000);
    }

    #[test]
    fn test_env_fills_unset_fields_only() {
        let mut vars = cleared();
        vars.extend([
            (env::CLIENT_ID, Some("env-client")),
            (env::CLIENT_SECRET, Some("env-secret")),
            (env::ENVIRONMENT_ID, Some("env-environment")),
            (env::REGION_CODE, Some("EU")),
        ]);
        temp_env::with_vars(vars, || {
            let config = ClientConfig {
                client_id: Some("block-client".to_string()),
                ..ClientConfig::default()
            }
            .with_env_overrides();

            assert_eq!(config.client_id.as_deref(), Some("block-client"));
            assert_eq!(config.environment_id.as_deref(), Some("env-environment"));
            assert_eq!(config.region().unwrap(), Region::Eu);
            assert!(config.validate().is_ok());
        });
    }

    #[test]
    fn test_validate_reports_missing_credentials() {
        temp_env::with_vars(cleared(), || {
            let config = ClientConfig {
                client_id: Some("client".to_string()),
                ..ClientConfig::default()
            }
            .with_env_overrides();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("client_secret and environment_id"));
        });
    }

    #[test]
    fn test_access_token_is_sufficient() {
        let config = ClientConfig {
            api_access_token: Some(SecretString::from("token")),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_region() {
        let config = ClientConfig {
            region_code: Some("XX".to_string()),
            api_access_token: Some(SecretString::from("token")),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidRegion { .. })));
    }

    #[test]
    fn test_endpoint_overrides() {
        temp_env::with_vars(cleared(), || {
            let config = ClientConfig {
                service_endpoints: Some(ServiceEndpoints {
                    api_hostname: Some("http://127.0.0.1:8080/".to_string()),
                    auth_hostname: Some("auth.example.com".to_string()),
                }),
                ..ClientConfig::default()
            }
            .with_env_overrides();
            assert_eq!(config.api_base_url().unwrap(), "http://127.0.0.1:8080/v1");
            assert_eq!(config.auth_base_url().unwrap(), "https://auth.example.com");
        });
    }

    #[test]
    fn test_user_agent_suffix() {
        let config = ClientConfig {
            append_user_agent: Some("my-pipeline".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(config.user_agent("1.4.0"), "terraform-provider-pingone/1.4.0 my-pipeline");
    }
}
