//! Shared fixtures for unit tests.

use std::sync::Arc;

use pingone_sdk::{ApiClient, ClientConfig, ProviderContext, RetryTiming, ServiceEndpoints};
use secrecy::SecretString;

/// A context pointed at an unreachable host; for code paths that must not
/// reach the network.
pub fn offline_context() -> ProviderContext {
    let config = ClientConfig {
        api_access_token: Some(SecretString::from("test")),
        service_endpoints: Some(ServiceEndpoints {
            api_hostname: Some("http://127.0.0.1:1".to_string()),
            auth_hostname: None,
        }),
        ..ClientConfig::default()
    };
    ProviderContext::new(
        Arc::new(ApiClient::new(&config, "test").unwrap()),
        RetryTiming::immediate(1),
    )
}
