//! Shared helpers for provider integration tests

#![allow(dead_code)]

use std::sync::Arc;

use pingone_framework::Diagnostics;
use pingone_sdk::{ApiClient, ClientConfig, ProviderContext, RetryTiming, ServiceEndpoints};
use secrecy::SecretString;
use serde_json::{Value as Json, json};
use terraform_provider_pingone::ProviderServer;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ENV: &str = "11111111-1111-1111-1111-111111111111";
pub const DOMAIN_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const GONE_ID: &str = "33333333-3333-3333-3333-333333333333";
pub const USER: &str = "44444444-4444-4444-4444-444444444444";
pub const ASSIGNMENT: &str = "55555555-5555-5555-5555-555555555555";
pub const ROLE: &str = "66666666-6666-6666-6666-666666666666";

/// A provider server whose client talks to `server`.
pub fn provider(server: &MockServer, max_attempts: u32) -> ProviderServer {
    let config = ClientConfig {
        api_access_token: Some(SecretString::from("test-token")),
        service_endpoints: Some(ServiceEndpoints {
            api_hostname: Some(server.uri()),
            auth_hostname: None,
        }),
        ..ClientConfig::default()
    };
    let client = ApiClient::new(&config, "test").unwrap();
    let context = ProviderContext::new(Arc::new(client), RetryTiming::immediate(max_attempts));
    ProviderServer::new().unwrap().with_context(context)
}

/// Answers the environment-existence lookup: `ENV` still exists.
pub async fn mount_live_environment(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/environments/{ENV}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": ENV})))
        .mount(server)
        .await;
}

/// A PingOne error response.
pub fn p1_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "id": "corr-1",
        "code": code,
        "message": message
    }))
}

pub fn not_found(message: &str) -> ResponseTemplate {
    p1_error(404, "NOT_FOUND", message)
}

pub fn forbidden() -> ResponseTemplate {
    p1_error(
        403,
        "ACCESS_FAILED",
        "The request could not be completed. You do not have access to this resource.",
    )
}

pub fn error_summaries(diagnostics: &Diagnostics) -> Vec<&str> {
    diagnostics.errors().map(|d| d.summary.as_str()).collect()
}

pub fn warning_summaries(diagnostics: &Diagnostics) -> Vec<&str> {
    diagnostics.warnings().map(|d| d.summary.as_str()).collect()
}

/// Stored trusted email domain state.
pub fn domain_state(id: &str) -> Json {
    json!({
        "id": id,
        "environment_id": ENV,
        "domain_name": "demo.example.org",
        "trusted_email_domain_id": id
    })
}
