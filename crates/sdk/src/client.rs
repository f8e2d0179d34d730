//! HTTP client for the PingOne management API.

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// HTTP metadata of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Status code
    pub status: u16,
    /// URL that was requested
    pub url: String,
}

/// A decoded success response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// Body, absent for `204 No Content` or an empty body
    pub body: Option<T>,
    /// HTTP metadata
    pub meta: ResponseMeta,
}

impl<T> ApiResponse<T> {
    /// Maps the body, keeping the metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            body: self.body.map(f),
            meta: self.meta,
        }
    }
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

enum Credentials {
    Token(SecretString),
    ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: SecretString,
        token: OnceCell<SecretString>,
    },
}

/// Authenticated PingOne API client.
///
/// One instance is built during provider configuration and shared by every
/// resource through an `Arc`.
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    credentials: Credentials,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client from a validated configuration.
    pub fn new(config: &ClientConfig, version: &str) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent(version));
        if let Some(proxy) = &config.http_proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| Error::config(format!("invalid http_proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| Error::config(format!("unable to build HTTP client: {e}")))?;

        let credentials = match &config.api_access_token {
            Some(token) if !token.expose_secret().is_empty() => Credentials::Token(token.clone()),
            _ => {
                let (Some(client_id), Some(client_secret), Some(environment_id)) =
                    (&config.client_id, &config.client_secret, &config.environment_id)
                else {
                    return Err(Error::config("client credentials are incomplete"));
                };
                Credentials::ClientCredentials {
                    token_url: format!("{}/{environment_id}/as/token", config.auth_base_url()?),
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    token: OnceCell::new(),
                }
            }
        };

        Ok(Self {
            http,
            api_base: config.api_base_url()?,
            credentials,
        })
    }

    /// Management API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn bearer(&self) -> Result<&SecretString> {
        match &self.credentials {
            Credentials::Token(token) => Ok(token),
            Credentials::ClientCredentials {
                token_url,
                client_id,
                client_secret,
                token,
            } => {
                token
                    .get_or_try_init(|| async {
                        debug!(token_url, "Requesting access token");
                        let response = self
                            .http
                            .post(token_url)
                            .basic_auth(client_id, Some(client_secret.expose_secret()))
                            .form(&[("grant_type", "client_credentials")])
                            .send()
                            .await
                            .map_err(|e| Error::Token { message: e.to_string() })?;
                        if !response.status().is_success() {
                            return Err(Error::Token {
                                message: format!("token endpoint returned {}", response.status()),
                            });
                        }
                        let body: TokenResponse = response
                            .json()
                            .await
                            .map_err(|e| Error::Token { message: e.to_string() })?;
                        Ok(SecretString::from(body.access_token))
                    })
                    .await
            }
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{path}", self.api_base)
        }
    }

    /// Sends one request and decodes the response.
    ///
    /// `path` is relative to the API base unless it is already absolute, as
    /// with HAL `next` links.
    #[instrument(skip_all, fields(operation = %operation, method = %method))]
    pub async fn send<B, T>(&self, operation: &str, method: Method, path: &str, body: Option<&B>) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let token = self.bearer().await?;

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(token.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| Error::from_reqwest(operation, &e))?;
        let status = response.status();
        debug!(operation, status = status.as_u16(), url = %url, "PingOne API response");

        let meta = ResponseMeta {
            status: status.as_u16(),
            url,
        };
        let bytes = response.bytes().await.map_err(|e| Error::from_reqwest(operation, &e))?;

        if !status.is_success() {
            return Err(Error::api(operation, meta.status, String::from_utf8_lossy(&bytes)));
        }

        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse { body: None, meta });
        }

        let decoded = serde_json::from_slice(&bytes).map_err(|e| Error::decode(operation, e.to_string()))?;
        Ok(ApiResponse {
            body: Some(decoded),
            meta,
        })
    }

    /// `GET` a resource.
    pub async fn get<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<ApiResponse<T>> {
        self.send::<(), T>(operation, Method::GET, path, None).await
    }

    /// `POST` a new resource.
    pub async fn post<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(operation, Method::POST, path, Some(body)).await
    }

    /// `PUT` a full replacement.
    pub async fn put<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(operation, Method::PUT, path, Some(body)).await
    }

    /// `DELETE` a resource.
    pub async fn delete(&self, operation: &str, path: &str) -> Result<ApiResponse<()>> {
        let response = self
            .send::<(), serde_json::Value>(operation, Method::DELETE, path, None)
            .await?;
        Ok(ApiResponse {
            body: Some(()),
            meta: response.meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEndpoints;
    use serde_json::{Value as Json, json};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_config(server: &MockServer) -> ClientConfig {
        ClientConfig {
            api_access_token: Some(SecretString::from("static-token")),
            service_endpoints: Some(ServiceEndpoints {
                api_hostname: Some(server.uri()),
                auth_hostname: Some(server.uri()),
            }),
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/environments/abc"))
            .and(header("authorization", "Bearer static-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&token_config(&server), "test").unwrap();
        let response: ApiResponse<Json> = client.get("ReadOneEnvironment", "/environments/abc").await.unwrap();
        assert_eq!(response.body, Some(json!({"id": "abc"})));
        assert_eq!(response.meta.status, 200);
        assert!(response.meta.url.ends_with("/v1/environments/abc"));
    }

    #[tokio::test]
    async fn test_client_credentials_token_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/env-1/as/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "issued", "token_type": "Bearer", "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer issued"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let config = ClientConfig {
            client_id: Some("client".to_string()),
            client_secret: Some(SecretString::from("secret")),
            environment_id: Some("env-1".to_string()),
            service_endpoints: Some(ServiceEndpoints {
                api_hostname: Some(server.uri()),
                auth_hostname: Some(server.uri()),
            }),
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config, "test").unwrap();
        for _ in 0..2 {
            let _: ApiResponse<Json> = client.get("ReadOneEnvironment", "/environments/x").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "id": "corr", "code": "NOT_FOUND", "message": "Unable to find gateway"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&token_config(&server), "test").unwrap();
        let err = client
            .get::<Json>("ReadOneGateway", "/environments/e/gateways/g")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.p1_error().map(|e| e.code.as_str()), Some("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_no_content_has_no_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ApiClient::new(&token_config(&server), "test").unwrap();
        let response = client.delete("DeleteGateway", "/environments/e/gateways/g").await.unwrap();
        assert_eq!(response.meta.status, 204);
    }

    #[tokio::test]
    async fn test_undecodable_success_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&token_config(&server), "test").unwrap();
        let err = client.get::<Json>("ReadOneWebhook", "/x").await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
