//! The call-and-parse kernel every resource goes through.

use std::future::Future;

use backoff::backoff::Backoff;
use pingone_framework::Diagnostics;
use tracing::{debug, instrument, warn};

use crate::classify::{ErrorClassifier, default_diagnostics};
use crate::client::ApiResponse;
use crate::context::ProviderContext;
use crate::error::{Error, Result};
use crate::retry::{RetryPolicy, create_backoff};

enum Failure {
    Fatal(Error),
    Exhausted { attempts: u32, last: Error },
}

async fn call_with_retry<T, F, Fut>(
    ctx: &ProviderContext,
    operation: &str,
    mut thunk: F,
    policy: &RetryPolicy,
) -> std::result::Result<ApiResponse<T>, Failure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ApiResponse<T>>>,
{
    let timing = policy.timing.as_ref().unwrap_or(&ctx.retry);
    let mut backoff = create_backoff(timing);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let outcome = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => Err(Error::Cancelled { operation: operation.to_string() }),
            outcome = thunk() => outcome,
        };

        let err = match outcome {
            Ok(response) => {
                if attempts > 1 {
                    debug!(operation, attempts, "Operation succeeded after retry");
                }
                return Ok(response);
            }
            Err(err) => err,
        };

        if !policy.is_retryable(&err) {
            return Err(Failure::Fatal(err));
        }

        if attempts >= timing.max_attempts {
            warn!(operation, attempts, error = %err, "Operation failed after maximum retries");
            return Err(Failure::Exhausted { attempts, last: err });
        }

        let Some(duration) = backoff.next_backoff() else {
            warn!(operation, attempts, error = %err, "Retry window elapsed");
            return Err(Failure::Exhausted { attempts, last: err });
        };

        warn!(
            operation,
            attempts,
            error = %err,
            retry_in_ms = duration.as_millis(),
            "Operation failed, retrying"
        );

        tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => {
                return Err(Failure::Fatal(Error::Cancelled { operation: operation.to_string() }));
            }
            () = tokio::time::sleep(duration) => {}
        }
    }
}

/// Classifies a terminal error into diagnostics.
#[must_use]
pub fn error_diagnostics(operation: &str, err: &Error, classifier: &dyn ErrorClassifier) -> Diagnostics {
    match err {
        Error::Api { status, body, raw, .. } => {
            if let Some(diags) = classifier.classify(Some(*status), body.as_ref()) {
                return diags;
            }
            match body {
                Some(body) if !body.id.is_empty() || !body.code.is_empty() => default_diagnostics(operation, body),
                _ => Diagnostics::from_error(
                    format!("Error when calling `{operation}`: HTTP {status}"),
                    format!("Full response body: {raw}"),
                ),
            }
        }
        Error::Cancelled { .. } => Diagnostics::from_error(
            "Operation cancelled",
            format!("The call to `{operation}` was cancelled before it completed."),
        ),
        Error::Decode { message, .. } => Diagnostics::from_error(
            format!("Error when calling `{operation}`: unexpected response"),
            format!("The response could not be decoded: {message}. This is always a problem with the provider, please raise an issue with the provider maintainers."),
        ),
        Error::Transport { message, .. } => {
            Diagnostics::from_error(format!("Error when calling `{operation}`: {message}"), "")
        }
        other => Diagnostics::from_error(
            format!("Error when calling `{operation}`: {other}"),
            format!("A generic error has occurred.\nError details: {other:?}"),
        ),
    }
}

/// Runs `thunk` under `policy` and converts the outcome to diagnostics.
///
/// On success the decoded body is returned with no diagnostics. On failure
/// the body is `None`; `classifier` is consulted before the default mapping,
/// so a not-found classifier can turn a 404 into a warning.
#[instrument(skip_all, fields(operation = %operation))]
pub async fn invoke<T, F, Fut>(
    ctx: &ProviderContext,
    operation: &str,
    thunk: F,
    classifier: &dyn ErrorClassifier,
    policy: &RetryPolicy,
) -> (Option<T>, Diagnostics)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ApiResponse<T>>>,
{
    match call_with_retry(ctx, operation, thunk, policy).await {
        Ok(response) => (response.body, Diagnostics::new()),
        Err(Failure::Fatal(err)) => (None, error_diagnostics(operation, &err, classifier)),
        Err(Failure::Exhausted { attempts, last }) => {
            let detail = error_diagnostics(operation, &last, classifier)
                .iter()
                .map(|d| format!("{}\n{}", d.summary, d.detail).trim_end().to_string())
                .collect::<Vec<_>>()
                .join("\n\n");
            (
                None,
                Diagnostics::from_error(
                    format!("Error when calling `{operation}`: retries exhausted after {attempts} attempts"),
                    format!("The last attempt failed with:\n{detail}"),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{DefaultClassifier, not_found_warning};
    use crate::client::{ApiClient, ResponseMeta};
    use crate::config::{ClientConfig, RetryTiming};
    use pingone_framework::Severity;
    use secrecy::SecretString;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn context(max_attempts: u32) -> ProviderContext {
        let config = ClientConfig {
            api_access_token: Some(SecretString::from("token")),
            ..ClientConfig::default()
        };
        ProviderContext::new(
            Arc::new(ApiClient::new(&config, "test").unwrap()),
            RetryTiming::immediate(max_attempts),
        )
    }

    fn ok<T>(body: T) -> Result<ApiResponse<T>> {
        Ok(ApiResponse {
            body: Some(body),
            meta: ResponseMeta {
                status: 200,
                url: String::new(),
            },
        })
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let ctx = context(5);
        let call_count = Arc::new(AtomicUsize::new(0));
        let count = call_count.clone();

        let (value, diags) = invoke(
            &ctx,
            "ReadOneGateway",
            || {
                count.fetch_add(1, Ordering::SeqCst);
                async { ok(42) }
            },
            &DefaultClassifier,
            &RetryPolicy::default(),
        )
        .await;

        assert_eq!(value, Some(42));
        assert!(diags.is_empty());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let ctx = context(5);
        let call_count = Arc::new(AtomicUsize::new(0));
        let count = call_count.clone();

        let (value, diags) = invoke(
            &ctx,
            "CreateGateway",
            || {
                let attempt = count.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(Error::api("CreateGateway", 503, "unavailable"))
                    } else {
                        ok("created")
                    }
                }
            },
            &DefaultClassifier,
            &RetryPolicy::default(),
        )
        .await;

        assert_eq!(value, Some("created"));
        assert!(diags.is_empty());
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let ctx = context(5);
        let call_count = Arc::new(AtomicUsize::new(0));
        let count = call_count.clone();

        let (value, diags) = invoke::<(), _, _>(
            &ctx,
            "CreateWebhook",
            || {
                count.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(Error::api(
                        "CreateWebhook",
                        400,
                        r#"{"id":"c","code":"INVALID_DATA","message":"bad url"}"#,
                    ))
                }
            },
            &DefaultClassifier,
            &RetryPolicy::default(),
        )
        .await;

        assert!(value.is_none());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Invalid value when calling `CreateWebhook`: bad url");
        assert!(diag.detail.starts_with("PingOne Error Details:"));
    }

    #[tokio::test]
    async fn test_exhaustion_yields_single_error() {
        let ctx = context(3);
        let call_count = Arc::new(AtomicUsize::new(0));
        let count = call_count.clone();

        let (value, diags) = invoke::<(), _, _>(
            &ctx,
            "ReadOneGateway",
            || {
                count.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::transport("ReadOneGateway", "connection reset")) }
            },
            &DefaultClassifier,
            &RetryPolicy::default(),
        )
        .await;

        assert!(value.is_none());
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert_eq!(diags.iter().count(), 1);
        let diag = diags.iter().next().unwrap();
        assert!(diag.summary.contains("ReadOneGateway"));
        assert!(diag.summary.contains("3 attempts"));
        assert!(diag.detail.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_not_found_classifier_yields_warning() {
        let ctx = context(3);
        let (value, diags) = invoke::<(), _, _>(
            &ctx,
            "ReadOneGateway",
            || async {
                Err(Error::api(
                    "ReadOneGateway",
                    404,
                    r#"{"id":"c","code":"NOT_FOUND","message":"Unable to find gateway"}"#,
                ))
            },
            &not_found_warning,
            &RetryPolicy::default(),
        )
        .await;

        assert!(value.is_none());
        assert!(!diags.has_error());
        assert_eq!(diags.iter().next().unwrap().severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_cancellation_during_backoff() {
        let mut ctx = context(10);
        ctx.retry = RetryTiming {
            initial_backoff_ms: 60_000,
            max_backoff_ms: 60_000,
            ..RetryTiming::default()
        };
        let cancel = CancellationToken::new();
        let ctx = ctx.with_cancellation(cancel.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let (value, diags) = invoke::<(), _, _>(
            &ctx,
            "UpdateGateway",
            || async { Err(Error::api("UpdateGateway", 503, "")) },
            &DefaultClassifier,
            &RetryPolicy::default(),
        )
        .await;
        canceller.await.unwrap();

        assert!(value.is_none());
        assert_eq!(diags.iter().next().unwrap().summary, "Operation cancelled");
    }

    #[tokio::test]
    async fn test_unstructured_error_body() {
        let ctx = context(1);
        let (_, diags) = invoke::<(), _, _>(
            &ctx,
            "DeleteGateway",
            || async { Err(Error::api("DeleteGateway", 500, "<html>oops</html>")) },
            &DefaultClassifier,
            &RetryPolicy::none(),
        )
        .await;
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Error when calling `DeleteGateway`: HTTP 500");
        assert!(diag.detail.contains("<html>oops</html>"));
    }
}
