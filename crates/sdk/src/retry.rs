//! Retry policies for PingOne API calls
//!
//! A policy is a list of predicates over a failed call. The kernel retries a
//! failure when any predicate matches, backing off exponentially until the
//! attempt limit or the overall window is reached.

use std::sync::LazyLock;
use std::time::Duration;

use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use regex::Regex;
use tracing::debug;

use crate::config::RetryTiming;
use crate::error::Error;

/// HTTP statuses treated as transient by the default policy.
pub const TRANSIENT_STATUSES: [u16; 4] = [429, 502, 503, 504];

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

static ACTOR_NOT_AUTHORIZED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^The actor attempting to perform the request is not authorized\."));

static ROLE_SCOPE_NOT_PROPAGATED: LazyLock<Regex> =
    LazyLock::new(|| compile("^Must have role at the same or broader scope"));

/// One condition under which a failed call is retried.
#[derive(Debug, Clone)]
pub enum RetryPredicate {
    /// No HTTP response was received
    Transport,
    /// The response status is one of these
    Status(Vec<u16>),
    /// The PingOne error code equals this value
    ErrorCode(String),
    /// The top-level PingOne error message matches
    MessageMatches(Regex),
    /// The first detail's message matches
    DetailMessageMatches(Regex),
}

impl RetryPredicate {
    fn matches(&self, err: &Error) -> bool {
        match self {
            Self::Transport => err.is_transport(),
            Self::Status(statuses) => err.status().is_some_and(|s| statuses.contains(&s)),
            Self::ErrorCode(code) => err.p1_error().is_some_and(|e| &e.code == code),
            Self::MessageMatches(regex) => err.p1_error().is_some_and(|e| regex.is_match(&e.message)),
            Self::DetailMessageMatches(regex) => err
                .p1_error()
                .and_then(|e| e.first_detail())
                .and_then(|d| d.message.as_deref())
                .is_some_and(|m| regex.is_match(m)),
        }
    }
}

/// When and how often to retry a call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Conditions that make a failure retryable
    pub predicates: Vec<RetryPredicate>,
    /// Backoff timing; `None` uses the provider-wide timing
    pub timing: Option<RetryTiming>,
}

impl Default for RetryPolicy {
    /// Retries transport failures and transient statuses.
    fn default() -> Self {
        Self {
            predicates: vec![
                RetryPredicate::Transport,
                RetryPredicate::Status(TRANSIENT_STATUSES.to_vec()),
            ],
            timing: None,
        }
    }
}

impl RetryPolicy {
    /// Never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            predicates: Vec::new(),
            timing: None,
        }
    }

    /// The default policy plus permission propagation delays after create.
    #[must_use]
    pub fn create_read() -> Self {
        Self::default().with(RetryPredicate::MessageMatches(ACTOR_NOT_AUTHORIZED.clone()))
    }

    /// [`Self::create_read`] plus role scope propagation delays.
    #[must_use]
    pub fn role_assignment() -> Self {
        Self::create_read().with(RetryPredicate::DetailMessageMatches(ROLE_SCOPE_NOT_PROPAGATED.clone()))
    }

    /// Adds a predicate.
    #[must_use]
    pub fn with(mut self, predicate: RetryPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Pins the backoff timing.
    #[must_use]
    pub fn with_timing(mut self, timing: RetryTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Whether a failure should be retried.
    #[must_use]
    pub fn is_retryable(&self, err: &Error) -> bool {
        if matches!(err, Error::Cancelled { .. } | Error::Decode { .. } | Error::InvalidConfig { .. }) {
            return false;
        }
        let retryable = self.predicates.iter().any(|p| p.matches(err));
        if !retryable {
            debug!(error = %err, "Error is not retryable");
        }
        retryable
    }
}

/// Builds the backoff schedule for one call.
pub(crate) fn create_backoff(timing: &RetryTiming) -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_initial_interval(timing.initial_backoff())
        .with_max_interval(timing.max_backoff())
        .with_multiplier(timing.backoff_multiplier)
        .with_max_elapsed_time(Some(timing.max_elapsed().max(Duration::from_millis(1))))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, body: &str) -> Error {
        Error::api("CreateGateway", status, body)
    }

    #[test]
    fn test_default_retries_transient_only() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable(&Error::transport("op", "reset")));
        for status in TRANSIENT_STATUSES {
            assert!(policy.is_retryable(&api(status, "")), "{status}");
        }
        assert!(!policy.is_retryable(&api(400, "")));
        assert!(!policy.is_retryable(&api(404, "")));
        assert!(!policy.is_retryable(&api(500, "")));
    }

    #[test]
    fn test_none_never_retries() {
        let policy = RetryPolicy::none();
        assert!(!policy.is_retryable(&Error::transport("op", "reset")));
        assert!(!policy.is_retryable(&api(503, "")));
    }

    #[test]
    fn test_create_read_retries_actor_not_authorized() {
        let body = r#"{"id":"x","code":"ACCESS_FAILED","message":"The actor attempting to perform the request is not authorized."}"#;
        assert!(RetryPolicy::create_read().is_retryable(&api(403, body)));
        assert!(!RetryPolicy::default().is_retryable(&api(403, body)));
    }

    #[test]
    fn test_role_assignment_retries_scope_propagation() {
        let body = r#"{"id":"x","code":"INVALID_DATA","message":"Validation failed","details":[{"code":"INVALID_VALUE","target":"scope","message":"Must have role at the same or broader scope as the assigned role"}]}"#;
        assert!(RetryPolicy::role_assignment().is_retryable(&api(400, body)));
        assert!(!RetryPolicy::create_read().is_retryable(&api(400, body)));
    }

    #[test]
    fn test_error_code_predicate() {
        let policy = RetryPolicy::none().with(RetryPredicate::ErrorCode("REQUEST_LIMITED".to_string()));
        assert!(policy.is_retryable(&api(400, r#"{"id":"x","code":"REQUEST_LIMITED","message":"slow down"}"#)));
    }

    #[test]
    fn test_cancellation_is_never_retried() {
        let policy = RetryPolicy::default().with(RetryPredicate::Transport);
        assert!(!policy.is_retryable(&Error::Cancelled {
            operation: "op".to_string()
        }));
    }
}
