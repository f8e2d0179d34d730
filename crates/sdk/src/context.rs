//! The value handed to every resource operation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::config::RetryTiming;

/// Shared client, retry timing and the cancellation token for the current
/// host request.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    /// Authenticated API client
    pub client: Arc<ApiClient>,
    /// Backoff timing used unless a policy pins its own
    pub retry: RetryTiming,
    /// Fires when the host abandons the request
    pub cancel: CancellationToken,
}

impl ProviderContext {
    /// A context with a fresh cancellation token.
    #[must_use]
    pub fn new(client: Arc<ApiClient>, retry: RetryTiming) -> Self {
        Self {
            client,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// The same client and timing under another request's token.
    #[must_use]
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            client: Arc::clone(&self.client),
            retry: self.retry.clone(),
            cancel,
        }
    }
}
