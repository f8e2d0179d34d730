//! PingOne management API access for the Terraform provider.
//!
//! - [`ApiClient`]: authenticated reqwest client bound to one region
//! - [`invoke`]: the call-and-parse kernel with retry, cancellation and
//!   error classification
//! - [`check_environment_exists_on_permissions_error`]: turns permission
//!   failures on deleted environments into 404s
//! - [`collect_pages`]: drains paged list endpoints
//! - [`management`]: typed request and response models

pub mod api_error;
pub mod classify;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod invoke;
pub mod management;
pub mod pager;
pub mod region;
pub mod retry;

pub use api_error::{P1Error, P1ErrorDetail, format_error_detail};
pub use classify::{DefaultClassifier, ErrorClassifier, first_of, not_found_warning};
pub use client::{ApiClient, ApiResponse, ResponseMeta};
pub use config::{ClientConfig, RetryTiming, ServiceEndpoints};
pub use context::ProviderContext;
pub use error::{Error, Result};
pub use guard::check_environment_exists_on_permissions_error;
pub use invoke::{error_diagnostics, invoke};
pub use pager::{CollectedPages, Page, collect_pages};
pub use region::Region;
pub use retry::{RetryPolicy, RetryPredicate};
