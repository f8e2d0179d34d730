//! Paged list endpoints.
//!
//! PingOne list responses embed a page of items under `_embedded.{key}` and
//! link the following page at `_links.next.href`. [`ApiClient::pages`]
//! follows those links lazily; [`collect_pages`] drains the stream.

use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use tracing::debug;

use crate::client::{ApiClient, ApiResponse, ResponseMeta};
use crate::error::{Error, Result};

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// HTTP metadata of this page
    pub meta: ResponseMeta,
}

/// Everything gathered from a paged stream.
#[derive(Debug)]
pub struct CollectedPages<T> {
    /// Items from every page read, in order, without deduplication
    pub items: Vec<T>,
    /// HTTP metadata of the first page, when one was read
    pub first_response: Option<ResponseMeta>,
    /// The error that stopped the drain
    pub error: Option<Error>,
}

impl<T> CollectedPages<T> {
    /// Items when the drain completed, the error otherwise.
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.items),
        }
    }

    /// The drained items as one response carrying the first page's metadata,
    /// so a whole drain can run as a single kernel attempt.
    pub fn into_response(self) -> Result<ApiResponse<Vec<T>>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(ApiResponse {
            body: Some(self.items),
            meta: self.first_response.unwrap_or_default(),
        })
    }
}

/// Drains a page stream, stopping at the first error.
pub async fn collect_pages<T, S>(pages: S) -> CollectedPages<T>
where
    S: Stream<Item = Result<Page<T>>>,
{
    let mut collected = CollectedPages {
        items: Vec::new(),
        first_response: None,
        error: None,
    };

    let mut pages = std::pin::pin!(pages);
    while let Some(page) = pages.next().await {
        match page {
            Ok(page) => {
                if collected.first_response.is_none() {
                    collected.first_response = Some(page.meta);
                }
                collected.items.extend(page.items);
            }
            Err(err) => {
                collected.error = Some(err);
                break;
            }
        }
    }
    collected
}

fn decode_page<T: DeserializeOwned>(operation: &str, key: &str, body: Option<Json>) -> Result<(Vec<T>, Option<String>)> {
    let Some(mut body) = body else {
        return Ok((Vec::new(), None));
    };

    let next = body
        .pointer("/_links/next/href")
        .and_then(Json::as_str)
        .map(str::to_string);

    let items = match body.pointer_mut(&format!("/_embedded/{key}")).map(Json::take) {
        Some(raw) => serde_json::from_value(raw).map_err(|e| Error::decode(operation, e.to_string()))?,
        None => Vec::new(),
    };
    Ok((items, next))
}

impl ApiClient {
    /// Lazily fetches every page of a list endpoint.
    pub fn pages<'a, T>(&'a self, operation: &'a str, path: &str, key: &'a str) -> impl Stream<Item = Result<Page<T>>> + use<'a, T>
    where
        T: DeserializeOwned + 'a,
    {
        stream::unfold(Some(path.to_string()), move |next| async move {
            let url = next?;
            let page = match self.get::<Json>(operation, &url).await {
                Ok(response) => response,
                Err(err) => return Some((Err(err), None)),
            };
            match decode_page(operation, key, page.body) {
                Ok((items, next)) => {
                    debug!(operation, items = items.len(), has_next = next.is_some(), "Fetched page");
                    Some((Ok(Page { items, meta: page.meta }), next))
                }
                Err(err) => Some((Err(err), None)),
            }
        })
    }
}
