//! Cursor-driven pagination over search endpoints.
//!
//! Rev search endpoints return a page of items, a total count, and a
//! `scrollId` to pass back for the next page. [`Scroll`] walks that chain one
//! request at a time.
//!
//! # Example
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use revclient::{BaseUrl, Credential, RevClient};
//!
//! # async fn example() -> Result<(), revclient::Error> {
//! let client = RevClient::new(
//!     BaseUrl::new("https://tenant.rev.vbrick.com")?,
//!     Credential::api_key("key", "secret")?,
//! )?;
//! client.login().await?;
//!
//! let scroll = client.scroll::<serde_json::Value>(
//!     "/api/v2/videos/search",
//!     "totalVideos",
//!     "videos",
//!     Default::default(),
//!     Some(500),
//! );
//! let mut pages = std::pin::pin!(scroll.into_stream());
//! while let Some(page) = pages.next().await {
//!     let page = page?;
//!     println!("{} of {}", page.current + page.items.len(), page.total);
//! }
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;

use futures_util::Stream;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::client::RevClient;
use crate::error::Error;

/// Upper bound on results when the caller gives none.
pub const MAX_RESULTS: usize = i32::MAX as usize;

/// Query field carrying the continuation cursor.
const SCROLL_ID: &str = "scrollId";

/// One page of a scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Items on this page, truncated to the remaining result budget.
    pub items: Vec<T>,
    /// Items yielded by earlier pages.
    pub current: usize,
    /// Expected total, capped at the caller's maximum.
    pub total: usize,
    /// Continuation cursor; `None` on the final page.
    pub scroll_id: Option<String>,
}

/// A lazy, bounded sequence of pages from a search endpoint.
///
/// Each call to [`next_page`](Self::next_page) issues exactly one request.
/// A scroll cannot be restarted; create a new one to begin again.
#[derive(Debug)]
pub struct Scroll<T = Value> {
    client: RevClient,
    endpoint: String,
    total_key: String,
    items_key: String,
    query: Map<String, Value>,
    max_results: usize,
    total: Option<usize>,
    current: usize,
    done: bool,
    _items: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Scroll<T> {
    pub(crate) fn new(
        client: RevClient,
        endpoint: impl Into<String>,
        total_key: impl Into<String>,
        items_key: impl Into<String>,
        query: Map<String, Value>,
        max_results: Option<usize>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            total_key: total_key.into(),
            items_key: items_key.into(),
            query,
            max_results: max_results.unwrap_or(MAX_RESULTS),
            total: None,
            current: 0,
            done: false,
            _items: PhantomData,
        }
    }

    /// Items yielded so far.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Whether the sequence has ended.
    pub fn is_exhausted(&self) -> bool {
        self.done
    }

    /// Fetch the next page, or `None` once the sequence is exhausted.
    ///
    /// An error also ends the sequence.
    pub async fn next_page(&mut self) -> Result<Option<PageResult<T>>, Error> {
        if self.done || self.budget_spent() {
            self.done = true;
            return Ok(None);
        }

        let result = self.fetch_page().await;
        if !matches!(result, Ok(Some(_))) {
            self.done = true;
        }
        result
    }

    /// Adapt into a stream of pages.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<PageResult<T>, Error>> {
        async_stream::try_stream! {
            while let Some(page) = self.next_page().await? {
                yield page;
            }
        }
    }

    /// Adapt into a stream of individual items.
    pub fn into_item_stream(mut self) -> impl Stream<Item = Result<T, Error>> {
        async_stream::try_stream! {
            while let Some(page) = self.next_page().await? {
                for item in page.items {
                    yield item;
                }
            }
        }
    }

    fn budget_spent(&self) -> bool {
        self.current >= self.max_results || self.total.is_some_and(|total| self.current >= total)
    }

    async fn fetch_page(&mut self) -> Result<Option<PageResult<T>>, Error> {
        trace!(endpoint = %self.endpoint, current = self.current, "Fetching page");

        let reply = self
            .client
            .get(&self.endpoint, Some(Value::Object(self.query.clone())))
            .await?;

        let mut body = match reply.into_json()? {
            Some(Value::Object(body)) if !body.is_empty() => body,
            Some(Value::Object(_)) | Some(Value::Null) | None => {
                debug!(endpoint = %self.endpoint, "Empty page, ending scroll");
                return Ok(None);
            }
            Some(_) => return Err(Error::decode("scroll page is not a JSON object")),
        };

        let scroll_id = body
            .get(SCROLL_ID)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        match &scroll_id {
            Some(id) => {
                self.query
                    .insert(SCROLL_ID.to_string(), Value::String(id.clone()));
            }
            None => {
                self.query.remove(SCROLL_ID);
            }
        }

        if self.total.is_none() {
            let reported = body
                .get(&self.total_key)
                .and_then(Value::as_u64)
                .map_or(MAX_RESULTS, |total| usize::try_from(total).unwrap_or(MAX_RESULTS));
            self.total = Some(reported.min(self.max_results));
        }
        let total = self.total.unwrap_or(self.max_results);

        let mut raw_items = match body.remove(&self.items_key) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                return Err(Error::decode(format!(
                    "scroll field '{}' is not an array",
                    self.items_key
                )));
            }
        };
        raw_items.truncate(self.max_results - self.current);

        let items = raw_items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| Error::decode(format!("invalid scroll item: {}", e)))?;

        let page = PageResult {
            current: self.current,
            total,
            scroll_id,
            items,
        };
        self.current += page.items.len();

        // A page without a cursor is the last one; an empty page with a
        // cursor would otherwise loop forever.
        if page.scroll_id.is_none() || page.items.is_empty() {
            self.done = true;
        }

        debug!(
            endpoint = %self.endpoint,
            items = page.items.len(),
            current = self.current,
            total,
            "Scroll page"
        );

        Ok(Some(page))
    }
}
