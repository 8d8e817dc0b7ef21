//! Lazy pagination over list results
//!
//! List endpoints return one page of `items` per request and point at the
//! following page through a `Link: <url>; rel="next"` response header. A
//! [`Paginator`] hands out buffered items one by one and fetches the next page
//! only once the current one is used up. There is no read-ahead.

use crate::utils::error::SparkResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::{debug, warn};

/// One decoded list response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Objects in server order
    pub items: Vec<Value>,
    /// Absolute URL of the following page
    pub next: Option<String>,
}

#[derive(Deserialize)]
struct PageBody {
    #[serde(default)]
    items: Vec<Value>,
}

impl Page {
    /// Build a page from a response body and its `Link` header values.
    ///
    /// A body without an `items` array is an empty page.
    pub fn from_parts<'a, I>(body: &[u8], link_headers: I) -> SparkResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let body: PageBody = serde_json::from_slice(body)?;
        let next = link_headers.into_iter().find_map(parse_next_link);
        Ok(Self { items: body.items, next })
    }

    /// Drop a continuation pointing back at `url`, the page just fetched.
    /// Following it would request the same page forever.
    pub fn unlink_self(mut self, url: &str) -> Self {
        if self.next.as_deref() == Some(url) {
            warn!("Page {} links to itself, ending pagination", url);
            self.next = None;
        }
        self
    }
}

/// Extract the `rel="next"` target from a `Link` header value.
///
/// The value may hold several comma separated `<url>; param=value` entries.
/// The relation may be quoted or bare.
pub fn parse_next_link(header: &str) -> Option<String> {
    let mut rest = header;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let url = &after[..end];
        let tail = &after[end + 1..];
        // Parameters run until the next entry
        let params_end = tail.find('<').unwrap_or(tail.len());
        let is_next = tail[..params_end]
            .split(';')
            .filter_map(|param| param.split_once('='))
            .any(|(key, value)| {
                key.trim().eq_ignore_ascii_case("rel")
                    && value
                        .trim()
                        .trim_end_matches(',')
                        .trim()
                        .trim_matches('"')
                        .split_whitespace()
                        .any(|rel| rel.eq_ignore_ascii_case("next"))
            });
        if is_next {
            return Some(url.trim().to_string());
        }
        rest = &tail[params_end..];
    }
    None
}

/// Something able to fetch a continuation page by absolute URL
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> SparkResult<Page>;
}

/// Where a paginator stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// Items of the current page remain
    HasBufferedItems,
    /// The current page is used up and a continuation is pending
    NeedsFetch,
    /// No items remain and no continuation exists
    Exhausted,
}

/// Forward-only sequence over the items of a list call.
///
/// Items are decoded into `T` as they are handed out. A failed page fetch ends
/// the sequence; a single item that fails to decode does not.
pub struct Paginator<T = Value> {
    source: Arc<dyn PageSource>,
    items: Vec<Value>,
    index: usize,
    next: Option<String>,
    fetches: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("buffered", &(self.items.len() - self.index))
            .field("next", &self.next)
            .field("fetches", &self.fetches)
            .finish()
    }
}

impl Paginator<Value> {
    /// Seed a paginator with the first page of a list call
    pub fn new(first: Page, source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            items: first.items,
            index: 0,
            next: first.next,
            fetches: 0,
            _item: PhantomData,
        }
    }
}

impl<T> Paginator<T> {
    /// Decode remaining items as `U` instead
    pub fn into_typed<U: DeserializeOwned>(self) -> Paginator<U> {
        Paginator {
            source: self.source,
            items: self.items,
            index: self.index,
            next: self.next,
            fetches: self.fetches,
            _item: PhantomData,
        }
    }

    pub fn state(&self) -> PaginatorState {
        if self.index < self.items.len() {
            PaginatorState::HasBufferedItems
        } else if self.next.is_some() {
            PaginatorState::NeedsFetch
        } else {
            PaginatorState::Exhausted
        }
    }

    /// Number of continuation pages fetched so far
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl<T: DeserializeOwned> Paginator<T> {
    /// Advance to the next item.
    ///
    /// Returns `Ok(None)` at the end of the sequence, and keeps doing so on
    /// every later call without touching the network.
    pub async fn next(&mut self) -> SparkResult<Option<T>> {
        loop {
            if self.index < self.items.len() {
                let raw = std::mem::take(&mut self.items[self.index]);
                self.index += 1;
                return Ok(Some(serde_json::from_value(raw)?));
            }

            // Cloned rather than taken so a cancelled fetch can be resumed
            let Some(url) = self.next.clone() else {
                self.items.clear();
                self.index = 0;
                return Ok(None);
            };

            debug!("Fetching next page: {}", url);
            match self.source.fetch_page(&url).await {
                Ok(page) => {
                    self.fetches += 1;
                    debug!("Fetched page with {} items", page.items.len());
                    let page = page.unlink_self(&url);
                    self.items = page.items;
                    self.index = 0;
                    self.next = page.next;
                }
                Err(e) => {
                    self.items.clear();
                    self.index = 0;
                    self.next = None;
                    return Err(e);
                }
            }
        }
    }

    /// Drain every remaining item
    pub async fn collect_all(mut self) -> SparkResult<Vec<T>> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await? {
            out.push(item);
        }
        Ok(out)
    }
}

impl<T: DeserializeOwned + Send + 'static> Paginator<T> {
    /// Turn the paginator into a `Stream`; the stream ends after the first error
    pub fn into_stream(self) -> impl Stream<Item = SparkResult<T>> + Send {
        futures::stream::try_unfold(self, |mut paginator| async move {
            Ok(paginator.next().await?.map(|item| (item, paginator)))
        })
    }
}
