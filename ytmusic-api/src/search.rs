//! Search API.
//!
//! Endpoint: `POST /youtubei/v1/search`
//!
//! Request: `{ "query": "daft punk", "params": "<filter>" }`, see
//! [`SearchFilter`] for the filter values.
//!
//! Response (first page, abridged):
//! ```json
//! {
//!   "contents": { "tabbedSearchResultsRenderer": { "tabs": [{ "tabRenderer": { "content": {
//!     "sectionListRenderer": { "contents": [
//!       { "itemSectionRenderer": { ... } },
//!       { "musicShelfRenderer": {
//!           "contents": [ <song rows> ],
//!           "continuations": [{ "nextContinuationData": { "continuation": "..." } }] } }
//!     ] } } } }] } }
//! }
//! ```
//!
//! Continuation responses carry `continuationContents.musicShelfContinuation`
//! with the same `contents` / `continuations` pair.

use crate::client::YtMusicClient;
use crate::error::{Error, Result};
use crate::parse::continuation_token;
use crate::track::parse_songs;
use crate::types::{SearchFilter, Song};
use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use ytmusic_core::{JsonDocument, JsonNode, Page, PageFetcher, Paginator};

fn shelf_page(shelf: &JsonNode<'_>) -> Result<Page<Song>> {
    let items = shelf.get("contents");
    Ok(Page::new(
        parse_songs(&items)?,
        continuation_token(shelf, &items).map(Some).or(None),
    ))
}

fn first_page(doc: &JsonDocument) -> Result<Page<Song>> {
    let sections = doc
        .root()
        .get("contents")
        .get("tabbedSearchResultsRenderer")
        .get("tabs")
        .at(0)
        .get("tabRenderer")
        .get("content")
        .get("sectionListRenderer")
        .get("contents")
        .as_array()
        .or_throw("search sections")?;
    // "No results" responses hold only a message section.
    match sections
        .iter()
        .map(|section| section.get("musicShelfRenderer"))
        .find(|shelf| !shelf.is_undefined())
    {
        Some(shelf) => shelf_page(&shelf),
        None => {
            debug!("search returned no result shelf");
            Ok(Page::default())
        }
    }
}

fn next_page(doc: &JsonDocument) -> Result<Page<Song>> {
    let shelf = doc
        .root()
        .get("continuationContents")
        .get("musicShelfContinuation");
    shelf.as_object().or_throw("search continuation")?;
    shelf_page(&shelf)
}

/// Pages of search results for one query and filter.
///
/// Obtained from [`YtMusicClient::search_songs`] or [`YtMusicClient::search`].
#[derive(Debug, Clone)]
pub struct SongSearch {
    client: YtMusicClient,
    query: String,
    filter: SearchFilter,
}

impl SongSearch {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> SearchFilter {
        self.filter
    }
}

#[async_trait]
impl PageFetcher for SongSearch {
    type Item = Song;
    type Error = Error;

    async fn fetch_page(
        &self,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<Song>> {
        let body = json!({ "query": self.query, "params": self.filter.params() });
        let doc = self.client.search_raw(body, token, cancel).await?;
        match token {
            None => first_page(&doc),
            Some(_) => next_page(&doc),
        }
    }
}

impl YtMusicClient {
    /// Search songs. Shorthand for `search(query, SearchFilter::Songs)`.
    pub fn search_songs(&self, query: &str) -> Paginator<SongSearch> {
        self.search(query, SearchFilter::Songs)
    }

    /// A paginator over search results of one category.
    ///
    /// Both songs and videos come back as [`Song`] rows.
    pub fn search(&self, query: &str, filter: SearchFilter) -> Paginator<SongSearch> {
        Paginator::new(SongSearch {
            client: self.clone(),
            query: query.to_owned(),
            filter,
        })
    }
}
