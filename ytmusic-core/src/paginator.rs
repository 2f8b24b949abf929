//! Continuation-token pagination.
//!
//! The API exposes result sets only as an opaque forward cursor: no totals,
//! no page numbers, no way back. [`Paginator`] turns that into a cursor that
//! can move forward, step back by replaying the token that produced the
//! previous page, slice an item range, or stream every item lazily.
//!
//! A paginator is meant for one caller at a time (`&mut self` everywhere).
//! To paginate the same result set concurrently, give each task its own
//! paginator over a shared fetcher (`&F` and `Arc<F>` are fetchers too).

use crate::page::PageFetcher;
use async_stream::try_stream;
use futures::Stream;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Where a [`Paginator`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// No page fetched since construction or the last [`reset`](Paginator::reset).
    Fresh,
    /// The last page carried a continuation token.
    HasMore,
    /// The last page carried no continuation token.
    Exhausted,
}

/// A resumable cursor over a [`PageFetcher`].
pub struct Paginator<F: PageFetcher> {
    fetcher: F,
    /// Token for the next forward fetch; `None` before the first page.
    pending: Option<String>,
    /// Token used to fetch each page on the current route, oldest first.
    /// The first page was fetched with `None`.
    visited: Vec<Option<String>>,
    exhausted: bool,
}

impl<F: PageFetcher> Paginator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            pending: None,
            visited: Vec::new(),
            exhausted: false,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    pub fn state(&self) -> PaginatorState {
        if self.exhausted {
            PaginatorState::Exhausted
        } else if self.visited.is_empty() {
            PaginatorState::Fresh
        } else {
            PaginatorState::HasMore
        }
    }

    /// `false` once a fetched page reported no continuation.
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// `true` when at least one page precedes the current one.
    pub fn has_previous(&self) -> bool {
        self.visited.len() >= 2
    }

    /// Number of pages between the first page and the current one, inclusive.
    pub fn position(&self) -> usize {
        self.visited.len()
    }

    /// Forget all progress. The next fetch starts at the first page.
    pub fn reset(&mut self) {
        self.pending = None;
        self.visited.clear();
        self.exhausted = false;
    }

    fn settle(&mut self, continuation: Option<String>) {
        self.exhausted = continuation.is_none();
        self.pending = continuation;
    }

    /// Fetch the page after the current one.
    ///
    /// Returns an empty list without fetching once the sequence is
    /// exhausted. On error the cursor is left where it was, so the call can
    /// be retried.
    pub async fn fetch_next_page(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Vec<F::Item>, F::Error> {
        if self.exhausted {
            trace!("pagination exhausted, not fetching");
            return Ok(Vec::new());
        }
        let token = self.pending.clone();
        let page = self.fetcher.fetch_page(token.as_deref(), cancel).await?;
        self.visited.push(token);
        self.settle(page.continuation);
        debug!(
            page = self.visited.len(),
            items = page.items.len(),
            has_more = !self.exhausted,
            "fetched next page"
        );
        Ok(page.items)
    }

    /// Re-fetch the page before the current one and make it current.
    ///
    /// Returns an empty list without fetching when there is no previous
    /// page. A following [`fetch_next_page`](Self::fetch_next_page) returns
    /// the page that was current before this call.
    pub async fn fetch_previous_page(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Vec<F::Item>, F::Error> {
        let depth = self.visited.len();
        if depth < 2 {
            trace!("no previous page, not fetching");
            return Ok(Vec::new());
        }
        let token = self.visited[depth - 2].clone();
        let page = self.fetcher.fetch_page(token.as_deref(), cancel).await?;
        self.visited.truncate(depth - 1);
        self.settle(page.continuation);
        debug!(
            page = self.visited.len(),
            items = page.items.len(),
            "fetched previous page"
        );
        Ok(page.items)
    }

    /// Items `offset..offset + limit` of the whole sequence, or
    /// `offset..` when `limit` is `None`.
    ///
    /// Starts over from the first page and fetches whole pages until enough
    /// items are collected or the sequence ends. The server has no notion of
    /// an offset, so skipped items are still fetched.
    ///
    /// If `cancel` fires, no further pages are requested and the items
    /// collected so far are sliced and returned.
    pub async fn fetch_items(
        &mut self,
        offset: usize,
        limit: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<Vec<F::Item>, F::Error> {
        self.reset();
        let wanted = limit.map(|limit| offset.saturating_add(limit));
        let mut collected = Vec::new();
        while self.has_more() && wanted.is_none_or(|wanted| collected.len() < wanted) {
            if cancel.is_cancelled() {
                debug!(collected = collected.len(), "range fetch cancelled");
                break;
            }
            let page = self.fetch_next_page(cancel).await;
            if page.is_err() && cancel.is_cancelled() {
                debug!(collected = collected.len(), "range fetch cancelled mid-request");
                break;
            }
            collected.extend(page?);
        }
        Ok(collected
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// Every item of the sequence, fetched one page at a time as the stream
    /// is polled.
    ///
    /// The cursor is reset first, so each call starts from the first page.
    /// The stream ends when the sequence is exhausted or once `cancel` has
    /// fired; cancellation is not an error.
    pub fn items<'s>(
        &'s mut self,
        cancel: &'s CancellationToken,
    ) -> impl Stream<Item = Result<F::Item, F::Error>> + 's {
        self.reset();
        let this = self;
        try_stream! {
            while this.has_more() && !cancel.is_cancelled() {
                let page = this.fetch_next_page(cancel).await;
                if page.is_err() && cancel.is_cancelled() {
                    break;
                }
                for item in page? {
                    yield item;
                }
            }
        }
    }
}

impl<F: PageFetcher> fmt::Debug for Paginator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("state", &self.state())
            .field("position", &self.position())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Page, page_fn};
    use async_trait::async_trait;
    use futures::{StreamExt, TryStreamExt};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, PartialEq, Eq)]
    enum FetchError {
        Network,
        Cancelled,
    }

    /// Serves fixed pages keyed by token and records every request.
    #[derive(Default)]
    struct Script {
        pages: HashMap<Option<String>, Page<&'static str>>,
        calls: Mutex<Vec<Option<String>>>,
        fail_on: Mutex<Option<Option<String>>>,
        /// Fire this token while serving the given request.
        cancel_on: Option<(Option<String>, CancellationToken)>,
    }

    impl Script {
        /// Pages `[A,B]`, `[C,D]`, `[]` chained by `t1`, `t2`.
        fn abcd() -> Self {
            let mut pages = HashMap::new();
            pages.insert(None, Page::new(vec!["A", "B"], Some("t1".to_owned())));
            pages.insert(Some("t1".to_owned()), Page::new(vec!["C", "D"], Some("t2".to_owned())));
            pages.insert(Some("t2".to_owned()), Page::last(vec![]));
            Self {
                pages,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Option<String>> {
            self.calls.lock().unwrap().clone()
        }

        fn fail_next(&self, token: Option<&str>) {
            *self.fail_on.lock().unwrap() = Some(token.map(str::to_owned));
        }
    }

    #[async_trait]
    impl PageFetcher for Script {
        type Item = &'static str;
        type Error = FetchError;

        async fn fetch_page(
            &self,
            token: Option<&str>,
            _cancel: &CancellationToken,
        ) -> Result<Page<&'static str>, FetchError> {
            let token = token.map(str::to_owned);
            self.calls.lock().unwrap().push(token.clone());
            if let Some((at, cancel)) = &self.cancel_on {
                if *at == token {
                    cancel.cancel();
                    return Err(FetchError::Cancelled);
                }
            }
            let mut fail_on = self.fail_on.lock().unwrap();
            if fail_on.as_ref() == Some(&token) {
                *fail_on = None;
                return Err(FetchError::Network);
            }
            Ok(self.pages.get(&token).cloned().unwrap_or_default())
        }
    }

    fn t(s: &str) -> Option<String> {
        Some(s.to_owned())
    }

    #[tokio::test]
    async fn next_walks_pages_until_exhausted() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        assert_eq!(pages.state(), PaginatorState::Fresh);
        assert!(pages.has_more());

        assert_eq!(pages.fetch_next_page(&cancel).await.unwrap(), ["A", "B"]);
        assert_eq!(pages.state(), PaginatorState::HasMore);
        assert_eq!(pages.fetch_next_page(&cancel).await.unwrap(), ["C", "D"]);
        assert!(pages.has_more());
        assert!(pages.fetch_next_page(&cancel).await.unwrap().is_empty());
        assert!(!pages.has_more());
        assert_eq!(pages.state(), PaginatorState::Exhausted);

        assert_eq!(pages.fetcher().calls(), [None, t("t1"), t("t2")]);
    }

    #[tokio::test]
    async fn next_after_exhaustion_does_not_fetch() {
        let cancel = CancellationToken::new();
        let fetcher = Script {
            pages: HashMap::from([(None, Page::last(vec!["only"]))]),
            ..Script::default()
        };
        let mut pages = Paginator::new(fetcher);
        assert_eq!(pages.fetch_next_page(&cancel).await.unwrap(), ["only"]);
        assert!(pages.fetch_next_page(&cancel).await.unwrap().is_empty());
        assert!(pages.fetch_next_page(&cancel).await.unwrap().is_empty());
        assert_eq!(pages.fetcher().calls().len(), 1);
    }

    #[tokio::test]
    async fn previous_on_first_page_does_not_fetch() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        assert!(pages.fetch_previous_page(&cancel).await.unwrap().is_empty());
        pages.fetch_next_page(&cancel).await.unwrap();
        assert!(!pages.has_previous());
        assert!(pages.fetch_previous_page(&cancel).await.unwrap().is_empty());
        assert_eq!(pages.fetcher().calls(), [None]);
    }

    #[tokio::test]
    async fn previous_replays_earlier_page_and_restores_forward_state() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        pages.fetch_next_page(&cancel).await.unwrap();
        pages.fetch_next_page(&cancel).await.unwrap();
        assert!(pages.has_previous());

        assert_eq!(pages.fetch_previous_page(&cancel).await.unwrap(), ["A", "B"]);
        assert!(!pages.has_previous());
        assert_eq!(pages.position(), 1);
        assert_eq!(pages.fetch_next_page(&cancel).await.unwrap(), ["C", "D"]);
        assert_eq!(pages.fetcher().calls(), [None, t("t1"), None, t("t1")]);
    }

    #[tokio::test]
    async fn previous_from_exhausted_reopens_sequence() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        for _ in 0..3 {
            pages.fetch_next_page(&cancel).await.unwrap();
        }
        assert!(!pages.has_more());
        assert_eq!(pages.fetch_previous_page(&cancel).await.unwrap(), ["C", "D"]);
        assert!(pages.has_more());
        assert_eq!(pages.fetch_previous_page(&cancel).await.unwrap(), ["A", "B"]);
        assert!(pages.fetch_previous_page(&cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_items_slices_across_pages() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        assert_eq!(pages.fetch_items(1, Some(2), &cancel).await.unwrap(), ["B", "C"]);
        // stopped once three items were in hand
        assert_eq!(pages.fetcher().calls(), [None, t("t1")]);
        assert!(pages.has_more());
    }

    #[tokio::test]
    async fn fetch_items_without_limit_reads_to_the_end() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        assert_eq!(pages.fetch_items(1, None, &cancel).await.unwrap(), ["B", "C", "D"]);
        assert_eq!(pages.fetch_items(10, None, &cancel).await.unwrap(), Vec::<&str>::new());
        assert_eq!(pages.fetch_items(3, Some(5), &cancel).await.unwrap(), ["D"]);
        assert!(!pages.has_more());
    }

    #[tokio::test]
    async fn fetch_items_restarts_from_the_first_page() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        pages.fetch_next_page(&cancel).await.unwrap();
        pages.fetch_next_page(&cancel).await.unwrap();
        assert_eq!(pages.fetch_items(0, Some(1), &cancel).await.unwrap(), ["A"]);
        assert_eq!(pages.fetcher().calls(), [None, t("t1"), None]);
    }

    #[tokio::test]
    async fn cancelled_range_returns_partial_items() {
        let cancel = CancellationToken::new();
        let fetcher = Script {
            cancel_on: Some((t("t1"), cancel.clone())),
            ..Script::abcd()
        };
        let mut pages = Paginator::new(fetcher);
        let items = pages.fetch_items(0, None, &cancel).await.unwrap();
        assert_eq!(items, ["A", "B"]);
    }

    #[tokio::test]
    async fn range_with_cancelled_token_fetches_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut pages = Paginator::new(Script::abcd());
        assert!(pages.fetch_items(0, Some(3), &cancel).await.unwrap().is_empty());
        assert!(pages.fetcher().calls().is_empty());
    }

    #[tokio::test]
    async fn single_page_fetch_propagates_cancellation_error() {
        let cancel = CancellationToken::new();
        let fetcher = Script {
            cancel_on: Some((None, cancel.clone())),
            ..Script::abcd()
        };
        let mut pages = Paginator::new(fetcher);
        assert_eq!(pages.fetch_next_page(&cancel).await, Err(FetchError::Cancelled));
        assert_eq!(pages.state(), PaginatorState::Fresh);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_cursor_intact() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        pages.fetch_next_page(&cancel).await.unwrap();
        pages.fetcher().fail_next(Some("t1"));
        assert_eq!(pages.fetch_next_page(&cancel).await, Err(FetchError::Network));
        assert_eq!(pages.position(), 1);
        // retry succeeds with the same token
        assert_eq!(pages.fetch_next_page(&cancel).await.unwrap(), ["C", "D"]);

        pages.fetcher().fail_next(None);
        assert_eq!(pages.fetch_previous_page(&cancel).await, Err(FetchError::Network));
        assert!(pages.has_previous());
        assert_eq!(pages.fetch_previous_page(&cancel).await.unwrap(), ["A", "B"]);
    }

    #[tokio::test]
    async fn range_propagates_fetch_failure() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        pages.fetcher().fail_next(Some("t1"));
        assert_eq!(pages.fetch_items(0, None, &cancel).await, Err(FetchError::Network));
    }

    #[tokio::test]
    async fn reset_behaves_like_a_fresh_paginator() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        pages.fetch_next_page(&cancel).await.unwrap();
        pages.fetch_next_page(&cancel).await.unwrap();
        pages.reset();
        pages.reset();
        assert_eq!(pages.state(), PaginatorState::Fresh);
        assert!(pages.has_more());
        assert!(!pages.has_previous());
        assert_eq!(pages.fetch_next_page(&cancel).await.unwrap(), ["A", "B"]);
    }

    #[tokio::test]
    async fn items_streams_every_item_in_order() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        let all: Vec<_> = pages.items(&cancel).try_collect().await.unwrap();
        assert_eq!(all, ["A", "B", "C", "D"]);
        assert!(!pages.has_more());

        // restartable
        let again: Vec<_> = pages.items(&cancel).try_collect().await.unwrap();
        assert_eq!(again, ["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn items_fetch_lazily() {
        let cancel = CancellationToken::new();
        let fetcher = Arc::new(Script::abcd());
        let mut pages = Paginator::new(Arc::clone(&fetcher));
        let first: Vec<_> = pages.items(&cancel).take(2).try_collect().await.unwrap();
        assert_eq!(first, ["A", "B"]);
        assert_eq!(fetcher.calls(), [None]);
    }

    #[tokio::test]
    async fn items_stop_when_cancelled_between_pages() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        let mut seen = Vec::new();
        {
            let mut stream = std::pin::pin!(pages.items(&cancel));
            while let Some(item) = stream.next().await {
                seen.push(item.unwrap());
                cancel.cancel();
            }
        }
        assert_eq!(seen, ["A", "B"]);
        assert_eq!(pages.fetcher().calls(), [None]);
    }

    #[tokio::test]
    async fn items_surface_fetch_errors() {
        let cancel = CancellationToken::new();
        let mut pages = Paginator::new(Script::abcd());
        pages.fetcher().fail_next(Some("t1"));
        let got: Vec<_> = pages.items(&cancel).collect().await;
        assert_eq!(got, [Ok("A"), Ok("B"), Err(FetchError::Network)]);
    }

    #[tokio::test]
    async fn separate_paginators_share_one_fetcher() {
        let cancel = CancellationToken::new();
        let fetcher = Script::abcd();
        let mut a = Paginator::new(&fetcher);
        let mut b = Paginator::new(&fetcher);
        a.fetch_next_page(&cancel).await.unwrap();
        a.fetch_next_page(&cancel).await.unwrap();
        assert_eq!(b.fetch_next_page(&cancel).await.unwrap(), ["A", "B"]);
        assert!(a.has_previous());
        assert!(!b.has_previous());
    }

    #[tokio::test]
    async fn closure_fetcher() {
        let cancel = CancellationToken::new();
        let fetcher = page_fn(|token: Option<String>, _cancel| async move {
            let n: u32 = token.as_deref().map_or(0, |t| t.parse().unwrap());
            let next = (n < 4).then(|| (n + 2).to_string());
            Ok::<_, FetchError>(Page::new(vec![n, n + 1], next))
        });
        let mut pages = Paginator::new(fetcher);
        assert_eq!(pages.fetch_items(3, Some(2), &cancel).await.unwrap(), [3, 4]);
        assert_eq!(pages.fetch_items(0, None, &cancel).await.unwrap(), [0, 1, 2, 3, 4, 5]);
    }
}
