//! Pages and the page-fetch contract.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One fetch's worth of items and the token for the next fetch.
///
/// `continuation` is an opaque server cursor. It is stored and handed back
/// to the fetcher verbatim, never inspected. `None` means this is the last
/// page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub continuation: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, continuation: Option<String>) -> Self {
        Self {
            items,
            continuation,
        }
    }

    /// A final page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    pub fn is_last(&self) -> bool {
        self.continuation.is_none()
    }

    /// Convert the items, keeping the continuation.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            continuation: self.continuation,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::last(Vec::new())
    }
}

/// Fetches one page of a result set.
///
/// `token` is `None` for the first page and otherwise a continuation
/// returned by an earlier page. Implementations should be stateless with
/// respect to pagination: several [`Paginator`](crate::Paginator)s may drive
/// the same fetcher concurrently.
///
/// Cancellation of an in-flight request is up to the implementation; the
/// paginator only checks `cancel` between pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send;
    type Error: Send;

    async fn fetch_page(
        &self,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<Self::Item>, Self::Error>;
}

#[async_trait]
impl<P: PageFetcher + ?Sized> PageFetcher for &P {
    type Item = P::Item;
    type Error = P::Error;

    async fn fetch_page(
        &self,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<Self::Item>, Self::Error> {
        (**self).fetch_page(token, cancel).await
    }
}

#[async_trait]
impl<P: PageFetcher + ?Sized> PageFetcher for Arc<P> {
    type Item = P::Item;
    type Error = P::Error;

    async fn fetch_page(
        &self,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<Self::Item>, Self::Error> {
        (**self).fetch_page(token, cancel).await
    }
}

/// A [`PageFetcher`] backed by an async closure. See [`page_fn`].
#[derive(Debug, Clone)]
pub struct PageFn<F> {
    f: F,
}

/// Build a [`PageFetcher`] from a closure taking the continuation token
/// and a clone of the cancellation token.
///
/// ```
/// use ytmusic_core::{page_fn, Page, Paginator};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fetcher = page_fn(|token: Option<String>, _cancel| async move {
///     Ok::<_, std::convert::Infallible>(match token.as_deref() {
///         None => Page::new(vec![1, 2], Some("p2".to_owned())),
///         _ => Page::last(vec![3]),
///     })
/// });
/// let mut pages = Paginator::new(fetcher);
/// let all = pages.fetch_items(0, None, &CancellationToken::new()).await.unwrap();
/// assert_eq!(all, [1, 2, 3]);
/// # }
/// ```
pub fn page_fn<F, Fut>(f: F) -> PageFn<F>
where
    F: Fn(Option<String>, CancellationToken) -> Fut,
{
    PageFn { f }
}

#[async_trait]
impl<F, Fut, T, E> PageFetcher for PageFn<F>
where
    F: Fn(Option<String>, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>, E>> + Send,
    T: Send,
    E: Send,
{
    type Item = T;
    type Error = E;

    async fn fetch_page(
        &self,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<T>, E> {
        (self.f)(token.map(str::to_owned), cancel.clone()).await
    }
}
