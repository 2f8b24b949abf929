//! Core building blocks for the YouTube Music InnerTube client.
//!
//! Two pieces, both independent of HTTP:
//!
//! - **JSON navigation** ([`JsonDocument`], [`JsonNode`], [`Nav`]): walk
//!   loosely-typed, drifting API responses without crashing on absent or
//!   retyped fields. Each field read ends in [`Nav::or`] (optional) or
//!   [`Nav::or_throw`] (required, fails with a [`JsonParseError`] carrying
//!   the path).
//! - **Pagination** ([`Page`], [`PageFetcher`], [`Paginator`]): turn an opaque
//!   continuation token into a forward/backward cursor with range slicing
//!   and lazy streaming.
//!
//! | Type            | Role                                              |
//! |-----------------|---------------------------------------------------|
//! | [`JsonDocument`]| Owns one parsed response body                     |
//! | [`JsonNode`]    | A (possibly undefined) position in a document     |
//! | [`Nav`]         | Result of a type projection, resolved by `or`/`or_throw` |
//! | [`Page`]        | Items plus the continuation token                 |
//! | [`PageFetcher`] | Fetches one page for a token                      |
//! | [`Paginator`]   | Stateful cursor over a fetcher                    |

pub mod error;
pub mod json;
pub mod nav;
pub mod page;
pub mod paginator;

pub use error::{JsonParseError, ParseErrorKind, Result};
pub use json::{JsonDocument, JsonKind, JsonNode, JsonObject, JsonPath};
pub use nav::Nav;
pub use page::{Page, PageFetcher, PageFn, page_fn};
pub use paginator::{Paginator, PaginatorState};
pub use tokio_util::sync::CancellationToken;
