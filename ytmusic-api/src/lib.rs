//! YouTube Music InnerTube API client library.
//!
//! Async access to the private JSON API behind `music.youtube.com`:
//! playlists, song search and the logged-in account. Responses are read
//! with the drift-tolerant navigation layer of [`ytmusic_core`], and every
//! multi-page listing is exposed as a [`Paginator`].
//!
//! # Authentication
//!
//! Public playlists and search work anonymously. Account endpoints need the
//! `Cookie` header of a logged-in browser tab, persisted to
//! `<config dir>/ytmusic-api/session.json`.
//!
//! ```no_run
//! use ytmusic_api::auth::Session;
//! use ytmusic_api::YtMusicClient;
//!
//! # async fn run() -> ytmusic_api::Result<()> {
//! Session::from_cookie("SAPISID=...; __Secure-3PAPISID=...").save()?;
//!
//! // Loads the session from disk.
//! let client = YtMusicClient::new()?;
//! let cancel = ytmusic_api::CancellationToken::new();
//! let me = client.account_info(&cancel).await?;
//! println!("logged in as {}", me.name);
//! # Ok(())
//! # }
//! ```
//!
//! # Paging
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use ytmusic_api::{CancellationToken, YtMusicClient};
//!
//! # async fn run(client: YtMusicClient) -> ytmusic_api::Result<()> {
//! let cancel = CancellationToken::new();
//! let mut search = client.search_songs("daft punk");
//! let first_ten = search.fetch_items(0, Some(10), &cancel).await?;
//!
//! let mut tracks = client.playlist_tracks("PL4fGSI1pDJn6puJdseH2Rt9sMvt9E2M4i");
//! let all: Vec<_> = tracks.items(&cancel).try_collect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                               | InnerTube endpoint      | Description              |
//! |--------------------------------------|-------------------------|--------------------------|
//! | [`YtMusicClient::playlist`]          | `browse`                | Header and first tracks  |
//! | [`YtMusicClient::playlist_tracks`]   | `browse` + continuation | All tracks, paged        |
//! | [`YtMusicClient::search_songs`]      | `search`                | Song results, paged      |
//! | [`YtMusicClient::search`]            | `search`                | Filtered results, paged  |
//! | [`YtMusicClient::account_info`]      | `account/account_menu`  | Current account          |
//! | [`YtMusicClient::request`]           | any                     | Raw request              |

pub mod auth;
pub mod client;
pub mod error;
mod parse;
mod playlist;
mod search;
mod track;
pub mod types;
mod user;

pub use client::{ClientBuilder, ClientProfile, YtMusicClient};
pub use error::{Error, Result};
pub use playlist::PlaylistTracks;
pub use search::SongSearch;
pub use ytmusic_core::{
    CancellationToken, JsonDocument, JsonNode, JsonParseError, Nav, Page, PageFetcher, Paginator,
    PaginatorState,
};
