//! Playlist API.
//!
//! Endpoint: `POST /youtubei/v1/browse`
//!
//! Request: `{ "browseId": "VL<playlist id>" }`
//!
//! Response (first page, abridged):
//! ```json
//! {
//!   "contents": { "twoColumnBrowseResultsRenderer": {
//!     "tabs": [{ "tabRenderer": { "content": { "sectionListRenderer": { "contents": [
//!       { "musicResponsiveHeaderRenderer": {
//!           "title": { "runs": [{ "text": "Playlist name" }] },
//!           "straplineTextOne": { "runs": [{ "text": "Author", "navigationEndpoint": {...} }] },
//!           "description": { "musicDescriptionShelfRenderer": { "description": { "runs": [...] } } },
//!           "secondSubtitle": { "runs": [{ "text": "1,234 songs" }, ...] },
//!           "thumbnail": { "musicThumbnailRenderer": {...} } } }
//!     ] } } } }],
//!     "secondaryContents": { "sectionListRenderer": { "contents": [
//!       { "musicPlaylistShelfRenderer": { "contents": [ <song rows>, <continuationItemRenderer> ] } }
//!     ] } }
//!   } }
//! }
//! ```
//!
//! Older rollouts put the header under `header.musicDetailHeaderRenderer`
//! and the shelf under `singleColumnBrowseResultsRenderer`; both are read.
//!
//! Continuation responses carry either
//! `continuationContents.musicPlaylistShelfContinuation` or
//! `onResponseReceivedActions[0].appendContinuationItemsAction.continuationItems`.

use crate::client::YtMusicClient;
use crate::error::{Error, Result};
use crate::parse::{continuation_token, parse_count, run_text, runs_text, thumbnails};
use crate::track::parse_songs;
use crate::types::{ArtistRef, Playlist, Song};
use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use ytmusic_core::{JsonDocument, JsonNode, Page, PageFetcher, Paginator};

fn browse_id(playlist_id: &str) -> String {
    if playlist_id.starts_with("VL") {
        playlist_id.to_owned()
    } else {
        format!("VL{playlist_id}")
    }
}

fn section_contents<'a>(root: &JsonNode<'a>) -> JsonNode<'a> {
    let two_column = root.get("contents").get("twoColumnBrowseResultsRenderer");
    let single_column = root
        .get("contents")
        .get("singleColumnBrowseResultsRenderer")
        .get("tabs")
        .at(0)
        .get("tabRenderer")
        .get("content")
        .get("sectionListRenderer")
        .get("contents");
    two_column
        .get("secondaryContents")
        .get("sectionListRenderer")
        .get("contents")
        .fallback(single_column)
}

fn shelf_page(shelf: &JsonNode<'_>, items: &JsonNode<'_>) -> Result<Page<Song>> {
    Ok(Page::new(
        parse_songs(items)?,
        continuation_token(shelf, items).map(Some).or(None),
    ))
}

/// Song page of a first `browse` response.
fn first_page(doc: &JsonDocument) -> Result<Page<Song>> {
    let shelf = section_contents(&doc.root())
        .at(0)
        .get("musicPlaylistShelfRenderer");
    shelf.as_object().or_throw("playlist shelf")?;
    shelf_page(&shelf, &shelf.get("contents"))
}

/// Song page of a continuation response.
fn next_page(doc: &JsonDocument) -> Result<Page<Song>> {
    let root = doc.root();
    let shelf = root
        .get("continuationContents")
        .get("musicPlaylistShelfContinuation");
    if !shelf.is_undefined() {
        return shelf_page(&shelf, &shelf.get("contents"));
    }
    let items = root
        .get("onResponseReceivedActions")
        .at(0)
        .get("appendContinuationItemsAction")
        .get("continuationItems");
    items.as_array().or_throw("continuation items")?;
    shelf_page(&JsonNode::undefined(), &items)
}

fn parse_header(doc: &JsonDocument, id: &str) -> Result<Playlist> {
    let root = doc.root();
    let responsive = doc
        .root()
        .get("contents")
        .get("twoColumnBrowseResultsRenderer")
        .get("tabs")
        .at(0)
        .get("tabRenderer")
        .get("content")
        .get("sectionListRenderer")
        .get("contents")
        .at(0)
        .get("musicResponsiveHeaderRenderer");
    let legacy = root
        .get("header")
        .get("musicDetailHeaderRenderer")
        .fallback(
            root.get("header")
                .get("musicEditablePlaylistDetailHeaderRenderer")
                .get("header")
                .get("musicDetailHeaderRenderer"),
        );
    let header = responsive.clone().fallback(legacy.clone());

    let title = runs_text(&header.get("title")).or_throw("playlist title")?;
    let description = runs_text(
        &header
            .get("description")
            .get("musicDescriptionShelfRenderer")
            .get("description"),
    )
    .or_nav(runs_text(&header.get("description")))
    .map(Some)
    .or(None);

    let author_run = if responsive.is_undefined() {
        legacy.get("subtitle").get("runs").at(2)
    } else {
        responsive.get("straplineTextOne").get("runs").at(0)
    };
    let author = author_run.get("text").as_string().map(|name| ArtistRef {
        name,
        id: author_run
            .get("navigationEndpoint")
            .get("browseEndpoint")
            .get("browseId")
            .as_string()
            .map(Some)
            .or(None),
    });

    let track_count = run_text(&header.get("secondSubtitle"), 0)
        .and_then("track count", parse_count)
        .map(Some)
        .or(None);

    let first = first_page(doc)?;
    Ok(Playlist {
        id: id.trim_start_matches("VL").to_owned(),
        title,
        description,
        author: author.map(Some).or(None),
        track_count,
        thumbnails: thumbnails(&header.get("thumbnail")),
        tracks: first.items,
        continuation: first.continuation,
    })
}

/// Pages of a playlist's tracks.
///
/// Obtained from [`YtMusicClient::playlist_tracks`]. Stateless, so one
/// instance can back several [`Paginator`]s.
#[derive(Debug, Clone)]
pub struct PlaylistTracks {
    client: YtMusicClient,
    browse_id: String,
}

#[async_trait]
impl PageFetcher for PlaylistTracks {
    type Item = Song;
    type Error = Error;

    async fn fetch_page(
        &self,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Page<Song>> {
        let body = json!({ "browseId": self.browse_id });
        let doc = self.client.browse(body, token, cancel).await?;
        match token {
            None => first_page(&doc),
            Some(_) => next_page(&doc),
        }
    }
}

impl YtMusicClient {
    /// Get a playlist's header and its first page of tracks.
    ///
    /// `id` may be given with or without the `VL` browse prefix.
    /// Does not require login for public playlists.
    pub async fn playlist(&self, id: &str, cancel: &CancellationToken) -> Result<Playlist> {
        let body = json!({ "browseId": browse_id(id) });
        let doc = self.browse(body, None, cancel).await?;
        parse_header(&doc, id)
    }

    /// A paginator over every track of a playlist.
    ///
    /// Nothing is fetched until the paginator is driven.
    pub fn playlist_tracks(&self, id: &str) -> Paginator<PlaylistTracks> {
        Paginator::new(PlaylistTracks {
            client: self.clone(),
            browse_id: browse_id(id),
        })
    }
}
