//! Data types mapped from InnerTube responses.
//!
//! These are built field by field from the raw JSON with the navigation
//! layer in `ytmusic-core`, not deserialized wholesale: a renamed optional
//! field degrades to its default instead of failing the whole item.

use serde::{Deserialize, Serialize};

/// One size of an artwork image.
///
/// API JSON: `{ "url": "https://lh3.googleusercontent.com/...", "width": 60, "height": 60 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u64,
    pub height: u64,
}

/// An artist or channel credited on a song.
///
/// `id` is the channel browse id (`UC...`), absent for uncredited text runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The album a song belongs to.
///
/// `id` is the album browse id (`MPREb_...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A song or music video row.
///
/// Mapped from a `musicResponsiveListItemRenderer`, the row type shared by
/// playlists, search results and library listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Watch id (`https://music.youtube.com/watch?v={video_id}`).
    pub video_id: String,
    pub title: String,
    pub artists: Vec<ArtistRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumRef>,
    /// Length in seconds, parsed from the `m:ss` display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    pub thumbnails: Vec<Thumbnail>,
    pub explicit: bool,
    /// Position id inside a playlist (needed to remove or move the entry).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_video_id: Option<String>,
}

impl Song {
    /// Join artist names with `", "`.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A playlist header plus its first page of tracks.
///
/// Returned by [`YtMusicClient::playlist`](crate::YtMusicClient::playlist).
/// Use [`YtMusicClient::playlist_tracks`](crate::YtMusicClient::playlist_tracks)
/// to page through the complete track list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist id without the `VL` browse prefix.
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<ArtistRef>,
    /// Track count as displayed in the header ("1,234 songs").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u64>,
    pub thumbnails: Vec<Thumbnail>,
    /// First page of tracks.
    pub tracks: Vec<Song>,
    /// Token for the second page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

/// The logged-in account.
///
/// Returned by [`YtMusicClient::account_info`](crate::YtMusicClient::account_info).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Display name.
    pub name: String,
    /// Channel handle (`@name`), if the account has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub photo: Vec<Thumbnail>,
}

/// Search result category, mapped to the `params` request field.
///
/// | Variant  | `params`                       |
/// |----------|--------------------------------|
/// | `Songs`  | `EgWKAQIIAWoMEA4QChADEAQQCRAF` |
/// | `Videos` | `EgWKAQIQAWoMEA4QChADEAQQCRAF` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Songs,
    Videos,
}

impl SearchFilter {
    /// Return the value sent as the search `params` field.
    pub fn params(self) -> &'static str {
        match self {
            Self::Songs => "EgWKAQIIAWoMEA4QChADEAQQCRAF",
            Self::Videos => "EgWKAQIQAWoMEA4QChADEAQQCRAF",
        }
    }
}
