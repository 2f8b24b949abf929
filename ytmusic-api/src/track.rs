//! Song row mapping.
//!
//! Playlists, search results and library pages all list songs as
//! `musicResponsiveListItemRenderer` rows:
//!
//! ```json
//! {
//!   "playlistItemData": { "videoId": "dQw4w9WgXcQ", "playlistSetVideoId": "56B44F6D10557CC6" },
//!   "thumbnail": { "musicThumbnailRenderer": { "thumbnail": { "thumbnails": [...] } } },
//!   "flexColumns": [
//!     { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [{ "text": "Title" }] } } },
//!     { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [
//!         { "text": "Artist", "navigationEndpoint": { "browseEndpoint": { "browseId": "UC...",
//!           "browseEndpointContextSupportedConfigs": { "browseEndpointContextMusicConfig":
//!             { "pageType": "MUSIC_PAGE_TYPE_ARTIST" } } } } }
//!     ] } } },
//!     { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [{ "text": "Album", ... }] } } }
//!   ],
//!   "fixedColumns": [
//!     { "musicResponsiveListItemFixedColumnRenderer": { "text": { "runs": [{ "text": "3:33" }] } } }
//!   ],
//!   "badges": [{ "musicInlineBadgeRenderer": { "icon": { "iconType": "MUSIC_EXPLICIT_BADGE" } } }]
//! }
//! ```
//!
//! Search rows pack artist, album and duration into the second column,
//! separated by `" • "` runs; playlist rows spread them over columns two
//! and three plus a fixed column. Runs are classified by the page type of
//! their browse endpoint, so both layouts map the same way.

use crate::error::Result;
use crate::parse::{parse_duration, run_text, runs_text, thumbnails};
use crate::types::{AlbumRef, ArtistRef, Song};
use ytmusic_core::JsonNode;

const SEPARATORS: [&str; 3] = [" & ", ", ", " and "];

fn flex_column<'a>(item: &JsonNode<'a>, n: usize) -> JsonNode<'a> {
    item.get("flexColumns")
        .at(n)
        .get("musicResponsiveListItemFlexColumnRenderer")
        .get("text")
}

/// Map every song row in `items`, skipping entries of other renderer types
/// (continuation markers, section headers).
pub fn parse_songs(items: &JsonNode<'_>) -> Result<Vec<Song>> {
    items
        .as_array()
        .or_default()
        .iter()
        .map(|item| item.get("musicResponsiveListItemRenderer"))
        .filter(|renderer| !renderer.is_undefined())
        .map(|renderer| parse_song(&renderer))
        .collect()
}

/// Map one `musicResponsiveListItemRenderer`.
///
/// The video id and title are required; all other fields fall back to
/// empty values when missing.
pub fn parse_song(item: &JsonNode<'_>) -> Result<Song> {
    let video_id = item
        .get("playlistItemData")
        .get("videoId")
        .as_string()
        .or_nav(
            item.get("overlay")
                .get("musicItemThumbnailOverlayRenderer")
                .get("content")
                .get("musicPlayButtonRenderer")
                .get("playNavigationEndpoint")
                .get("watchEndpoint")
                .get("videoId")
                .as_string(),
        )
        .or_throw("song video id")?;
    let title = run_text(&flex_column(item, 0), 0)
        .or_throw("song title")?
        .to_owned();

    let mut artists = Vec::new();
    let mut album = None;
    let mut inline_duration = None;
    for column in 1..=2 {
        let runs = flex_column(item, column).get("runs").as_array().or_default();
        let mut past_first_separator = false;
        for run in &runs {
            let text = run.get("text").as_str().or("");
            let browse = run.get("navigationEndpoint").get("browseEndpoint");
            let page_type = browse
                .get("browseEndpointContextSupportedConfigs")
                .get("browseEndpointContextMusicConfig")
                .get("pageType")
                .as_str()
                .or("");
            let id = browse.get("browseId").as_string().map(Some).or(None);
            match page_type {
                "MUSIC_PAGE_TYPE_ARTIST" | "MUSIC_PAGE_TYPE_USER_CHANNEL" => artists.push(ArtistRef {
                    name: text.to_owned(),
                    id,
                }),
                "MUSIC_PAGE_TYPE_ALBUM" => {
                    album = Some(AlbumRef {
                        name: text.to_owned(),
                        id,
                    });
                }
                _ if text == " • " => past_first_separator = true,
                _ if SEPARATORS.contains(&text) || text.trim().is_empty() => {}
                _ => {
                    if let Some(secs) = parse_duration(text) {
                        inline_duration = Some(secs);
                    } else if column == 1 && !past_first_separator {
                        artists.push(ArtistRef {
                            name: text.to_owned(),
                            id: None,
                        });
                    }
                }
            }
        }
    }

    let duration_secs = runs_text(
        &item
            .get("fixedColumns")
            .at(0)
            .get("musicResponsiveListItemFixedColumnRenderer")
            .get("text"),
    )
    .and_then("duration", |text| parse_duration(&text))
    .map(Some)
    .or(inline_duration);

    let explicit = item
        .get("badges")
        .as_array()
        .or_default()
        .iter()
        .any(|badge| {
            badge
                .get("musicInlineBadgeRenderer")
                .get("icon")
                .get("iconType")
                .as_str()
                .or("")
                == "MUSIC_EXPLICIT_BADGE"
        });

    Ok(Song {
        video_id,
        title,
        artists,
        album,
        duration_secs,
        thumbnails: thumbnails(&item.get("thumbnail")),
        explicit,
        set_video_id: item
            .get("playlistItemData")
            .get("playlistSetVideoId")
            .as_string()
            .map(Some)
            .or(None),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Error;
    use serde_json::{Value, json};
    use ytmusic_core::JsonDocument;

    fn run(text: &str) -> Value {
        json!({ "text": text })
    }

    fn link(text: &str, id: &str, page_type: &str) -> Value {
        json!({
            "text": text,
            "navigationEndpoint": { "browseEndpoint": {
                "browseId": id,
                "browseEndpointContextSupportedConfigs": {
                    "browseEndpointContextMusicConfig": { "pageType": page_type }
                }
            } }
        })
    }

    fn column(runs: Vec<Value>) -> Value {
        json!({ "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": runs } } })
    }

    /// A playlist row as served by `browse`.
    pub(crate) fn playlist_row(video_id: &str, title: &str) -> Value {
        json!({ "musicResponsiveListItemRenderer": {
            "playlistItemData": { "videoId": video_id, "playlistSetVideoId": format!("set-{video_id}") },
            "thumbnail": { "musicThumbnailRenderer": { "thumbnail": { "thumbnails": [
                { "url": format!("https://i/{video_id}"), "width": 60, "height": 60 }
            ] } } },
            "flexColumns": [
                column(vec![run(title)]),
                column(vec![
                    link("Daft Punk", "UC_daft", "MUSIC_PAGE_TYPE_ARTIST"),
                    run(" & "),
                    link("Pharrell Williams", "UC_pharrell", "MUSIC_PAGE_TYPE_ARTIST"),
                ]),
                column(vec![link("Random Access Memories", "MPREb_ram", "MUSIC_PAGE_TYPE_ALBUM")]),
            ],
            "fixedColumns": [
                { "musicResponsiveListItemFixedColumnRenderer": { "text": { "runs": [run("6:09")] } } }
            ],
            "badges": [{ "musicInlineBadgeRenderer": { "icon": { "iconType": "MUSIC_EXPLICIT_BADGE" } } }]
        } })
    }

    /// A song row as served by `search`.
    pub(crate) fn search_row(video_id: &str, title: &str) -> Value {
        json!({ "musicResponsiveListItemRenderer": {
            "overlay": { "musicItemThumbnailOverlayRenderer": { "content": { "musicPlayButtonRenderer": {
                "playNavigationEndpoint": { "watchEndpoint": { "videoId": video_id } }
            } } } },
            "flexColumns": [
                column(vec![run(title)]),
                column(vec![
                    run("Some Uploader"),
                    run(" • "),
                    link("Discovery", "MPREb_disc", "MUSIC_PAGE_TYPE_ALBUM"),
                    run(" • "),
                    run("5:20"),
                ]),
            ]
        } })
    }

    fn parse(value: Value) -> Result<Song> {
        let doc = JsonDocument::from_value(value);
        parse_song(&doc.root().get("musicResponsiveListItemRenderer"))
    }

    #[test]
    fn playlist_row_maps_all_columns() {
        let song = parse(playlist_row("abc", "Get Lucky")).unwrap();
        assert_eq!(song.video_id, "abc");
        assert_eq!(song.title, "Get Lucky");
        assert_eq!(song.artist_names(), "Daft Punk, Pharrell Williams");
        assert_eq!(song.artists[1].id.as_deref(), Some("UC_pharrell"));
        assert_eq!(song.album.unwrap().id.as_deref(), Some("MPREb_ram"));
        assert_eq!(song.duration_secs, Some(369));
        assert!(song.explicit);
        assert_eq!(song.set_video_id.as_deref(), Some("set-abc"));
        assert_eq!(song.thumbnails[0].url, "https://i/abc");
    }

    #[test]
    fn search_row_reads_inline_metadata() {
        let song = parse(search_row("xyz", "One More Time")).unwrap();
        assert_eq!(song.video_id, "xyz");
        assert_eq!(song.artists, [ArtistRef { name: "Some Uploader".into(), id: None }]);
        assert_eq!(song.album.unwrap().name, "Discovery");
        assert_eq!(song.duration_secs, Some(320));
        assert!(!song.explicit);
        assert!(song.thumbnails.is_empty());
        assert_eq!(song.set_video_id, None);
    }

    #[test]
    fn missing_title_is_a_parse_error_with_path() {
        let mut row = playlist_row("abc", "x");
        row["musicResponsiveListItemRenderer"]["flexColumns"][0] = json!({});
        let err = parse(row).unwrap_err();
        let Error::Parse(err) = err else {
            panic!("expected parse error, got {err:?}");
        };
        assert!(err.is_missing());
        assert_eq!(
            err.path,
            "$.musicResponsiveListItemRenderer.flexColumns[0]\
             .musicResponsiveListItemFlexColumnRenderer.text.runs[0].text"
        );
    }

    #[test]
    fn optional_drift_does_not_fail_the_row() {
        let mut row = playlist_row("abc", "Get Lucky");
        let r = &mut row["musicResponsiveListItemRenderer"];
        r["fixedColumns"] = json!("changed to a string");
        r["badges"] = json!({ "now": "an object" });
        r["thumbnail"] = Value::Null;
        let song = parse(row).unwrap();
        assert_eq!(song.duration_secs, None);
        assert!(!song.explicit);
        assert!(song.thumbnails.is_empty());
    }

    #[test]
    fn oversized_duration_maps_to_none() {
        let mut row = playlist_row("abc", "Get Lucky");
        let fixed = &mut row["musicResponsiveListItemRenderer"]["fixedColumns"][0];
        fixed["musicResponsiveListItemFixedColumnRenderer"]["text"]["runs"][0]["text"] =
            json!("99999999999999999:00:00");
        let song = parse(row).unwrap();
        assert_eq!(song.duration_secs, None);
        assert_eq!(song.title, "Get Lucky");
    }

    #[test]
    fn parse_songs_skips_other_renderers() {
        let doc = JsonDocument::from_value(json!([
            playlist_row("a", "A"),
            { "continuationItemRenderer": {} },
            playlist_row("b", "B"),
        ]));
        let songs = parse_songs(&doc.root()).unwrap();
        let ids: Vec<_> = songs.iter().map(|s| s.video_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
