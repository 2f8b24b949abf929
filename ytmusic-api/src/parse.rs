//! Navigation helpers shared by the mappers.
//!
//! InnerTube repeats a handful of shapes everywhere: formatted text as
//! `{ "runs": [{ "text": ... }] }` or `{ "simpleText": ... }`, artwork under
//! one of several thumbnail renderers, and two generations of continuation
//! markers. These helpers read those shapes on top of [`JsonNode`].

use crate::types::Thumbnail;
use ytmusic_core::{JsonNode, Nav};

/// Full text of a formatted-text node: the concatenated `runs[*].text`, or
/// `simpleText`.
pub fn runs_text(node: &JsonNode<'_>) -> Nav<String> {
    node.get("runs")
        .as_array()
        .map(|runs| {
            runs.iter()
                .map(|run| run.get("text").as_str().or(""))
                .collect::<String>()
        })
        .or_nav(node.get("simpleText").as_string())
}

/// Text of the `n`th run.
pub fn run_text<'a>(node: &JsonNode<'a>, n: usize) -> Nav<&'a str> {
    node.get("runs").at(n).get("text").as_str()
}

/// Artwork sizes under a `thumbnail` node, smallest first as served.
///
/// Accepts the music, cropped-square and bare `thumbnails` layouts. Entries
/// without a URL are skipped; missing dimensions read as `0`.
pub fn thumbnails(node: &JsonNode<'_>) -> Vec<Thumbnail> {
    let list = node
        .get("musicThumbnailRenderer")
        .get("thumbnail")
        .fallback(node.get("croppedSquareThumbnailRenderer").get("thumbnail"))
        .fallback(node.clone())
        .get("thumbnails");
    list.as_array()
        .or_default()
        .iter()
        .filter_map(|t| {
            let url = t.get("url").as_string().map(Some).or(None)?;
            Some(Thumbnail {
                url,
                width: t.get("width").as_u64().or(0),
                height: t.get("height").as_u64().or(0),
            })
        })
        .collect()
}

/// Next-page token of a list.
///
/// `container` is the shelf (older responses keep
/// `continuations[0].nextContinuationData.continuation` there) and `items`
/// its item array (newer responses end it with a `continuationItemRenderer`).
pub fn continuation_token(container: &JsonNode<'_>, items: &JsonNode<'_>) -> Nav<String> {
    container
        .get("continuations")
        .at(0)
        .get("nextContinuationData")
        .get("continuation")
        .as_string()
        .or_nav(
            items
                .last()
                .get("continuationItemRenderer")
                .get("continuationEndpoint")
                .get("continuationCommand")
                .get("token")
                .as_string(),
        )
}

/// Seconds in a `m:ss` or `h:mm:ss` display duration.
///
/// Minutes and seconds after the leading field must be below 60; values
/// that do not fit in `u64` are rejected.
pub fn parse_duration(text: &str) -> Option<u64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    parts.iter().enumerate().try_fold(0u64, |acc, (i, part)| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n = part.parse::<u64>().ok()?;
        if i > 0 && n >= 60 {
            return None;
        }
        acc.checked_mul(60)?.checked_add(n)
    })
}

/// First integer in a display string such as `"1,234 songs"`.
pub fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text
        .split_whitespace()
        .find(|w| w.starts_with(|c: char| c.is_ascii_digit()))?
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();
    digits.parse().ok()
}
