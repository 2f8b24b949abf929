//! Error types for JSON navigation.
//!
//! Pagination never wraps errors: a failure from a
//! [`PageFetcher`](crate::PageFetcher) reaches the caller as the fetcher's own
//! error type. The only errors this crate creates are parse failures raised
//! when a required field cannot be read.

use crate::json::{JsonKind, JsonPath};
use thiserror::Error;

/// Why a required field could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The path does not exist in the document.
    MissingField,
    /// The path exists but holds a different JSON type.
    ///
    /// `expected` names the projection (`"string"`, `"integer"`, ...),
    /// `found` is the kind actually present.
    TypeMismatch {
        expected: &'static str,
        found: JsonKind,
    },
}

/// A required field was absent or had the wrong type.
///
/// Raised by [`Nav::or_throw`](crate::Nav::or_throw). Carries the caller's
/// description of the field and the path that was walked, so a failure can be
/// matched against a captured API response:
///
/// ```text
/// missing field `playlist title` at $.header.musicDetailHeaderRenderer.title.runs[0].text
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} `{description}` at {path}", describe(.kind))]
pub struct JsonParseError {
    /// Missing or mismatched.
    pub kind: ParseErrorKind,
    /// Human-readable field description supplied at the call site.
    pub description: String,
    /// Rendered navigation path (`$.a.b[0]`).
    pub path: String,
}

impl JsonParseError {
    pub(crate) fn new(kind: ParseErrorKind, description: &str, path: &JsonPath) -> Self {
        Self {
            kind,
            description: description.to_owned(),
            path: path.to_string(),
        }
    }

    /// `true` when the path did not exist at all.
    pub fn is_missing(&self) -> bool {
        self.kind == ParseErrorKind::MissingField
    }
}

fn describe(kind: &ParseErrorKind) -> String {
    match kind {
        ParseErrorKind::MissingField => "missing field".to_owned(),
        ParseErrorKind::TypeMismatch { expected, found } => {
            format!("expected {expected}, found {found} for field")
        }
    }
}

/// Convenience alias for `Result<T, JsonParseError>`.
pub type Result<T> = std::result::Result<T, JsonParseError>;
