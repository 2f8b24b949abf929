//! Navigation results.
//!
//! Every projection on a [`JsonNode`](crate::JsonNode) returns a [`Nav`]:
//! either a typed value, or the reason it could not be produced. A `Nav` is
//! resolved by exactly one terminal, [`or`](Nav::or) (and its `or_else` /
//! `or_default` variants) for optional fields, or [`or_throw`](Nav::or_throw)
//! for required ones.

use crate::error::{JsonParseError, ParseErrorKind};
use crate::json::{JsonKind, JsonPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Absent {
    Missing,
    Mismatch {
        expected: &'static str,
        found: JsonKind,
    },
}

/// Outcome of a type projection on a node.
#[derive(Debug, Clone)]
#[must_use = "a navigation result must be resolved with `or` or `or_throw`"]
pub struct Nav<T> {
    outcome: Result<T, Absent>,
    kind: JsonKind,
    path: JsonPath,
}

impl<T> Nav<T> {
    pub(crate) fn present(value: T, kind: JsonKind, path: JsonPath) -> Self {
        Self {
            outcome: Ok(value),
            kind,
            path,
        }
    }

    pub(crate) fn missing(path: JsonPath) -> Self {
        Self {
            outcome: Err(Absent::Missing),
            kind: JsonKind::Undefined,
            path,
        }
    }

    pub(crate) fn mismatch(expected: &'static str, found: JsonKind, path: JsonPath) -> Self {
        Self {
            outcome: Err(Absent::Mismatch { expected, found }),
            kind: found,
            path,
        }
    }

    /// `true` when a value of the requested type is present.
    pub fn is_present(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Path of the node this result was projected from.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// The value, or `default` when absent.
    pub fn or(self, default: T) -> T {
        self.outcome.unwrap_or(default)
    }

    /// The value, or the result of `f` when absent.
    pub fn or_else(self, f: impl FnOnce() -> T) -> T {
        self.outcome.unwrap_or_else(|_| f())
    }

    /// The value, or `T::default()` when absent.
    pub fn or_default(self) -> T
    where
        T: Default,
    {
        self.outcome.unwrap_or_default()
    }

    /// The value, or a [`JsonParseError`] naming `description` and the path.
    pub fn or_throw(self, description: &str) -> crate::error::Result<T> {
        match self.outcome {
            Ok(value) => Ok(value),
            Err(Absent::Missing) => Err(JsonParseError::new(
                ParseErrorKind::MissingField,
                description,
                &self.path,
            )),
            Err(Absent::Mismatch { expected, found }) => Err(JsonParseError::new(
                ParseErrorKind::TypeMismatch { expected, found },
                description,
                &self.path,
            )),
        }
    }

    /// Transform a present value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Nav<U> {
        Nav {
            outcome: self.outcome.map(f),
            kind: self.kind,
            path: self.path,
        }
    }

    /// Apply a fallible conversion to a present value. A `None` from `f`
    /// turns the result into a mismatch against `expected`.
    ///
    /// ```
    /// # use ytmusic_core::JsonDocument;
    /// let doc = JsonDocument::parse(r#"{"count": "12 songs"}"#).unwrap();
    /// let count = doc
    ///     .root()
    ///     .get("count")
    ///     .as_str()
    ///     .and_then("song count", |s| s.split(' ').next()?.parse::<u32>().ok())
    ///     .or(0);
    /// assert_eq!(count, 12);
    /// ```
    pub fn and_then<U>(self, expected: &'static str, f: impl FnOnce(T) -> Option<U>) -> Nav<U> {
        let outcome = match self.outcome {
            Ok(value) => f(value).ok_or(Absent::Mismatch {
                expected,
                found: self.kind,
            }),
            Err(absent) => Err(absent),
        };
        Nav {
            outcome,
            kind: self.kind,
            path: self.path,
        }
    }

    /// Use `other` when this result is absent. For fields the API has moved
    /// between releases.
    pub fn or_nav(self, other: Nav<T>) -> Nav<T> {
        if self.is_present() { self } else { other }
    }
}
