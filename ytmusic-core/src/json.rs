//! JSON value nodes.
//!
//! A [`JsonNode`] is a read-only view of one position in a parsed document.
//! The position may not exist: descending into a missing key, an out-of-range
//! index, or through a value of the wrong shape yields an *undefined* node
//! rather than an error, and every further descent from an undefined node is
//! undefined as well. That lets mappers write long chains such as
//!
//! ```
//! # use ytmusic_core::JsonDocument;
//! # let doc = JsonDocument::parse(r#"{"contents":[{"title":{"runs":[{"text":"Song"}]}}]}"#).unwrap();
//! let title = doc
//!     .root()
//!     .get("contents")
//!     .at(0)
//!     .get("title")
//!     .get("runs")
//!     .at(0)
//!     .get("text")
//!     .as_str()
//!     .or("Unknown");
//! assert_eq!(title, "Song");
//! ```
//!
//! and only decide at the end whether absence is tolerated
//! ([`Nav::or`](crate::Nav::or)) or fatal ([`Nav::or_throw`](crate::Nav::or_throw)).
//!
//! JSON `null` is a present value of kind [`JsonKind::Null`], distinct from
//! an undefined node.

use crate::nav::Nav;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// The JSON type at a node, plus [`Undefined`](Self::Undefined) for paths
/// that do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    fn of(value: Option<&Value>) -> Self {
        match value {
            None => Self::Undefined,
            Some(Value::Null) => Self::Null,
            Some(Value::Bool(_)) => Self::Bool,
            Some(Value::Number(_)) => Self::Number,
            Some(Value::String(_)) => Self::String,
            Some(Value::Array(_)) => Self::Array,
            Some(Value::Object(_)) => Self::Object,
        }
    }

    /// Lowercase name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug)]
struct Link {
    parent: JsonPath,
    segment: Segment,
}

/// The route from the document root to a node.
///
/// Stored as a shared linked list, so extending a path is one small
/// allocation and siblings share their common prefix.
#[derive(Debug, Clone, Default)]
pub struct JsonPath(Option<Arc<Link>>);

impl JsonPath {
    /// The document root, rendered as `$`.
    pub fn root() -> Self {
        Self(None)
    }

    fn child(&self, segment: Segment) -> Self {
        Self(Some(Arc::new(Link {
            parent: self.clone(),
            segment,
        })))
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = &self.0;
        while let Some(link) = cur {
            depth += 1;
            cur = &link.parent.0;
        }
        depth
    }

    fn segments(&self) -> Vec<&Segment> {
        let mut out = Vec::with_capacity(self.depth());
        let mut cur = &self.0;
        while let Some(link) = cur {
            out.push(&link.segment);
            cur = &link.parent.0;
        }
        out.reverse();
        out
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in self.segments() {
            match segment {
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Key(k) if is_identifier(k) => write!(f, ".{k}")?,
                Segment::Key(k) => write!(f, "[{}]", Value::String(k.clone()))?,
            }
        }
        Ok(())
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// One parsed response body.
///
/// Owns the [`Value`] tree; all navigation borrows from it. Immutable, so a
/// document can be shared across threads and read concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    value: Value,
}

impl JsonDocument {
    /// Parse a document from text.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        Ok(Self {
            value: serde_json::from_str(text)?,
        })
    }

    /// Wrap an already-parsed value.
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// Node for the document root.
    pub fn root(&self) -> JsonNode<'_> {
        JsonNode::new(&self.value)
    }

    /// The underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl From<Value> for JsonDocument {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// A position in a [`JsonDocument`], possibly undefined.
#[derive(Debug, Clone)]
pub struct JsonNode<'a> {
    value: Option<&'a Value>,
    path: JsonPath,
}

impl<'a> JsonNode<'a> {
    /// Root node over a borrowed value.
    pub fn new(value: &'a Value) -> Self {
        Self {
            value: Some(value),
            path: JsonPath::root(),
        }
    }

    /// An undefined node at the root path.
    pub fn undefined() -> Self {
        Self {
            value: None,
            path: JsonPath::root(),
        }
    }

    /// Child `key` of an object node. Undefined if this node is not an object
    /// or has no such key.
    pub fn get(&self, key: &str) -> JsonNode<'a> {
        JsonNode {
            value: self.value.and_then(|v| v.as_object()).and_then(|m| m.get(key)),
            path: self.path.child(Segment::Key(key.to_owned())),
        }
    }

    /// Element `index` of an array node. Undefined if this node is not an
    /// array or the index is out of range.
    pub fn at(&self, index: usize) -> JsonNode<'a> {
        JsonNode {
            value: self.value.and_then(|v| v.as_array()).and_then(|a| a.get(index)),
            path: self.path.child(Segment::Index(index)),
        }
    }

    /// First element of an array node.
    pub fn first(&self) -> JsonNode<'a> {
        self.at(0)
    }

    /// Last element of an array node. Undefined for empty arrays and
    /// non-arrays.
    pub fn last(&self) -> JsonNode<'a> {
        match self.value.and_then(|v| v.as_array()) {
            Some(arr) if !arr.is_empty() => self.at(arr.len() - 1),
            _ => JsonNode {
                value: None,
                path: self.path.clone(),
            },
        }
    }

    /// This node if it is defined, otherwise `other`. For objects the API
    /// nests under different wrappers depending on the rollout.
    pub fn fallback(self, other: JsonNode<'a>) -> JsonNode<'a> {
        if self.is_undefined() { other } else { self }
    }

    pub fn kind(&self) -> JsonKind {
        JsonKind::of(self.value)
    }

    /// `true` if the path does not exist. A JSON `null` is *not* undefined.
    pub fn is_undefined(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Some(Value::Null))
    }

    /// The path walked from the root to this node.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// The raw value, if any.
    pub fn raw(&self) -> Option<&'a Value> {
        self.value
    }

    fn project<T>(&self, expected: &'static str, f: impl FnOnce(&'a Value) -> Option<T>) -> Nav<T> {
        match self.value {
            None => Nav::missing(self.path.clone()),
            Some(v) => match f(v) {
                Some(out) => Nav::present(out, self.kind(), self.path.clone()),
                None => Nav::mismatch(expected, self.kind(), self.path.clone()),
            },
        }
    }

    /// Borrow a string value. Numbers are not converted.
    pub fn as_str(&self) -> Nav<&'a str> {
        self.project("string", Value::as_str)
    }

    /// Owned copy of a string value.
    pub fn as_string(&self) -> Nav<String> {
        self.project("string", |v| v.as_str().map(str::to_owned))
    }

    /// Any JSON number as `f64`. Numeric-looking strings are absent.
    pub fn as_f64(&self) -> Nav<f64> {
        self.project("number", Value::as_f64)
    }

    /// An integral number that fits in `i64`.
    pub fn as_i64(&self) -> Nav<i64> {
        self.project("integer", Value::as_i64)
    }

    /// A non-negative integral number that fits in `u64`.
    pub fn as_u64(&self) -> Nav<u64> {
        self.project("unsigned integer", Value::as_u64)
    }

    pub fn as_bool(&self) -> Nav<bool> {
        self.project("boolean", Value::as_bool)
    }

    /// Elements of an array node, each carrying its own indexed path.
    pub fn as_array(&self) -> Nav<Vec<JsonNode<'a>>> {
        let path = self.path.clone();
        self.project("array", |v| {
            v.as_array().map(|arr| {
                arr.iter()
                    .enumerate()
                    .map(|(i, item)| JsonNode {
                        value: Some(item),
                        path: path.child(Segment::Index(i)),
                    })
                    .collect()
            })
        })
    }

    /// An object node as a [`JsonObject`].
    pub fn as_object(&self) -> Nav<JsonObject<'a>> {
        let path = self.path.clone();
        self.project("object", |v| v.as_object().map(|map| JsonObject { map, path }))
    }
}

impl Default for JsonNode<'_> {
    fn default() -> Self {
        Self::undefined()
    }
}

/// A present JSON object.
#[derive(Debug, Clone)]
pub struct JsonObject<'a> {
    map: &'a Map<String, Value>,
    path: JsonPath,
}

impl<'a> JsonObject<'a> {
    /// Child node for `key` (undefined when absent).
    pub fn get(&self, key: &str) -> JsonNode<'a> {
        JsonNode {
            value: self.map.get(key),
            path: self.path.child(Segment::Key(key.to_owned())),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Keys in map order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.map.keys().map(String::as_str)
    }

    /// `(key, node)` pairs in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, JsonNode<'a>)> + '_ {
        self.map.iter().map(|(k, v)| {
            (
                k.as_str(),
                JsonNode {
                    value: Some(v),
                    path: self.path.child(Segment::Key(k.clone())),
                },
            )
        })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
