//! Normalization of untrusted book data into [`BookRecord`]
//!
//! Search documents and persisted favorites arrive as arbitrary JSON. This is
//! the only place that reads those raw values; every other component works on
//! the typed record. Normalization never fails: missing or wrongly typed
//! fields are replaced with fallback values.

use crate::types::{BookRecord, CoverId, PublishYear};
use serde_json::Value;
use uuid::Uuid;

/// Title used when a favorite or search document has none
pub const UNTITLED: &str = "Untitled";

/// Title used when a persisted favorite has none
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author string used when no author is known
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Prefix for keys synthesized when the source has no identifier
pub const LOCAL_KEY_PREFIX: &str = "local-";

/// Which call site a value is being normalized for
///
/// The call sites differ in their fallback defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizePath {
    /// Restoring a favorite from persisted storage
    Stored,
    /// Saving a chosen search result as a favorite
    Favorite,
    /// Reading a document from a search response
    Search,
}

impl NormalizePath {
    fn title_fallback(self) -> &'static str {
        match self {
            NormalizePath::Stored => UNKNOWN_TITLE,
            NormalizePath::Favorite | NormalizePath::Search => UNTITLED,
        }
    }
}

/// Normalize an entry loaded from persisted storage
pub fn normalize_stored(value: &Value) -> BookRecord {
    normalize(value, NormalizePath::Stored)
}

/// Normalize a record chosen for favoriting
pub fn normalize_favorite(value: &Value) -> BookRecord {
    normalize(value, NormalizePath::Favorite)
}

/// Normalize a document from a search response
pub fn normalize_search_doc(value: &Value) -> BookRecord {
    normalize(value, NormalizePath::Search)
}

/// Normalize the document at `index` of a search response page
///
/// A document without any identifier gets a key derived from its content and
/// position, so the same response yields the same key on every run.
pub fn normalize_search_doc_at(value: &Value, index: usize) -> BookRecord {
    normalize_with_key(value, NormalizePath::Search, || content_key(value, index))
}

/// Normalize any JSON value into a [`BookRecord`]
///
/// Non-object values are treated like an empty object.
pub fn normalize(value: &Value, path: NormalizePath) -> BookRecord {
    normalize_with_key(value, path, synthesize_key)
}

/// The identifier carried by a raw value, if it has a usable one
pub fn source_key(value: &Value, path: NormalizePath) -> Option<String> {
    field(value, "key")
        .and_then(scalar_key)
        .or_else(|| match path {
            NormalizePath::Search => field(value, "edition_key").and_then(edition_key),
            _ => None,
        })
}

fn normalize_with_key(
    value: &Value,
    path: NormalizePath,
    fallback_key: impl FnOnce() -> String,
) -> BookRecord {
    let get = |name| field(value, name);

    let key = source_key(value, path).unwrap_or_else(fallback_key);

    BookRecord {
        key,
        title: get("title")
            .and_then(title)
            .unwrap_or_else(|| path.title_fallback().to_string()),
        author_name: get("author_name")
            .and_then(author_name)
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        first_publish_year: get("first_publish_year")
            .and_then(publish_year)
            .unwrap_or_default(),
        cover_i: get("cover_i").and_then(cover_id),
    }
}

fn field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value.as_object().and_then(|obj| obj.get(name))
}

/// A fresh key that cannot collide with any other synthesized key
fn synthesize_key() -> String {
    format!("{}{}", LOCAL_KEY_PREFIX, Uuid::new_v4())
}

/// A stable key for a value without one: name-based UUID over position and content
fn content_key(value: &Value, index: usize) -> String {
    let seed = format!("{}:{}", index, value);
    format!(
        "{}{}",
        LOCAL_KEY_PREFIX,
        Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes())
    )
}

fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Edition keys are bare OLIDs; give them the path form work keys already have
fn edition_key(value: &Value) -> Option<String> {
    let first = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let olid = scalar_key(first)?;
    if olid.starts_with('/') {
        Some(olid)
    } else {
        Some(format!("/books/{}", olid))
    }
}

fn title(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let names: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn publish_year(value: &Value) -> Option<PublishYear> {
    match value {
        Value::Number(n) => Some(match integral(n) {
            Some(year) => PublishYear::Year(year),
            None => PublishYear::Text(n.to_string()),
        }),
        Value::String(s) if !s.is_empty() => Some(PublishYear::Text(s.clone())),
        _ => None,
    }
}

fn cover_id(value: &Value) -> Option<CoverId> {
    match value {
        Value::Number(n) => integral(n).map(CoverId::Id),
        Value::String(s) if !s.is_empty() => Some(CoverId::Key(s.clone())),
        _ => None,
    }
}

/// The number as an i64 when it has no fractional part
fn integral(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}
