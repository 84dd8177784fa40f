//! Loosely typed book fields: values the search API sends as either numbers or strings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel shown when the publication year is unknown
pub const UNKNOWN_YEAR: &str = "N/A";

/// Year of first publication
///
/// Serialized untagged so `Year(1965)` is written as `1965` and `Text("N/A")`
/// as `"N/A"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PublishYear {
    Year(i64),
    Text(String),
}

impl PublishYear {
    /// The "N/A" sentinel
    pub fn unknown() -> Self {
        PublishYear::Text(UNKNOWN_YEAR.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PublishYear::Text(text) if text == UNKNOWN_YEAR)
    }
}

impl Default for PublishYear {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for PublishYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishYear::Year(year) => write!(f, "{}", year),
            PublishYear::Text(text) => f.write_str(text),
        }
    }
}

/// Cover image identifier
///
/// `0` is a valid identifier; absence is modelled with `Option<CoverId>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum CoverId {
    Id(i64),
    Key(String),
}

impl fmt::Display for CoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverId::Id(id) => write!(f, "{}", id),
            CoverId::Key(key) => f.write_str(key),
        }
    }
}
