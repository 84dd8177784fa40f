//! The canonical book record used across search results and favorites

use super::{CoverId, PublishYear};
use serde::{Deserialize, Serialize};

/// A normalized book record
///
/// Field names follow the remote search API so a persisted snapshot reads the
/// same as a search document. Records are only built through
/// [`crate::normalize`], which guarantees every field is populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookRecord {
    /// Unique identifier, never empty
    pub key: String,

    /// Display title
    pub title: String,

    /// Authors joined with ", "
    pub author_name: String,

    /// Year of first publication, or the "N/A" sentinel
    pub first_publish_year: PublishYear,

    /// Cover identifier, `None` when the book has no cover
    pub cover_i: Option<CoverId>,
}

impl BookRecord {
    /// Whether the author string contains `needle`, ignoring case
    pub fn author_matches(&self, needle: &str) -> bool {
        self.author_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Whether a cover image can be requested for this record
    pub fn has_cover(&self) -> bool {
        self.cover_i.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BookRecord {
        BookRecord {
            key: "/works/OL893415W".to_string(),
            title: "Dune".to_string(),
            author_name: "Frank Herbert".to_string(),
            first_publish_year: PublishYear::Year(1965),
            cover_i: Some(CoverId::Id(11481354)),
        }
    }

    #[test]
    fn test_author_matches_ignores_case() {
        let book = sample();
        assert!(book.author_matches("herb"));
        assert!(book.author_matches("FRANK"));
        assert!(book.author_matches(""));
        assert!(!book.author_matches("asimov"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["first_publish_year"], 1965);
        assert_eq!(json["cover_i"], 11481354);

        let mut coverless = sample();
        coverless.cover_i = None;
        coverless.first_publish_year = PublishYear::unknown();
        let json = serde_json::to_value(coverless).unwrap();
        assert!(json["cover_i"].is_null());
        assert_eq!(json["first_publish_year"], "N/A");
    }
}
