//! Translation of a raw search response body

use crate::normalize::normalize_search_doc_at;
use crate::types::BookRecord;
use serde::Serialize;
use serde_json::Value;

/// One page of normalized search results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPage {
    /// Total matches across all pages
    pub num_found: u64,
    pub docs: Vec<BookRecord>,
}

/// Read `numFound` and `docs` from a response body
///
/// A missing or non-integer `numFound` counts as 0; missing or non-array
/// `docs` is an empty page.
pub fn parse_search_page(body: &Value) -> SearchPage {
    let num_found = body.get("numFound").and_then(Value::as_u64).unwrap_or(0);
    let docs = body
        .get("docs")
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .enumerate()
                .map(|(index, doc)| normalize_search_doc_at(doc, index))
                .collect()
        })
        .unwrap_or_default();
    SearchPage { num_found, docs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_page() {
        let body = json!({
            "numFound": 2,
            "docs": [
                { "key": "/works/OL1W", "title": "Dune" },
                { "title": null, "author_name": ["A", "B"] }
            ]
        });
        let page = parse_search_page(&body);
        assert_eq!(page.num_found, 2);
        assert_eq!(page.docs.len(), 2);
        assert_eq!(page.docs[1].title, "Untitled");
        assert_eq!(page.docs[1].author_name, "A, B");
    }

    #[test]
    fn test_keyless_docs_keep_keys_across_parses() {
        let body = json!({ "numFound": 2, "docs": [{ "title": "A" }, { "title": "A" }] });
        let first = parse_search_page(&body);
        let second = parse_search_page(&body);
        assert_eq!(first, second);
        assert_ne!(first.docs[0].key, first.docs[1].key);
    }

    #[test]
    fn test_parse_missing_fields() {
        assert_eq!(parse_search_page(&json!({})), SearchPage::default());
        assert_eq!(parse_search_page(&json!([])), SearchPage::default());

        let page = parse_search_page(&json!({ "numFound": "lots", "docs": {} }));
        assert_eq!(page.num_found, 0);
        assert!(page.docs.is_empty());
    }
}
