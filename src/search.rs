//! Search across the whole dataset.
//!
//! A document matches when its compact JSON text contains the query,
//! case-insensitively, field names included.

use crate::model::{Dataset, document_id};

/// A document that contains the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub collection: String,
    /// Position within the collection (not a stable identity)
    pub doc_index: usize,
    /// `"{collection}-{doc_index}"`
    pub id: String,
}

impl SearchMatch {
    fn new(collection: &str, doc_index: usize) -> Self {
        SearchMatch {
            collection: collection.to_string(),
            doc_index,
            id: document_id(collection, doc_index),
        }
    }
}

/// Lower-cased canonical text of every document, built once per dataset
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<(String, Vec<String>)>,
}

impl SearchIndex {
    pub fn build(dataset: &Dataset) -> Self {
        let entries = dataset
            .collections()
            .iter()
            .map(|collection| {
                let texts = collection
                    .documents
                    .iter()
                    .map(|doc| doc.canonical_text().to_lowercase())
                    .collect();
                (collection.name.clone(), texts)
            })
            .collect();
        SearchIndex { entries }
    }

    /// Matches in collection order, then document order
    pub fn search(&self, query: &str) -> Vec<SearchMatch> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        let mut results = Vec::new();
        for (collection, texts) in &self.entries {
            for (doc_index, text) in texts.iter().enumerate() {
                if text.contains(&needle) {
                    results.push(SearchMatch::new(collection, doc_index));
                }
            }
        }
        results
    }
}

/// One-shot search without keeping an index around
#[allow(dead_code)]
pub fn search(dataset: &Dataset, query: &str) -> Vec<SearchMatch> {
    SearchIndex::build(dataset).search(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset::from_json(&json!({
            "users": [{"a": 1}],
            "logs": [{"a": 2}, {"b": "find-me"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_single_match() {
        let results = search(&dataset(), "find-me");
        assert_eq!(
            results,
            vec![SearchMatch {
                collection: "logs".to_string(),
                doc_index: 1,
                id: "logs-1".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_query_has_no_results() {
        assert!(search(&dataset(), "").is_empty());
        assert!(search(&dataset(), "  ").is_empty());
    }

    #[test]
    fn test_case_insensitive_and_keys_count() {
        let results = search(&dataset(), "FIND");
        assert_eq!(results.len(), 1);

        // Field names are part of the text
        let ids: Vec<String> = search(&dataset(), "\"a\"").into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["users-0", "logs-0"]);
    }

    #[test]
    fn test_order_follows_traversal() {
        let dataset = Dataset::from_json(&json!({
            "zeta": [{"x": "hit"}, {"x": "miss"}, {"x": "HIT"}],
            "alpha": [{"nested": {"deep": ["hit"]}}]
        }))
        .unwrap();

        let ids: Vec<String> = search(&dataset, "hit").into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["zeta-0", "zeta-2", "alpha-0"]);
    }

    #[test]
    fn test_query_is_literal() {
        let dataset = Dataset::from_json(&json!({"c": [{"v": "aXb"}, {"v": "a.b"}]})).unwrap();
        let ids: Vec<String> = search(&dataset, "a.b").into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["c-1"]);
    }

    #[test]
    fn test_index_reuse() {
        let index = SearchIndex::build(&dataset());
        assert_eq!(index.search("find-me").len(), 1);
        assert_eq!(index.search("2").len(), 1);
        assert!(index.search("absent").is_empty());
    }
}
