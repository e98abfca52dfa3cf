use super::value::{RenderContext, render_value};
use crate::flat_row::{FlatRow, RowKind};
use crate::model::{Document, StructuralPath};

/// Top-level field whose value is a user id that can be resolved to a name
pub const RESOLVABLE_FIELD: &str = "discordId";

/// Render a document: header row, one value per field, then a gap
pub fn render_document(
    collection: &str,
    index: usize,
    document: &Document,
    cx: &RenderContext<'_>,
    rows: &mut Vec<FlatRow>,
) {
    rows.push(FlatRow {
        document_id: Some(cx.document_id.to_string()),
        depth: 0,
        key: None,
        kind: RowKind::DocumentHeader {
            collection: collection.to_string(),
            index,
        },
        resolve_id: None,
        row_index: rows.len(),
    });

    let root = StructuralPath::document(collection, index);
    for (key, value) in document.fields() {
        let first = rows.len();
        render_value(value, &root.field(key), 1, Some(key), cx, rows);
        if key == RESOLVABLE_FIELD
            && let Some(row) = rows.get_mut(first)
        {
            row.resolve_id = Some(value.text());
        }
    }

    rows.push(FlatRow {
        document_id: Some(cx.document_id.to_string()),
        depth: 0,
        key: None,
        kind: RowKind::Gap,
        resolve_id: None,
        row_index: rows.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::ExpansionStore;
    use crate::highlight::Highlighter;
    use crate::model::{Dataset, document_id};
    use serde_json::json;

    fn rows_for(json: serde_json::Value, store: &ExpansionStore, query: &str) -> Vec<FlatRow> {
        let dataset = Dataset::from_json(&json!({ "members": [json] })).unwrap();
        let document = dataset.document("members", 0).unwrap();
        let highlighter = Highlighter::new(query);
        let id = document_id("members", 0);
        let cx = RenderContext {
            expansion: store,
            highlighter: &highlighter,
            document_id: &id,
        };
        let mut rows = Vec::new();
        render_document("members", 0, document, &cx, &mut rows);
        rows
    }

    #[test]
    fn test_header_fields_gap() {
        let rows = rows_for(json!({"name": "Ada", "tags": ["x"]}), &ExpansionStore::default(), "");

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].kind, RowKind::DocumentHeader { collection: "members".to_string(), index: 0 });
        assert_eq!(rows[1].key_text().as_deref(), Some("name"));
        assert_eq!(rows[1].depth, 1);
        assert_eq!(
            rows[2].toggle_path(),
            Some(&StructuralPath::document("members", 0).field("tags"))
        );
        assert_eq!(rows[3].kind, RowKind::Gap);
        assert!(rows.iter().all(|r| r.document_id.as_deref() == Some("members-0")));
        assert!(rows.iter().enumerate().all(|(i, r)| r.row_index == i));
    }

    #[test]
    fn test_field_order_matches_document() {
        let rows = rows_for(json!({"z": 1, "a": 2, "m": 3}), &ExpansionStore::default(), "");
        let keys: Vec<String> = rows.iter().filter_map(|r| r.key_text()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_resolvable_field_only_at_top_level() {
        let mut store = ExpansionStore::default();
        store.set(&StructuralPath::document("members", 0).field("profile"), true);

        let rows = rows_for(
            json!({"discordId": 1234567890, "profile": {"discordId": "nested"}}),
            &store,
            "",
        );

        let resolvable: Vec<&str> = rows.iter().filter_map(|r| r.resolve_id.as_deref()).collect();
        assert_eq!(resolvable, vec!["1234567890"]);
        assert_eq!(rows[1].key_text().as_deref(), Some("discordId"));
    }

    #[test]
    fn test_keys_highlighted() {
        let rows = rows_for(json!({"email": "x"}), &ExpansionStore::default(), "MAIL");
        let key = rows[1].key.clone().unwrap();
        assert!(key.iter().any(|s| s.is_match() && s.text() == "mail"));
    }
}
