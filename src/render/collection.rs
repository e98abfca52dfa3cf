use super::document::render_document;
use super::value::RenderContext;
use crate::anchors::{Anchor, AnchorRegistry};
use crate::expansion::ExpansionStore;
use crate::flat_row::{FlatRow, RowKind};
use crate::highlight::Highlighter;
use crate::model::{Collection, document_id};

/// The rendered rows of the active collection
///
/// Mounting registers a scroll anchor for every document; unmounting
/// releases exactly the anchors this view registered.
#[derive(Debug)]
pub struct CollectionView {
    collection: String,
    rows: Vec<FlatRow>,
    registered: Vec<String>,
}

impl CollectionView {
    pub fn mount(
        collection: &Collection,
        expansion: &ExpansionStore,
        query: &str,
        anchors: &mut AnchorRegistry,
    ) -> Self {
        let highlighter = Highlighter::new(query);
        let mut rows = Vec::new();
        let mut registered = Vec::with_capacity(collection.documents.len());

        if collection.documents.is_empty() {
            rows.push(FlatRow {
                document_id: None,
                depth: 0,
                key: None,
                kind: RowKind::NoDocuments,
                resolve_id: None,
                row_index: 0,
            });
        }

        for (index, document) in collection.documents.iter().enumerate() {
            let id = document_id(&collection.name, index);
            anchors.register(id.clone(), Anchor { row: rows.len() });

            let cx = RenderContext {
                expansion,
                highlighter: &highlighter,
                document_id: &id,
            };
            render_document(&collection.name, index, document, &cx, &mut rows);
            registered.push(id);
        }

        CollectionView {
            collection: collection.name.clone(),
            rows,
            registered,
        }
    }

    pub fn unmount(self, anchors: &mut AnchorRegistry) {
        for id in &self.registered {
            anchors.unregister(id);
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dataset;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset::from_json(&json!({
            "users": [{"a": 1}, {"b": 2, "c": 3}],
            "empty": []
        }))
        .unwrap()
    }

    #[test]
    fn test_mount_registers_document_anchors() {
        let dataset = dataset();
        let mut anchors = AnchorRegistry::default();
        let view = CollectionView::mount(
            dataset.collection("users").unwrap(),
            &ExpansionStore::default(),
            "",
            &mut anchors,
        );

        // header, a, gap | header, b, c, gap
        assert_eq!(view.rows().len(), 7);
        assert_eq!(anchors.get("users-0"), Some(Anchor { row: 0 }));
        assert_eq!(anchors.get("users-1"), Some(Anchor { row: 3 }));
        assert!(matches!(view.rows()[3].kind, RowKind::DocumentHeader { index: 1, .. }));
        assert_eq!(view.collection(), "users");
    }

    #[test]
    fn test_unmount_releases_only_own_anchors() {
        let dataset = dataset();
        let mut anchors = AnchorRegistry::default();
        anchors.register("other-0", Anchor { row: 9 });

        let view = CollectionView::mount(
            dataset.collection("users").unwrap(),
            &ExpansionStore::default(),
            "",
            &mut anchors,
        );
        assert_eq!(anchors.len(), 3);

        view.unmount(&mut anchors);
        assert_eq!(anchors.len(), 1);
        assert!(anchors.get("other-0").is_some());
    }

    #[test]
    fn test_empty_collection_placeholder() {
        let dataset = dataset();
        let mut anchors = AnchorRegistry::default();
        let view = CollectionView::mount(
            dataset.collection("empty").unwrap(),
            &ExpansionStore::default(),
            "",
            &mut anchors,
        );

        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].kind, RowKind::NoDocuments);
        assert_eq!(anchors.len(), 0);
    }
}
