//! Viewer state that does not depend on the UI toolkit.
//!
//! Holds the dataset snapshot, the active collection, the search query and
//! its matches, the shared expansion store and the navigation highlight.
//! Every change that affects rendering rebuilds the collection view.

use crate::anchors::AnchorRegistry;
use crate::expansion::ExpansionStore;
use crate::flat_row::FlatRow;
use crate::model::{Dataset, Document, StructuralPath};
use crate::navigation::{NavigationController, NavigationPlan, Ticket};
use crate::render::CollectionView;
use crate::search::{SearchIndex, SearchMatch};

#[derive(Debug, Default)]
pub struct Shell {
    dataset: Option<Dataset>,
    index: SearchIndex,
    active: Option<String>,
    query: String,
    matches: Vec<SearchMatch>,
    expansion: ExpansionStore,
    anchors: AnchorRegistry,
    navigation: NavigationController,
    view: Option<CollectionView>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly fetched snapshot.
    ///
    /// The active collection is kept when the new snapshot still has it,
    /// otherwise the first collection becomes active. Expansion state is
    /// kept only for documents whose content is unchanged at the same
    /// position, and any navigation highlight is dropped.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        log::info!(
            "dataset loaded: {} collections, {} documents",
            dataset.collections().len(),
            dataset.document_count()
        );
        let previous = self.dataset.take();
        self.expansion.retain(|path| {
            let (collection, index) = (path.collection(), path.document_index());
            previous
                .as_ref()
                .and_then(|old| old.document(collection, index))
                .is_some_and(|old| dataset.document(collection, index) == Some(old))
        });
        self.navigation.reset();
        self.view = None;
        self.anchors.clear();

        self.index = SearchIndex::build(&dataset);
        let keep_active = self
            .active
            .as_deref()
            .is_some_and(|name| dataset.collection(name).is_some());
        if !keep_active {
            self.active = dataset.first_collection().map(str::to_string);
        }
        self.dataset = Some(dataset);
        self.matches = self.index.search(&self.query);
        self.rebuild();
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn active_collection(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn rows(&self) -> &[FlatRow] {
        self.view.as_ref().map(CollectionView::rows).unwrap_or(&[])
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.navigation.highlighted()
    }

    #[cfg(test)]
    pub fn is_expanded(&self, path: &StructuralPath) -> bool {
        self.expansion.is_expanded(path)
    }

    pub fn document(&self, collection: &str, index: usize) -> Option<&Document> {
        self.dataset.as_ref()?.document(collection, index)
    }

    /// Switch collections; unknown names are ignored
    pub fn select_collection(&mut self, name: &str) -> bool {
        let known = self
            .dataset
            .as_ref()
            .is_some_and(|d| d.collection(name).is_some());
        if !known {
            log::warn!("ignoring unknown collection '{}'", name);
            return false;
        }
        if self.active.as_deref() != Some(name) {
            self.active = Some(name.to_string());
            self.rebuild();
        }
        true
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.matches = self.index.search(&self.query);
        self.rebuild();
    }

    pub fn toggle(&mut self, path: &StructuralPath) -> bool {
        let expanded = self.expansion.toggle(path);
        self.rebuild();
        expanded
    }

    pub fn expand_document(&mut self, collection: &str, index: usize) {
        let Some(document) = self.document(collection, index).cloned() else {
            return;
        };
        let root = StructuralPath::document(collection, index);
        for (key, value) in document.fields() {
            self.expansion.expand_subtree(&root.field(key), value);
        }
        self.rebuild();
    }

    pub fn collapse_document(&mut self, collection: &str, index: usize) {
        self.expansion
            .collapse_subtree(&StructuralPath::document(collection, index));
        self.rebuild();
    }

    /// Activate `collection`, highlight `id`, and return the timers to schedule
    pub fn go_to_document(&mut self, collection: &str, id: &str) -> NavigationPlan {
        self.select_collection(collection);
        self.navigation.go_to_document(id)
    }

    pub fn scroll_due(&self, ticket: Ticket) -> Option<f32> {
        self.navigation.scroll_due(ticket, &self.anchors)
    }

    pub fn clear_due(&mut self, ticket: Ticket) -> bool {
        self.navigation.clear_due(ticket)
    }

    /// Unmount the current view and mount the active collection
    fn rebuild(&mut self) {
        if let Some(view) = self.view.take() {
            view.unmount(&mut self.anchors);
        }
        let Some(dataset) = &self.dataset else {
            return;
        };
        let Some(collection) = self.active.as_deref().and_then(|name| dataset.collection(name)) else {
            return;
        };
        let view = CollectionView::mount(collection, &self.expansion, &self.query, &mut self.anchors);
        log::debug!(
            "mounted {}: {} rows, {} anchors",
            view.collection(),
            view.rows().len(),
            self.anchors.len()
        );
        self.view = Some(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_row::RowKind;
    use serde_json::json;

    fn loaded() -> Shell {
        let mut shell = Shell::new();
        shell.load_dataset(
            Dataset::from_json(&json!({
                "users": [{"a": 1, "tags": ["x", "y"]}],
                "logs": [{"a": 2}, {"b": "find-me"}]
            }))
            .unwrap(),
        );
        shell
    }

    fn toggle_count(shell: &Shell) -> usize {
        shell.rows().iter().filter(|r| r.is_toggle()).count()
    }

    #[test]
    fn test_first_collection_active_after_load() {
        let shell = loaded();
        assert_eq!(shell.active_collection(), Some("users"));
        assert!(matches!(shell.rows()[0].kind, RowKind::DocumentHeader { index: 0, .. }));
    }

    #[test]
    fn test_empty_shell_renders_nothing() {
        let shell = Shell::new();
        assert!(!shell.is_loaded());
        assert!(shell.rows().is_empty());
        assert_eq!(shell.active_collection(), None);
    }

    #[test]
    fn test_expansion_survives_collection_switch() {
        let mut shell = loaded();
        let tags = StructuralPath::document("users", 0).field("tags");

        shell.toggle(&tags);
        let expanded_len = shell.rows().len();

        assert!(shell.select_collection("logs"));
        assert!(shell.select_collection("users"));

        assert!(shell.is_expanded(&tags));
        assert_eq!(shell.rows().len(), expanded_len);
    }

    #[test]
    fn test_query_change_keeps_expansion_and_updates_matches() {
        let mut shell = loaded();
        let tags = StructuralPath::document("users", 0).field("tags");
        shell.toggle(&tags);

        shell.set_query("find-me".to_string());
        assert_eq!(shell.matches().len(), 1);
        assert_eq!(shell.matches()[0].id, "logs-1");
        assert!(shell.is_expanded(&tags));

        shell.set_query(String::new());
        assert!(shell.matches().is_empty());
    }

    #[test]
    fn test_unknown_collection_ignored() {
        let mut shell = loaded();
        assert!(!shell.select_collection("nope"));
        assert_eq!(shell.active_collection(), Some("users"));
    }

    #[test]
    fn test_go_to_document_switches_and_scrolls() {
        let mut shell = loaded();
        let plan = shell.go_to_document("logs", "logs-1");

        assert_eq!(shell.active_collection(), Some("logs"));
        assert_eq!(shell.highlighted(), Some("logs-1"));
        // logs-0 takes header, a, gap
        assert_eq!(shell.scroll_due(plan.ticket), Some(3.0 * crate::flat_row::ROW_HEIGHT));
    }

    #[test]
    fn test_rapid_navigation_keeps_latest_highlight() {
        let mut shell = loaded();
        let first = shell.go_to_document("logs", "logs-1");
        let second = shell.go_to_document("users", "users-0");

        // Stale anchors from the logs view are gone after the switch
        assert_eq!(shell.scroll_due(first.ticket), None);
        assert_eq!(shell.scroll_due(second.ticket), Some(0.0));

        assert!(!shell.clear_due(first.ticket));
        assert_eq!(shell.highlighted(), Some("users-0"));
        assert!(shell.clear_due(second.ticket));
        assert_eq!(shell.highlighted(), None);
    }

    #[test]
    fn test_expand_and_collapse_document() {
        let mut shell = loaded();
        assert_eq!(toggle_count(&shell), 1);

        shell.expand_document("users", 0);
        assert!(shell.is_expanded(&StructuralPath::document("users", 0).field("tags")));
        // header, a, tags, x, y, gap
        assert_eq!(shell.rows().len(), 6);

        shell.collapse_document("users", 0);
        assert_eq!(shell.rows().len(), 4);
    }

    #[test]
    fn test_reload_keeps_active_collection() {
        let mut shell = loaded();
        let dataset = shell.dataset().cloned().unwrap();

        assert!(shell.select_collection("logs"));
        shell.load_dataset(dataset);
        assert_eq!(shell.active_collection(), Some("logs"));
        assert!(matches!(shell.rows()[0].kind, RowKind::DocumentHeader { index: 0, .. }));
    }

    #[test]
    fn test_reload_falls_back_when_collection_is_gone() {
        let mut shell = loaded();
        assert!(shell.select_collection("logs"));

        shell.load_dataset(Dataset::from_json(&json!({"users": [{"a": 1}]})).unwrap());
        assert_eq!(shell.active_collection(), Some("users"));
    }

    #[test]
    fn test_reload_drops_expansion_of_changed_documents() {
        let mut shell = Shell::new();
        shell.load_dataset(Dataset::from_json(&json!({"users": [{"t": [1]}, {"t": [2]}]})).unwrap());
        let first = StructuralPath::document("users", 0).field("t");
        let second = StructuralPath::document("users", 1).field("t");
        shell.toggle(&first);
        shell.toggle(&second);

        // Document 0 removed; the old document 1 now sits at index 0
        shell.load_dataset(Dataset::from_json(&json!({"users": [{"t": [2]}]})).unwrap());
        assert!(!shell.is_expanded(&first));
        assert!(!shell.is_expanded(&second));
        // header, t, gap
        assert_eq!(shell.rows().len(), 3);
    }

    #[test]
    fn test_reload_keeps_expansion_of_unchanged_documents() {
        let mut shell = loaded();
        let tags = StructuralPath::document("users", 0).field("tags");
        shell.toggle(&tags);

        shell.load_dataset(
            Dataset::from_json(&json!({
                "users": [{"a": 1, "tags": ["x", "y"]}],
                "logs": [{"a": 3}]
            }))
            .unwrap(),
        );
        assert!(shell.is_expanded(&tags));
    }

    #[test]
    fn test_reload_drops_navigation() {
        let mut shell = loaded();
        let plan = shell.go_to_document("logs", "logs-1");
        let dataset = shell.dataset().cloned().unwrap();

        shell.load_dataset(dataset);
        assert_eq!(shell.highlighted(), None);
        assert_eq!(shell.scroll_due(plan.ticket), None);
        assert!(!shell.clear_due(plan.ticket));
    }
}
