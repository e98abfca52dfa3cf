//! Expanded/collapsed state of compound nodes, keyed by structural path.
//!
//! One store lives for the whole viewer session, so expansion survives
//! switching collections and re-rendering after a search change.

use std::collections::HashMap;

use crate::model::{StructuralPath, Value};

#[derive(Debug, Default, Clone)]
pub struct ExpansionStore {
    expanded: HashMap<StructuralPath, bool>,
}

impl ExpansionStore {
    /// Absent paths are collapsed
    pub fn is_expanded(&self, path: &StructuralPath) -> bool {
        self.expanded.get(path).copied().unwrap_or(false)
    }

    /// Flip a path and return its new state
    pub fn toggle(&mut self, path: &StructuralPath) -> bool {
        let state = self.expanded.entry(path.clone()).or_insert(false);
        *state = !*state;
        *state
    }

    pub fn set(&mut self, path: &StructuralPath, expanded: bool) {
        self.expanded.insert(path.clone(), expanded);
    }

    /// Expand a node and every compound node below it
    pub fn expand_subtree(&mut self, path: &StructuralPath, value: &Value) {
        match value {
            Value::Array(items) => {
                self.set(path, true);
                for (i, item) in items.iter().enumerate() {
                    self.expand_subtree(&path.index(i), item);
                }
            }
            Value::Object(fields) => {
                self.set(path, true);
                for (key, child) in fields {
                    self.expand_subtree(&path.field(key), child);
                }
            }
            Value::Null
            | Value::String(_)
            | Value::Number(_)
            | Value::Boolean(_)
            | Value::Date(_) => {}
        }
    }

    /// Keep only the paths `keep` accepts
    pub fn retain(&mut self, mut keep: impl FnMut(&StructuralPath) -> bool) {
        self.expanded.retain(|path, _| keep(path));
    }

    /// Forget the state of `prefix` and everything below it
    pub fn collapse_subtree(&mut self, prefix: &StructuralPath) {
        self.expanded.retain(|path, _| !path.starts_with(prefix));
    }
}
