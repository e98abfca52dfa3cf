use crate::expansion::ExpansionStore;
use crate::flat_row::{FlatRow, RowKind};
use crate::highlight::Highlighter;
use crate::model::{StructuralPath, Value, classify};

/// Everything a render pass shares between rows
pub struct RenderContext<'a> {
    pub expansion: &'a ExpansionStore,
    pub highlighter: &'a Highlighter,
    pub document_id: &'a str,
}

impl RenderContext<'_> {
    fn push(&self, rows: &mut Vec<FlatRow>, depth: usize, key: Option<&str>, kind: RowKind) {
        let row_index = rows.len();
        rows.push(FlatRow {
            document_id: Some(self.document_id.to_string()),
            depth,
            key: key.map(|k| self.highlighter.segments(k)),
            kind,
            resolve_id: None,
            row_index,
        });
    }
}

/// Render one value at `path` into rows
///
/// Compound values produce a toggle row, collapsed unless the store says
/// otherwise, followed by their children one level deeper. Children are
/// only visited when expanded, so collapsed subtrees cost nothing.
pub fn render_value(
    value: &Value,
    path: &StructuralPath,
    depth: usize,
    key: Option<&str>,
    cx: &RenderContext<'_>,
    rows: &mut Vec<FlatRow>,
) {
    match value {
        Value::Array(items) => {
            let expanded = cx.expansion.is_expanded(path);
            cx.push(rows, depth, key, RowKind::Toggle {
                path: path.clone(),
                label: format!("Array[{}]", items.len()),
                expanded,
            });
            if expanded {
                for (i, item) in items.iter().enumerate() {
                    render_value(item, &path.index(i), depth + 1, None, cx, rows);
                }
            }
        }
        Value::Object(fields) => {
            let expanded = cx.expansion.is_expanded(path);
            cx.push(rows, depth, key, RowKind::Toggle {
                path: path.clone(),
                label: "Object".to_string(),
                expanded,
            });
            if expanded {
                for (child_key, child) in fields {
                    render_value(child, &path.field(child_key), depth + 1, Some(child_key), cx, rows);
                }
            }
        }
        Value::Null
        | Value::String(_)
        | Value::Number(_)
        | Value::Boolean(_)
        | Value::Date(_) => {
            let raw = value.text();
            cx.push(rows, depth, key, RowKind::Scalar {
                segments: cx.highlighter.segments(&raw),
                category: classify(value),
                raw,
            });
        }
    }
}

/// Render a value on its own, outside any document
#[allow(dead_code)]
pub fn render(
    value: &Value,
    path: &StructuralPath,
    depth: usize,
    query: &str,
    expansion: &ExpansionStore,
) -> Vec<FlatRow> {
    let highlighter = Highlighter::new(query);
    let document_id = crate::model::document_id(path.collection(), path.document_index());
    let cx = RenderContext {
        expansion,
        highlighter: &highlighter,
        document_id: &document_id,
    };
    let mut rows = Vec::new();
    render_value(value, path, depth, None, &cx, &mut rows);
    rows
}
