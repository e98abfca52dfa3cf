//! FlatRow and related types for virtual scrolling.
//!
//! Pre-computed row data for efficient rendering of a collection.

use iced::Color;

use crate::highlight::Segment;
use crate::model::{Category, StructuralPath};
use crate::theme::ThemeColors;

/// Virtual scrolling constants
pub const ROW_HEIGHT: f32 = 22.0;      // Fixed height per row
pub const BUFFER_ROWS: usize = 5;      // Extra rows above/below
pub const INDENT_WIDTH: f32 = 12.0;    // Horizontal step per depth level

/// Get the appropriate color for a value category given a theme
pub fn category_color(category: Category, colors: &ThemeColors) -> Color {
    match category {
        Category::Null => colors.values.null,
        Category::String => colors.values.string,
        Category::Number => colors.values.number,
        Category::Boolean => colors.values.boolean,
        Category::Date => colors.values.date,
        Category::Other => colors.text_primary,
    }
}

/// What a row shows
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    /// "Document #n" with the per-document actions
    DocumentHeader { collection: String, index: usize },
    /// Collapsible array or object
    Toggle {
        path: StructuralPath,
        label: String,
        expanded: bool,
    },
    /// Leaf value with its copy affordance
    Scalar {
        segments: Vec<Segment>,
        category: Category,
        /// Text placed on the clipboard, verbatim
        raw: String,
    },
    /// Space between documents
    Gap,
    /// Placeholder for an empty collection
    NoDocuments,
}

/// A flattened row ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    /// Composite id of the owning document (None for placeholder rows)
    pub document_id: Option<String>,
    /// Indent level
    pub depth: usize,
    /// Field name, already split for highlighting
    pub key: Option<Vec<Segment>>,
    pub kind: RowKind,
    /// Id to offer name resolution for, if this row is a resolvable field
    pub resolve_id: Option<String>,
    /// Row index in flattened list
    pub row_index: usize,
}

impl FlatRow {
    #[cfg(test)]
    pub fn is_toggle(&self) -> bool {
        matches!(self.kind, RowKind::Toggle { .. })
    }

    /// Path of the toggle on this row, if any
    #[cfg(test)]
    pub fn toggle_path(&self) -> Option<&StructuralPath> {
        match &self.kind {
            RowKind::Toggle { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Key text without highlighting
    pub fn key_text(&self) -> Option<String> {
        self.key
            .as_ref()
            .map(|segments| segments.iter().map(Segment::text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{AppTheme, get_theme_colors};

    #[test]
    fn test_category_colors_distinct() {
        let colors = get_theme_colors(AppTheme::Dark);
        assert_ne!(category_color(Category::String, &colors), category_color(Category::Number, &colors));
        assert_ne!(category_color(Category::Date, &colors), category_color(Category::Null, &colors));
    }

    #[test]
    fn test_key_text_joins_segments() {
        let row = FlatRow {
            document_id: Some("c-0".to_string()),
            depth: 1,
            key: Some(vec![Segment::Plain("na".to_string()), Segment::Match("me".to_string())]),
            kind: RowKind::Gap,
            resolve_id: None,
            row_index: 0,
        };
        assert_eq!(row.key_text(), Some("name".to_string()));
        assert!(!row.is_toggle());
        assert!(row.toggle_path().is_none());
    }
}
