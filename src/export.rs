//! Bulk export requests and saving their results.
//!
//! Serialisation happens on the server; the client picks a scope and a
//! format, passes the active collection or search text along, and writes
//! whatever bytes come back to a file the user chooses.

use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    Full,
    Collection,
    Search,
}

impl ExportScope {
    pub const ALL: [ExportScope; 3] = [ExportScope::Full, ExportScope::Collection, ExportScope::Search];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportScope::Full => "full",
            ExportScope::Collection => "collection",
            ExportScope::Search => "search",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportScope::Full => "Full DB",
            ExportScope::Collection => "Current Collection",
            ExportScope::Search => "Search Results",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Bson,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Bson, ExportFormat::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Bson => "bson",
            ExportFormat::Csv => "csv",
        }
    }
}

/// One entry of the export menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub scope: ExportScope,
    pub format: ExportFormat,
}

impl ExportRequest {
    /// Every request the menu offers; search exports only while searching
    pub fn menu(searching: bool) -> Vec<ExportRequest> {
        ExportFormat::ALL
            .iter()
            .flat_map(|&format| {
                ExportScope::ALL
                    .iter()
                    .filter(move |&&scope| searching || scope != ExportScope::Search)
                    .map(move |&scope| ExportRequest { scope, format })
            })
            .collect()
    }

    /// Query string for `GET /export`
    pub fn query_pairs(&self, active_collection: Option<&str>, search: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("scope", self.scope.as_str().to_string()),
            ("format", self.format.as_str().to_string()),
        ];
        match (self.scope, active_collection) {
            (ExportScope::Collection, Some(collection)) => {
                pairs.push(("collection", collection.to_string()));
            }
            (ExportScope::Search, _) => pairs.push(("search", search.to_string())),
            _ => {}
        }
        pairs
    }

    pub fn file_name(&self) -> String {
        format!("export-{}.{}", self.scope.as_str(), self.format.as_str())
    }

    pub fn label(&self) -> String {
        format!("{} → {}", self.scope.label(), self.format.as_str().to_uppercase())
    }
}

/// Ask where to save and write the export there; None if the user cancelled
pub async fn save_export(bytes: Vec<u8>, file_name: String) -> Result<Option<PathBuf>> {
    let file = rfd::AsyncFileDialog::new()
        .set_title("Save Export")
        .set_file_name(&file_name)
        .save_file()
        .await;

    let Some(file) = file else {
        return Ok(None);
    };
    let path = file.path().to_path_buf();
    tokio::fs::write(&path, bytes).await?;
    Ok(Some(path))
}
