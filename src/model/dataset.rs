use serde_json::Value as JsonValue;

use super::value::Value;
use crate::error::{ApiError, Result};

/// One document: its top-level fields in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Document { fields }
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Compact JSON in field order; what search matches against
    pub fn canonical_text(&self) -> String {
        self.to_json().to_string()
    }

    /// Two-space indented JSON, for "Copy Document"
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_json()).unwrap_or_else(|_| self.canonical_text())
    }
}

/// A named, ordered group of documents
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub name: String,
    pub documents: Vec<Document>,
}

/// Snapshot of the whole database, collections in server order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    collections: Vec<Collection>,
}

impl Dataset {
    pub fn new(collections: Vec<Collection>) -> Self {
        Dataset { collections }
    }

    /// Decode the `/data` payload: `{ "<collection>": [ {..}, .. ], .. }`
    pub fn from_json(json: &JsonValue) -> Result<Dataset> {
        let JsonValue::Object(map) = json else {
            return Err(ApiError::Decode("expected an object of collections".to_string()));
        };

        let mut collections = Vec::with_capacity(map.len());
        for (name, docs) in map {
            let JsonValue::Array(docs) = docs else {
                return Err(ApiError::Decode(format!("collection '{}' is not an array", name)));
            };
            let mut documents = Vec::with_capacity(docs.len());
            for (index, doc) in docs.iter().enumerate() {
                let JsonValue::Object(fields) = doc else {
                    return Err(ApiError::Decode(format!(
                        "document {} of '{}' is not an object",
                        index, name
                    )));
                };
                documents.push(Document::new(
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::from_json(v)))
                        .collect(),
                ));
            }
            collections.push(Collection {
                name: name.clone(),
                documents,
            });
        }

        Ok(Dataset::new(collections))
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn document(&self, collection: &str, index: usize) -> Option<&Document> {
        self.collection(collection)?.documents.get(index)
    }

    pub fn first_collection(&self) -> Option<&str> {
        self.collections.first().map(|c| c.name.as_str())
    }

    pub fn document_count(&self) -> usize {
        self.collections.iter().map(|c| c.documents.len()).sum()
    }
}
