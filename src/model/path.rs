//! Structural addresses of value nodes.
//!
//! A path is `collection`, `document index`, then one segment per descent.
//! Equality and hashing are structural, and the string form escapes
//! separators so two different paths never print the same.

use std::fmt;

/// One step down the value tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descent into an object field
    Field(String),
    /// Descent into an array element
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralPath {
    collection: String,
    document: usize,
    segments: Vec<PathSegment>,
}

impl StructuralPath {
    /// Path of a document's root
    pub fn document(collection: &str, document: usize) -> Self {
        StructuralPath {
            collection: collection.to_string(),
            document,
            segments: Vec::new(),
        }
    }

    /// Path of a field below this node
    pub fn field(&self, name: &str) -> Self {
        self.child(PathSegment::Field(name.to_string()))
    }

    /// Path of an array element below this node
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        StructuralPath {
            collection: self.collection.clone(),
            document: self.document,
            segments,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn document_index(&self) -> usize {
        self.document
    }

    /// True if `prefix` is this path or one of its ancestors
    pub fn starts_with(&self, prefix: &StructuralPath) -> bool {
        self.collection == prefix.collection
            && self.document == prefix.document
            && self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", escape_name(&self.collection), self.document)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", escape_name(name))?,
                PathSegment::Index(index) => write!(f, "-{}", index)?,
            }
        }
        Ok(())
    }
}

/// Escape the separator characters of a name (`~` first, then `.` and `-`)
pub fn escape_name(name: &str) -> String {
    name.replace('~', "~0").replace('.', "~1").replace('-', "~2")
}

/// Composite identity of a document within the dataset
pub fn document_id(collection: &str, index: usize) -> String {
    format!("{}-{}", collection, index)
}
