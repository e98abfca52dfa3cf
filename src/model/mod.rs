pub mod dataset;
pub mod path;
pub mod value;

pub use dataset::{Collection, Dataset, Document};
pub use path::{StructuralPath, document_id};
pub use value::{Category, Value, classify};
