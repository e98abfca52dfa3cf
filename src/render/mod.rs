//! Turning documents into flat rows.
//!
//! `value` renders a single value recursively, `document` lays out one
//! document's fields, `collection` renders the active collection and owns
//! its scroll anchors.

pub mod collection;
pub mod document;
pub mod value;

pub use collection::CollectionView;
