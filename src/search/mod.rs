//! Ranked symbol and file-name search.
//!
//! [`SearchIndex`] is the immutable BM25 index of one repository;
//! [`IndexRegistry`] holds one per repository id for the life of the process.

pub mod index;
pub mod registry;
pub mod tokenize;

pub use index::{IndexDocument, SearchIndex, SearchPage, SearchResult, FILE_KIND};
pub use registry::IndexRegistry;
pub use tokenize::tokenize;
