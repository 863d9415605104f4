//! Error types for the resource processor repository.

mod reindex_error;

pub use reindex_error::ReindexError;
