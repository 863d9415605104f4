//! Interface definitions for the re-index provider.
//!
//! This module defines the abstract `ReindexProvider` trait so the processor can be
//! wired to the HTTP client in production and to in-memory fakes in tests.

mod reindex_provider;

pub use reindex_provider::ReindexProvider;
