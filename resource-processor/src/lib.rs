//! # Resource Processor
//!
//! Consumes challenge resource and registration events from Kafka and triggers a
//! re-index of the affected challenge through the ES feeder service.
//!
//! ## Architecture
//!
//! The processor follows the Consumer-Dispatcher-Handler pattern:
//!
//! 1. **Consumer**: Receives raw message batches from Kafka and commits offsets
//! 2. **Dispatcher**: Classifies a decoded message by `payload.type` and validates it
//! 3. **Handler**: Extracts the challenge id and calls the re-index provider
//! 4. **Orchestrator**: Runs the per-message pipeline and commits every message
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`consumer`]: Kafka consumer and the `Consumer` seam
//! - [`processor`]: Dispatcher and resource action handler
//! - [`orchestrator`]: The consumption loop
//! - [`health`]: Health check endpoint
//! - [`errors`]: Error types for the processor

pub mod config;
pub mod consumer;
pub mod errors;
pub mod health;
pub mod orchestrator;
pub mod processor;

pub use config::{Dependencies, Settings};
pub use errors::{IngestError, ProcessingError};

use thiserror::Error;

/// Errors that can occur during processor initialization or execution.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl ProcessorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
