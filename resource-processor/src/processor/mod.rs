//! Processor module for the resource processor.
//!
//! Classifies decoded messages by kind, validates them and triggers the re-index.

mod dispatcher;
mod resource_handler;

pub use dispatcher::{message_kind, Dispatcher};
pub use resource_handler::ResourceHandler;
