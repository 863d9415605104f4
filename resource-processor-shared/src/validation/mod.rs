//! Schema validation for inbound messages.
//!
//! Each [`MessageKind`](crate::MessageKind) has a fixed schema. Validation walks the
//! decoded JSON, records every [`Violation`] it finds and, if there are none, builds
//! a typed [`Envelope`](crate::Envelope). Unknown fields are ignored at every level.

mod reader;
mod schema;
mod violation;

pub use schema::validate_message;
pub use violation::{Rule, ValidationFailure, Violation};
