//! This module defines the core data structures shared across the resource processor.
//! It re-exports the envelope, payload and identifier types.

pub mod challenge_id;
pub mod envelope;
pub mod message_kind;

pub use challenge_id::ChallengeId;
pub use envelope::{Envelope, Payload, RegistrationData, ResourceData, ResourceRequest};
pub use message_kind::{MessageKind, UnknownMessageKind};
