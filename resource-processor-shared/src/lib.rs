//! # Resource Processor Shared
//!
//! This crate defines the message model consumed by the challenge resource processor
//! and the schema validation that turns a decoded JSON message into a typed [`Envelope`].
//!
//! ## Modules
//!
//! - [`types`]: Envelope, payload variants, message kinds and identifiers
//! - [`validation`]: Per-kind schema validation and violation reporting

pub mod types;
pub mod validation;

pub use types::{
    ChallengeId, Envelope, MessageKind, Payload, RegistrationData, ResourceData,
    ResourceRequest, UnknownMessageKind,
};
pub use validation::{validate_message, Rule, ValidationFailure, Violation};
