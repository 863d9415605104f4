//! Payload type discriminator.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::Envelope;
use crate::validation::{validate_message, ValidationFailure};

/// The value of `payload.type` that selects a schema and a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// A resource (role) was added to a challenge.
    AddResource,
    /// A resource (role) was removed from a challenge.
    RemoveResource,
    /// A user registered for a challenge.
    UserRegistration,
    /// A user unregistered from a challenge.
    UserUnregistration,
}

/// Returned when `payload.type` holds a value outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid payload type: {0}")]
pub struct UnknownMessageKind(pub String);

impl MessageKind {
    /// Every known kind, in declaration order.
    pub const ALL: [MessageKind; 4] = [
        MessageKind::AddResource,
        MessageKind::RemoveResource,
        MessageKind::UserRegistration,
        MessageKind::UserUnregistration,
    ];

    /// The wire literal for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::AddResource => "ADD_RESOURCE",
            MessageKind::RemoveResource => "REMOVE_RESOURCE",
            MessageKind::UserRegistration => "USER_REGISTRATION",
            MessageKind::UserUnregistration => "USER_UNREGISTRATION",
        }
    }

    /// Key under `payload` that carries the business data.
    ///
    /// Unregistration messages are published with `detail` instead of `data`.
    pub fn data_key(&self) -> &'static str {
        match self {
            MessageKind::UserUnregistration => "detail",
            _ => "data",
        }
    }

    /// Validate a decoded message against this kind's schema.
    pub fn validate(&self, message: &Value) -> Result<Envelope, ValidationFailure> {
        validate_message(*self, message)
    }
}

impl FromStr for MessageKind {
    type Err = UnknownMessageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownMessageKind(s.to_string()))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
