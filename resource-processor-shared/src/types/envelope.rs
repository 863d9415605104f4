//! Envelope and payload types.
//!
//! An [`Envelope`] only exists after a message passed schema validation, so every
//! field here is already known to be present and in range.

use chrono::{DateTime, Utc};

use crate::types::{ChallengeId, MessageKind};

/// A validated message read from the resource or registration topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Topic the producer declared; checked against the delivery topic before validation.
    pub topic: String,
    /// Service that produced the message.
    pub originator: String,
    /// Producer timestamp, normalised to UTC.
    pub timestamp: DateTime<Utc>,
    /// Declared content type of the payload.
    pub mime_type: String,
    /// The business content.
    pub payload: Payload,
}

impl Envelope {
    /// The kind of payload carried.
    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// The challenge the message refers to.
    pub fn challenge_id(&self) -> ChallengeId {
        self.payload.challenge_id()
    }
}

/// Payload variants, one per [`MessageKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// `ADD_RESOURCE`, read from `payload.data`.
    AddResource(ResourceData),
    /// `REMOVE_RESOURCE`, read from `payload.data`.
    RemoveResource(ResourceData),
    /// `USER_REGISTRATION`, read from `payload.data`.
    UserRegistration(RegistrationData),
    /// `USER_UNREGISTRATION`, read from `payload.detail`.
    UserUnregistration(RegistrationData),
}

impl Payload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::AddResource(_) => MessageKind::AddResource,
            Payload::RemoveResource(_) => MessageKind::RemoveResource,
            Payload::UserRegistration(_) => MessageKind::UserRegistration,
            Payload::UserUnregistration(_) => MessageKind::UserUnregistration,
        }
    }

    pub fn challenge_id(&self) -> ChallengeId {
        match self {
            Payload::AddResource(data) | Payload::RemoveResource(data) => data.challenge_id,
            Payload::UserRegistration(data) | Payload::UserUnregistration(data) => {
                data.challenge_id
            }
        }
    }
}

/// Body of resource add/remove messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceData {
    pub challenge_id: ChallengeId,
    pub request: ResourceRequest,
}

/// The resource request that was applied to the challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub resource_user_id: u64,
    pub role_id: Option<u64>,
    pub phase_id: Option<u64>,
    pub add_notification: Option<bool>,
    pub add_forum_watch: Option<bool>,
    pub check_term: Option<bool>,
    pub studio: Option<bool>,
}

/// Body of registration and unregistration messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationData {
    pub challenge_id: ChallengeId,
    pub user_id: u64,
}
