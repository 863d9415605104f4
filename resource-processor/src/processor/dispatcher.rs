//! Message dispatcher.
//!
//! Reads `payload.type`, picks the matching message kind and runs the kind's
//! validation before handing the envelope to the [`ResourceHandler`].

use serde_json::Value;

use resource_processor_shared::{ChallengeId, MessageKind, UnknownMessageKind};

use crate::errors::ProcessingError;
use crate::processor::ResourceHandler;

/// Determine the kind of a decoded message from its `payload.type`.
///
/// An absent or falsy type (null, `""`, `false`, `0`) is
/// [`ProcessingError::MissingType`]; any other
/// value that is not a known kind is [`ProcessingError::UnknownType`].
pub fn message_kind(message: &Value) -> Result<MessageKind, ProcessingError> {
    match message.pointer("/payload/type") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(ProcessingError::MissingType),
        Some(Value::String(kind)) if kind.is_empty() => Err(ProcessingError::MissingType),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(ProcessingError::MissingType),
        Some(Value::String(kind)) => Ok(kind.parse()?),
        Some(other) => Err(UnknownMessageKind(other.to_string()).into()),
    }
}

/// Routes messages to the per-kind operations.
#[derive(Clone)]
pub struct Dispatcher {
    handler: ResourceHandler,
}

impl Dispatcher {
    pub fn new(handler: ResourceHandler) -> Self {
        Self { handler }
    }

    /// Classify, validate and handle a decoded message.
    ///
    /// Returns the re-indexed challenge id.
    pub async fn dispatch(&self, message: &Value) -> Result<ChallengeId, ProcessingError> {
        let kind = message_kind(message)?;

        match kind {
            MessageKind::AddResource => self.add_resource(message).await,
            MessageKind::RemoveResource => self.remove_resource(message).await,
            MessageKind::UserRegistration => self.register_user(message).await,
            MessageKind::UserUnregistration => self.unregister_user(message).await,
        }
    }

    /// Handle an `ADD_RESOURCE` message.
    pub async fn add_resource(&self, message: &Value) -> Result<ChallengeId, ProcessingError> {
        self.handle(MessageKind::AddResource, message).await
    }

    /// Handle a `REMOVE_RESOURCE` message.
    pub async fn remove_resource(&self, message: &Value) -> Result<ChallengeId, ProcessingError> {
        self.handle(MessageKind::RemoveResource, message).await
    }

    /// Handle a `USER_REGISTRATION` message.
    pub async fn register_user(&self, message: &Value) -> Result<ChallengeId, ProcessingError> {
        self.handle(MessageKind::UserRegistration, message).await
    }

    /// Handle a `USER_UNREGISTRATION` message.
    pub async fn unregister_user(&self, message: &Value) -> Result<ChallengeId, ProcessingError> {
        self.handle(MessageKind::UserUnregistration, message).await
    }

    async fn handle(
        &self,
        kind: MessageKind,
        message: &Value,
    ) -> Result<ChallengeId, ProcessingError> {
        let envelope = kind.validate(message)?;
        Ok(self.handler.handle(&envelope).await?)
    }
}
