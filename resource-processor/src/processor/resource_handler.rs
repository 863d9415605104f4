//! Resource action handler.
//!
//! Every supported message kind results in the same downstream action: a single
//! re-index of the affected challenge.

use std::sync::Arc;
use tracing::{debug, instrument};

use resource_processor_repository::{ReindexError, ReindexProvider};
use resource_processor_shared::{ChallengeId, Envelope, Payload};

/// Triggers a challenge re-index for a validated envelope.
#[derive(Clone)]
pub struct ResourceHandler {
    provider: Arc<dyn ReindexProvider>,
}

impl ResourceHandler {
    pub fn new(provider: Arc<dyn ReindexProvider>) -> Self {
        Self { provider }
    }

    /// Re-index the challenge the envelope refers to.
    ///
    /// Makes exactly one call to the provider and returns the challenge id on success.
    #[instrument(skip(self, envelope), fields(kind = %envelope.kind()))]
    pub async fn handle(&self, envelope: &Envelope) -> Result<ChallengeId, ReindexError> {
        let challenge_id = envelope.challenge_id();

        match &envelope.payload {
            Payload::AddResource(data) | Payload::RemoveResource(data) => debug!(
                challenge_id = %challenge_id,
                resource_user_id = data.request.resource_user_id,
                role_id = ?data.request.role_id,
                "Re-indexing challenge after resource change"
            ),
            Payload::UserRegistration(data) | Payload::UserUnregistration(data) => debug!(
                challenge_id = %challenge_id,
                user_id = data.user_id,
                "Re-indexing challenge after registration change"
            ),
        }

        self.provider.reindex_challenge(challenge_id).await?;
        Ok(challenge_id)
    }
}
