//! Request types for the re-index endpoint.

use resource_processor_shared::ChallengeId;
use serde::Serialize;

/// Body of the re-index call: `{"param": {"challengeIds": [...]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReindexRequest {
    pub param: ReindexParam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReindexParam {
    pub challenge_ids: Vec<ChallengeId>,
}

impl ReindexRequest {
    /// A request for exactly one challenge.
    pub fn single(challenge_id: ChallengeId) -> Self {
        Self {
            param: ReindexParam {
                challenge_ids: vec![challenge_id],
            },
        }
    }
}
