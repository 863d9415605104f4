//! Challenge identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive integer identifying a challenge.
///
/// This is the only datum forwarded to the re-index endpoint. Construction
/// from the wire goes through schema validation, which guarantees `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(u64);

impl ChallengeId {
    /// Wrap a raw challenge id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ChallengeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
