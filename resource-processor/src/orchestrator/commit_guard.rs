//! Commits a message's offset when dropped.

use tracing::error;

use crate::consumer::{Consumer, MessagePosition};
use crate::orchestrator::ProcessingStats;

/// Commits `position` on drop, whatever happened to the message in between.
pub(crate) struct CommitGuard<'a> {
    consumer: &'a dyn Consumer,
    position: &'a MessagePosition,
    stats: &'a ProcessingStats,
}

impl<'a> CommitGuard<'a> {
    pub(crate) fn new(
        consumer: &'a dyn Consumer,
        position: &'a MessagePosition,
        stats: &'a ProcessingStats,
    ) -> Self {
        Self {
            consumer,
            position,
            stats,
        }
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.consumer.commit(self.position) {
            self.stats.record_commit_failure();
            error!(
                topic = %self.position.topic,
                partition = self.position.partition,
                offset = self.position.offset,
                error = %e,
                "Failed to commit offset"
            );
        }
    }
}
