//! End-of-run report.

use mediashift_core::stats::MigrationStats;
use mediashift_core::types::{RunId, Timestamp};
use serde::Serialize;

/// Outcome of one migration run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// Identifier of the run.
    pub run_id: RunId,
    /// When traversal started (after all listings succeeded).
    pub started_at: Timestamp,
    /// When the run finished.
    pub finished_at: Timestamp,
    /// Top-level entities enumerated across all four collections.
    pub entities_total: u64,
    /// Top-level entities actually processed; less than `entities_total`
    /// only when the run was cancelled.
    pub entities_processed: u64,
    /// Whether the run stopped early at a cancellation boundary.
    pub cancelled: bool,
    /// Final counters.
    pub stats: MigrationStats,
}

impl MigrationReport {
    /// Human-readable tally of the run.
    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
