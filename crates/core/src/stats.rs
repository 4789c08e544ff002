//! Per-run migration counters.
//!
//! One [`MigrationStats`] value is owned by each migration run: it starts
//! at zero, is threaded mutably through the traversal, and is read once at
//! the end for the summary. Nothing is persisted between runs.

use serde::{Deserialize, Serialize};

/// Counters accumulated over a single migration run.
///
/// Category counters record documents whose own fields were updated. A
/// token update never marks the owning scene; tokens are tallied
/// separately. `total_images` counts references resolved to an existing
/// WebP sibling, whether or not the follow-up update was accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStats {
    /// Actors with at least one persisted field change.
    pub actors: u64,
    /// Items (world-level or embedded) with at least one persisted change.
    pub items: u64,
    /// Journal entries whose image was rewritten.
    pub journals: u64,
    /// Scenes whose background image was rewritten.
    pub scenes: u64,
    /// Placed tokens whose texture was rewritten.
    pub tokens: u64,
    /// References resolved to an existing WebP sibling.
    pub total_images: u64,
    /// Document updates rejected by the world store.
    pub errors: u64,
}

impl MigrationStats {
    /// Whether the run changed any document at all.
    pub fn has_changes(&self) -> bool {
        self.actors + self.items + self.journals + self.scenes + self.tokens > 0
    }

    /// Human-readable tally for the end-of-run report.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Updated {} actors, {} items, {} journal entries, {} scenes, {} tokens; {} images converted to WebP",
            self.actors, self.items, self.journals, self.scenes, self.tokens, self.total_images
        );
        if self.errors > 0 {
            summary.push_str(&format!(" ({} updates rejected)", self.errors));
        }
        summary
    }
}
