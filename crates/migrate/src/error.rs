//! Migration run errors.

use mediashift_world::StoreError;

/// A failure that prevents a migration run from starting.
///
/// Once traversal has begun there are no fatal errors: probe failures
/// leave the reference unchanged and rejected updates are counted, so the
/// run always finishes and reports.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Listing the world's collections failed; nothing was touched.
    #[error("world store unavailable: {0}")]
    Store(#[from] StoreError),
}
