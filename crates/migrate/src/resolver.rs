//! Reference resolution: legacy raster reference to existing WebP sibling.

use std::sync::Arc;

use mediashift_core::asset;
use mediashift_core::stats::MigrationStats;
use mediashift_world::AssetProbe;

/// Decides whether a migrated sibling replaces an image reference.
///
/// The resolver owns the only probe access in a run and touches exactly
/// one counter: `total_images`, incremented once per reference resolved to
/// its WebP sibling.
pub struct PathResolver {
    probe: Arc<dyn AssetProbe>,
}

impl PathResolver {
    pub fn new(probe: Arc<dyn AssetProbe>) -> Self {
        Self { probe }
    }

    /// Resolve one reference.
    ///
    /// Returns the WebP sibling when the probe confirms it exists, and the
    /// original reference in every other case: empty reference, ineligible
    /// extension, sibling missing, or probe transport failure. A failed
    /// probe means no migrated asset is available, never an aborted run.
    pub async fn resolve(&self, reference: &str, stats: &mut MigrationStats) -> String {
        let Some(candidate) = asset::webp_sibling(reference) else {
            return reference.to_string();
        };

        match self.probe.exists(&candidate).await {
            Ok(true) => {
                tracing::debug!(reference, candidate = %candidate, "Found WebP sibling");
                stats.total_images += 1;
                candidate
            }
            Ok(false) => reference.to_string(),
            Err(e) => {
                tracing::debug!(reference, error = %e, "Existence probe failed, keeping original");
                reference.to_string()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
