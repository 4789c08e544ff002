//! Dry-run support: record what a migration would change without writing.
//!
//! [`DryRunStore`] wraps any [`WorldStore`], forwards listings, and
//! swallows updates, recording each one as a [`PlannedChange`]. Because
//! nothing is written, a preview reports the same changes every time it
//! runs.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;

use mediashift_core::patch::FieldPatch;
use mediashift_core::world::DocRef;
use mediashift_world::{SceneDocument, StoreError, WorldDocument, WorldStore};

/// One update a dry run would have issued.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedChange {
    /// Document the update targets.
    pub doc: DocRef,
    /// The patch that would have been applied.
    pub patch: FieldPatch,
}

/// A recording [`WorldStore`] decorator.
pub struct DryRunStore {
    inner: Arc<dyn WorldStore>,
    planned: Mutex<Vec<PlannedChange>>,
}

impl DryRunStore {
    pub fn new(inner: Arc<dyn WorldStore>) -> Self {
        Self {
            inner,
            planned: Mutex::new(Vec::new()),
        }
    }

    /// Changes recorded so far, in traversal order, clearing the buffer.
    pub fn take_changes(&self) -> Vec<PlannedChange> {
        std::mem::take(&mut *self.planned.lock().expect("dry-run mutex poisoned"))
    }
}

#[async_trait]
impl WorldStore for DryRunStore {
    async fn actors(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.inner.actors().await
    }

    async fn items(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.inner.items().await
    }

    async fn journals(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.inner.journals().await
    }

    async fn scenes(&self) -> Result<Vec<SceneDocument>, StoreError> {
        self.inner.scenes().await
    }

    async fn update(&self, doc: &DocRef, patch: &FieldPatch) -> Result<(), StoreError> {
        self.planned
            .lock()
            .expect("dry-run mutex poisoned")
            .push(PlannedChange {
                doc: doc.clone(),
                patch: patch.clone(),
            });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
