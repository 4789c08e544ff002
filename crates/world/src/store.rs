//! The world document store interface.

use async_trait::async_trait;
use mediashift_core::patch::FieldPatch;
use mediashift_core::world::DocRef;

use crate::documents::{SceneDocument, WorldDocument};

/// Errors from the world store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The world server answered with a non-success status.
    #[error("world API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Access to the world server's document collections.
///
/// Listings return fully deserialized documents, embedded children
/// included. Updates are partial, keyed by dotted field path, and have
/// settled on the host by the time the call returns.
#[async_trait]
pub trait WorldStore: Send + Sync {
    /// All actors, with their embedded items.
    async fn actors(&self) -> Result<Vec<WorldDocument>, StoreError>;

    /// All world-level items.
    async fn items(&self) -> Result<Vec<WorldDocument>, StoreError>;

    /// All journal entries.
    async fn journals(&self) -> Result<Vec<WorldDocument>, StoreError>;

    /// All scenes, with their placed tokens.
    async fn scenes(&self) -> Result<Vec<SceneDocument>, StoreError>;

    /// Apply a partial update to one document.
    async fn update(&self, doc: &DocRef, patch: &FieldPatch) -> Result<(), StoreError>;
}
