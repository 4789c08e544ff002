//! Host-facing access for MediaShift: the world document store and the
//! asset existence probe.
//!
//! - [`store`] — the [`WorldStore`] trait and its error type.
//! - [`http`] — reqwest-backed store against a live world server.
//! - [`probe`] — metadata-only asset existence checks.
//! - [`memory`] — in-memory store backing tests and offline runs.
//! - [`documents`] — serde types mirroring the host's document JSON.

pub mod documents;
pub mod http;
pub mod memory;
pub mod probe;
pub mod store;

pub use documents::{SceneDocument, SceneToken, WorldDocument};
pub use http::HttpWorldStore;
pub use memory::MemoryWorldStore;
pub use probe::{AssetProbe, FixedAssetProbe, HttpAssetProbe, ProbeError};
pub use store::{StoreError, WorldStore};
