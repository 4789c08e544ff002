use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use mediashift_events::EventBus;
use mediashift_world::{AssetProbe, WorldStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// World document store the migration reads and writes through.
    pub store: Arc<dyn WorldStore>,
    /// Asset existence probe.
    pub probe: Arc<dyn AssetProbe>,
    /// Event bus carrying migration progress.
    pub bus: Arc<EventBus>,
    /// Held for the duration of a run or preview. The walker itself does
    /// not defend against concurrent runs; a second trigger while one is
    /// in flight is answered with 409 instead of racing it.
    pub run_guard: Arc<Mutex<()>>,
    /// Cancelled when the server shuts down; an in-flight run stops at the
    /// next entity boundary.
    pub shutdown: CancellationToken,
}
