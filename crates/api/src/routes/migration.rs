use axum::routing::post;
use axum::Router;

use crate::handlers::migration;
use crate::state::AppState;

/// Media migration routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/run", post(migration::run_migration))
        .route("/preview", post(migration::preview_migration))
}
