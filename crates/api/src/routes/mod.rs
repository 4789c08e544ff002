pub mod health;
pub mod migration;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /migration/run       rewrite eligible image references (POST)
/// /migration/preview   dry run, report planned changes (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/migration", migration::router())
}
