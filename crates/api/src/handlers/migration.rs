//! Handlers for the media migration endpoints.
//!
//! Provides the one-time WebP reference migration trigger and its dry-run
//! preview. Both serialize through the state's run guard: the walker does
//! not defend against concurrent runs, so the trigger must.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use mediashift_migrate::{DryRunStore, MigrationReport, Migrator, PlannedChange};
use mediashift_world::WorldStore;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response for a completed migration run.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    #[serde(flatten)]
    pub report: MigrationReport,
    /// Human-readable tally of the run.
    pub summary: String,
}

/// Response for a dry-run preview.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub report: MigrationReport,
    /// Human-readable tally of what a real run would do.
    pub summary: String,
    /// Updates a real run would have issued, in traversal order.
    pub planned_changes: Vec<PlannedChange>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /migration/run
///
/// Traverse the world and rewrite every eligible image reference whose
/// WebP sibling exists. Returns the per-category tallies. Answers 409 if a
/// run or preview is already in flight, 502 if the world cannot be listed.
pub async fn run_migration(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let _guard = state
        .run_guard
        .try_lock()
        .map_err(|_| AppError::Conflict("a migration run is already in flight".to_string()))?;

    let migrator = Migrator::new(
        Arc::clone(&state.store),
        Arc::clone(&state.probe),
        Arc::clone(&state.bus),
    );
    let report = migrator.run(state.shutdown.child_token()).await?;
    let summary = report.summary();

    Ok(Json(DataResponse {
        data: RunResponse { report, summary },
    }))
}

/// POST /migration/preview
///
/// The same traversal against a recording store: nothing is written to the
/// world, and the response carries the updates a real run would issue.
pub async fn preview_migration(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let _guard = state
        .run_guard
        .try_lock()
        .map_err(|_| AppError::Conflict("a migration run is already in flight".to_string()))?;

    let recorder = Arc::new(DryRunStore::new(Arc::clone(&state.store)));
    let migrator = Migrator::new(
        Arc::clone(&recorder) as Arc<dyn WorldStore>,
        Arc::clone(&state.probe),
        Arc::clone(&state.bus),
    );
    let report = migrator.run(state.shutdown.child_token()).await?;
    let summary = report.summary();
    let planned_changes = recorder.take_changes();

    Ok(Json(DataResponse {
        data: PreviewResponse {
            report,
            summary,
            planned_changes,
        },
    }))
}
