//! Integration tests for the migration endpoints.
//!
//! Each test drives the full router (middleware included) against an
//! in-memory world, covering the real run, the dry-run preview, the
//! concurrency guard, and upstream failures.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, post};
use mediashift_core::world::Collection;
use mediashift_world::{FixedAssetProbe, MemoryWorldStore, WorldStore};
use serde_json::json;

/// A small world: one actor with an embedded item, one world item, one
/// journal entry, and one scene with a placed token.
fn seeded_store() -> Arc<MemoryWorldStore> {
    let store = MemoryWorldStore::new();
    store.seed(
        Collection::Actors,
        vec![json!({
            "_id": "a1",
            "name": "Hero",
            "img": "portraits/hero.png",
            "items": [ { "_id": "i1", "img": "icons/sword.jpg" } ],
        })],
    );
    store.seed(
        Collection::Items,
        vec![json!({ "_id": "i9", "img": "icons/shield.png" })],
    );
    store.seed(
        Collection::Journal,
        vec![json!({ "_id": "j1", "img": "handouts/map.jpg" })],
    );
    store.seed(
        Collection::Scenes,
        vec![json!({
            "_id": "s1",
            "background": { "src": "maps/cave.jpg" },
            "tokens": [ { "_id": "t1", "texture": { "src": "tokens/goblin.png" } } ],
        })],
    );
    Arc::new(store)
}

/// A probe that knows the WebP sibling of every seeded reference.
fn full_probe() -> Arc<FixedAssetProbe> {
    Arc::new(FixedAssetProbe::with_existing([
        "portraits/hero.webp",
        "icons/sword.webp",
        "icons/shield.webp",
        "handouts/map.webp",
        "maps/cave.webp",
        "tokens/goblin.webp",
    ]))
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/migration/run rewrites references and reports tallies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_rewrites_references_and_reports_tallies() {
    let store = seeded_store();
    let app = common::build_test_app(common::test_state(Arc::clone(&store), full_probe()));

    let response = post(app, "/api/v1/migration/run").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let stats = &json["data"]["stats"];
    assert_eq!(stats["actors"], 1);
    assert_eq!(stats["items"], 2);
    assert_eq!(stats["journals"], 1);
    assert_eq!(stats["scenes"], 1);
    assert_eq!(stats["tokens"], 1);
    assert_eq!(stats["total_images"], 6);
    assert_eq!(stats["errors"], 0);

    assert_eq!(json["data"]["entities_total"], 4);
    assert_eq!(json["data"]["entities_processed"], 4);
    assert_eq!(json["data"]["cancelled"], false);
    assert!(json["data"]["summary"]
        .as_str()
        .unwrap()
        .contains("6 images converted to WebP"));

    // The store now holds the rewritten references.
    let actors = store.actors().await.unwrap();
    assert_eq!(actors[0].img.as_deref(), Some("portraits/hero.webp"));
    assert_eq!(actors[0].items[0].img.as_deref(), Some("icons/sword.webp"));

    let scenes = store.scenes().await.unwrap();
    assert_eq!(scenes[0].background_src(), Some("maps/cave.webp"));
    assert_eq!(scenes[0].tokens[0].texture_src(), Some("tokens/goblin.webp"));

    assert_eq!(store.update_count(), 6);
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/migration/preview plans changes without writing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preview_plans_changes_without_writing() {
    let store = seeded_store();
    let app = common::build_test_app(common::test_state(Arc::clone(&store), full_probe()));

    let response = post(app, "/api/v1/migration/preview").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["stats"]["total_images"], 6);

    let planned = json["data"]["planned_changes"].as_array().unwrap();
    assert_eq!(planned.len(), 6);

    // Nothing reached the real store.
    assert_eq!(store.update_count(), 0);
    let actors = store.actors().await.unwrap();
    assert_eq!(actors[0].img.as_deref(), Some("portraits/hero.png"));
}

// ---------------------------------------------------------------------------
// Test: concurrent runs are rejected with 409
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_runs_are_rejected_with_a_conflict() {
    let state = common::test_state(seeded_store(), full_probe());
    let app = common::build_test_app(state.clone());

    // Hold the run guard as an in-flight run would.
    let _guard = Arc::clone(&state.run_guard).try_lock_owned().unwrap();

    let response = post(app.clone(), "/api/v1/migration/run").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    // The preview shares the same guard.
    let response = post(app, "/api/v1/migration/preview").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: the guard is released between runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn the_guard_is_released_between_runs() {
    let store = seeded_store();
    let app = common::build_test_app(common::test_state(Arc::clone(&store), full_probe()));

    let first = post(app.clone(), "/api/v1/migration/run").await;
    assert_eq!(first.status(), StatusCode::OK);

    // A second run starts fine and finds nothing left to rewrite.
    let second = post(app, "/api/v1/migration/run").await;
    assert_eq!(second.status(), StatusCode::OK);

    let json = body_json(second).await;
    assert_eq!(json["data"]["stats"]["total_images"], 0);
    assert_eq!(json["data"]["stats"]["actors"], 0);
}

// ---------------------------------------------------------------------------
// Test: an unreachable world answers 502
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_world_answers_bad_gateway() {
    let app = common::build_test_app(common::test_state(
        Arc::new(MemoryWorldStore::unavailable()),
        Arc::new(FixedAssetProbe::empty()),
    ));

    let response = post(app, "/api/v1/migration/run").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "WORLD_API_ERROR");
    assert!(json["error"].as_str().unwrap().contains("503"));
}
