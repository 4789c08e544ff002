//! World traversal: applies the resolver to every image-bearing field,
//! persists rewritten references, and accumulates per-category counters.
//!
//! Traversal is strictly sequential. At most one probe or document update
//! is outstanding at any time, and a top-level entity fully settles before
//! the next one starts, so progress notifications arrive in traversal
//! order with a strictly increasing position.

use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use mediashift_core::patch::{
    FieldPatch, FIELD_BACKGROUND_SRC, FIELD_IMG, FIELD_PROTOTYPE_TOKEN_TEXTURE,
    FIELD_TOKEN_TEXTURE,
};
use mediashift_core::stats::MigrationStats;
use mediashift_core::types::RunId;
use mediashift_core::world::{Collection, DocRef, EmbeddedCollection};
use mediashift_events::{EventBus, EventKind, MigrationEvent};
use mediashift_world::{AssetProbe, SceneDocument, WorldDocument, WorldStore};

use crate::error::MigrationError;
use crate::report::MigrationReport;
use crate::resolver::PathResolver;

// ---------------------------------------------------------------------------
// Visit outcome
// ---------------------------------------------------------------------------

/// What a document visit found and did.
#[derive(Debug, Default, Clone, Copy)]
struct VisitOutcome {
    /// The document's own fields were rewritten and persisted.
    own_changed: bool,
    /// Descendant documents, at any depth, whose own fields were rewritten
    /// and persisted.
    changed_descendants: u64,
}

// ---------------------------------------------------------------------------
// Migrator
// ---------------------------------------------------------------------------

/// Walks the world's collections and rewrites image references in place.
///
/// A scene counts as updated only when its own background changed; token
/// rewrites go to the token counter and never mark the owning scene.
/// Likewise an actor counts only for its own fields; a changed embedded
/// item is tallied under items.
pub struct Migrator {
    store: Arc<dyn WorldStore>,
    resolver: PathResolver,
    bus: Arc<EventBus>,
}

impl Migrator {
    pub fn new(
        store: Arc<dyn WorldStore>,
        probe: Arc<dyn AssetProbe>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            resolver: PathResolver::new(probe),
            bus,
        }
    }

    /// Run one full migration pass over the world.
    ///
    /// Lists all four collections first; a listing failure aborts here,
    /// before any counter moves or event is published. After that the run
    /// always completes and reports. `cancel` is honored only between
    /// top-level entities, so no document is left with a partial set of
    /// field updates.
    pub async fn run(&self, cancel: CancellationToken) -> Result<MigrationReport, MigrationError> {
        let run_id = RunId::new_v4();

        let actors = self.store.actors().await?;
        let items = self.store.items().await?;
        let journals = self.store.journals().await?;
        let scenes = self.store.scenes().await?;

        let started_at = Utc::now();
        let entities_total = (actors.len() + items.len() + journals.len() + scenes.len()) as u64;
        tracing::info!(%run_id, entities_total, "Starting media migration run");
        self.bus.publish(MigrationEvent::new(
            run_id,
            EventKind::RunStarted {
                total: entities_total,
            },
        ));

        let mut stats = MigrationStats::default();
        let mut processed: u64 = 0;
        let mut cancelled = false;

        'traversal: {
            for actor in &actors {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'traversal;
                }
                let target = DocRef::top(Collection::Actors, actor.id.clone());
                let outcome = self.visit(actor, target, &mut stats).await;
                if outcome.own_changed {
                    stats.actors += 1;
                }
                stats.items += outcome.changed_descendants;
                processed += 1;
                self.publish_progress(run_id, Collection::Actors, processed, entities_total);
            }

            for item in &items {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'traversal;
                }
                let target = DocRef::top(Collection::Items, item.id.clone());
                let outcome = self.visit(item, target, &mut stats).await;
                if outcome.own_changed {
                    stats.items += 1;
                }
                stats.items += outcome.changed_descendants;
                processed += 1;
                self.publish_progress(run_id, Collection::Items, processed, entities_total);
            }

            for journal in &journals {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'traversal;
                }
                self.visit_journal(journal, &mut stats).await;
                processed += 1;
                self.publish_progress(run_id, Collection::Journal, processed, entities_total);
            }

            for scene in &scenes {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'traversal;
                }
                self.visit_scene(scene, &mut stats).await;
                processed += 1;
                self.publish_progress(run_id, Collection::Scenes, processed, entities_total);
            }
        }

        if cancelled {
            tracing::warn!(
                %run_id,
                processed,
                entities_total,
                "Migration run cancelled at entity boundary"
            );
        }

        let report = MigrationReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            entities_total,
            entities_processed: processed,
            cancelled,
            stats,
        };
        self.bus.publish(MigrationEvent::new(
            run_id,
            EventKind::RunCompleted { stats, cancelled },
        ));
        tracing::info!(%run_id, cancelled, summary = %report.summary(), "Migration run finished");
        Ok(report)
    }

    /// Visit one document and its embedded children.
    ///
    /// Rewrites the primary image and the prototype-token texture, each
    /// under its own field path, then recurses into embedded items. A
    /// rejected update counts one error and skips the document's remaining
    /// own-field updates; children are separate documents and are visited
    /// regardless.
    fn visit<'a>(
        &'a self,
        doc: &'a WorldDocument,
        target: DocRef,
        stats: &'a mut MigrationStats,
    ) -> BoxFuture<'a, VisitOutcome> {
        Box::pin(async move {
            let mut outcome = VisitOutcome::default();
            let mut fields_open = true;

            if let Some(img) = doc.img.as_deref() {
                let resolved = self.resolver.resolve(img, stats).await;
                if resolved != img {
                    match self
                        .store
                        .update(&target, &FieldPatch::single(FIELD_IMG, resolved))
                        .await
                    {
                        Ok(()) => outcome.own_changed = true,
                        Err(e) => {
                            tracing::warn!(doc = %target, error = %e, "Document update rejected");
                            stats.errors += 1;
                            fields_open = false;
                        }
                    }
                }
            }

            if fields_open {
                if let Some(texture) = doc.prototype_texture() {
                    let resolved = self.resolver.resolve(texture, stats).await;
                    if resolved != texture {
                        match self
                            .store
                            .update(
                                &target,
                                &FieldPatch::single(FIELD_PROTOTYPE_TOKEN_TEXTURE, resolved),
                            )
                            .await
                        {
                            Ok(()) => outcome.own_changed = true,
                            Err(e) => {
                                tracing::warn!(doc = %target, error = %e, "Document update rejected");
                                stats.errors += 1;
                            }
                        }
                    }
                }
            }

            for child in &doc.items {
                let child_target = target.child(EmbeddedCollection::Items, child.id.clone());
                let child_outcome = self.visit(child, child_target, stats).await;
                if child_outcome.own_changed {
                    outcome.changed_descendants += 1;
                }
                outcome.changed_descendants += child_outcome.changed_descendants;
            }

            outcome
        })
    }

    /// Journal entries carry only a primary image.
    async fn visit_journal(&self, journal: &WorldDocument, stats: &mut MigrationStats) {
        let Some(img) = journal.img.as_deref() else {
            return;
        };
        let resolved = self.resolver.resolve(img, stats).await;
        if resolved == img {
            return;
        }
        let target = DocRef::top(Collection::Journal, journal.id.clone());
        match self
            .store
            .update(&target, &FieldPatch::single(FIELD_IMG, resolved))
            .await
        {
            Ok(()) => stats.journals += 1,
            Err(e) => {
                tracing::warn!(doc = %target, error = %e, "Document update rejected");
                stats.errors += 1;
            }
        }
    }

    /// Scenes: the background image, then every placed token's texture.
    ///
    /// Each token is its own document with its own update; a rejected token
    /// update does not stop the remaining tokens.
    async fn visit_scene(&self, scene: &SceneDocument, stats: &mut MigrationStats) {
        let target = DocRef::top(Collection::Scenes, scene.id.clone());

        if let Some(src) = scene.background_src() {
            let resolved = self.resolver.resolve(src, stats).await;
            if resolved != src {
                match self
                    .store
                    .update(&target, &FieldPatch::single(FIELD_BACKGROUND_SRC, resolved))
                    .await
                {
                    Ok(()) => stats.scenes += 1,
                    Err(e) => {
                        tracing::warn!(doc = %target, error = %e, "Document update rejected");
                        stats.errors += 1;
                    }
                }
            }
        }

        for token in &scene.tokens {
            let Some(src) = token.texture_src() else {
                continue;
            };
            let resolved = self.resolver.resolve(src, stats).await;
            if resolved == src {
                continue;
            }
            let token_target = target.child(EmbeddedCollection::Tokens, token.id.clone());
            match self
                .store
                .update(&token_target, &FieldPatch::single(FIELD_TOKEN_TEXTURE, resolved))
                .await
            {
                Ok(()) => stats.tokens += 1,
                Err(e) => {
                    tracing::warn!(doc = %token_target, error = %e, "Document update rejected");
                    stats.errors += 1;
                }
            }
        }
    }

    /// Publish the after-entity progress notification. Delivery is
    /// fire-and-forget; the bus ignores missing subscribers.
    fn publish_progress(&self, run_id: RunId, collection: Collection, current: u64, total: u64) {
        self.bus.publish(MigrationEvent::new(
            run_id,
            EventKind::EntityProcessed {
                collection,
                current,
                total,
            },
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
