//! In-memory world store.
//!
//! Documents live as raw JSON values, exactly as a host would hold them.
//! Listings deserialize on demand and updates apply dotted-path patches in
//! place, so a second traversal observes the first one's writes. Update
//! failures can be injected per document id, and every accepted update is
//! recorded for inspection.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use mediashift_core::patch::FieldPatch;
use mediashift_core::world::{Collection, DocRef};
use serde_json::Value;

use crate::documents::{SceneDocument, WorldDocument};
use crate::store::{StoreError, WorldStore};

/// One accepted update, as the store received it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRecord {
    pub doc: DocRef,
    pub patch: FieldPatch,
}

/// In-memory [`WorldStore`] backend.
#[derive(Debug, Default)]
pub struct MemoryWorldStore {
    collections: Mutex<Collections>,
    /// Ids whose updates are rejected with a synthetic API error.
    rejecting: Mutex<HashSet<String>>,
    /// Accepted updates, in application order.
    updates: Mutex<Vec<UpdateRecord>>,
    /// When set, every listing fails as if the world server were down.
    unavailable: bool,
}

#[derive(Debug, Default)]
struct Collections {
    actors: Vec<Value>,
    items: Vec<Value>,
    journal: Vec<Value>,
    scenes: Vec<Value>,
}

impl Collections {
    fn get(&self, collection: Collection) -> &Vec<Value> {
        match collection {
            Collection::Actors => &self.actors,
            Collection::Items => &self.items,
            Collection::Journal => &self.journal,
            Collection::Scenes => &self.scenes,
        }
    }

    fn get_mut(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Actors => &mut self.actors,
            Collection::Items => &mut self.items,
            Collection::Journal => &mut self.journal,
            Collection::Scenes => &mut self.scenes,
        }
    }
}

impl MemoryWorldStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every listing fails as if the server were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Seed a collection with raw document values.
    pub fn seed(&self, collection: Collection, docs: Vec<Value>) {
        self.collections
            .lock()
            .expect("store mutex poisoned")
            .get_mut(collection)
            .extend(docs);
    }

    /// Reject future updates against the document with this id.
    pub fn reject_updates_for(&self, id: impl Into<String>) {
        self.rejecting
            .lock()
            .expect("store mutex poisoned")
            .insert(id.into());
    }

    /// All accepted updates so far, in order.
    pub fn updates(&self) -> Vec<UpdateRecord> {
        self.updates.lock().expect("store mutex poisoned").clone()
    }

    /// Number of accepted updates so far.
    pub fn update_count(&self) -> usize {
        self.updates.lock().expect("store mutex poisoned").len()
    }

    /// List a collection as typed documents.
    fn list<T: serde::de::DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Api {
                status: 503,
                body: "world server unavailable".to_string(),
            });
        }
        self.collections
            .lock()
            .expect("store mutex poisoned")
            .get(collection)
            .iter()
            .map(|doc| {
                serde_json::from_value(doc.clone()).map_err(|e| StoreError::Api {
                    status: 500,
                    body: format!("malformed document: {e}"),
                })
            })
            .collect()
    }
}

/// Find a document by `_id` in a slice of raw values.
fn find_by_id<'a>(docs: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    docs.iter_mut()
        .find(|doc| doc.get("_id").and_then(Value::as_str) == Some(id))
}

fn not_found(doc: &DocRef) -> StoreError {
    StoreError::Api {
        status: 404,
        body: format!("document not found: {doc}"),
    }
}

#[async_trait]
impl WorldStore for MemoryWorldStore {
    async fn actors(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.list(Collection::Actors)
    }

    async fn items(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.list(Collection::Items)
    }

    async fn journals(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.list(Collection::Journal)
    }

    async fn scenes(&self) -> Result<Vec<SceneDocument>, StoreError> {
        self.list(Collection::Scenes)
    }

    async fn update(&self, doc: &DocRef, patch: &FieldPatch) -> Result<(), StoreError> {
        if self
            .rejecting
            .lock()
            .expect("store mutex poisoned")
            .contains(doc.target_id())
        {
            return Err(StoreError::Api {
                status: 500,
                body: format!("update rejected for {}", doc.target_id()),
            });
        }

        let mut collections = self.collections.lock().expect("store mutex poisoned");
        let docs = collections.get_mut(doc.collection);
        let mut target = find_by_id(docs, &doc.id).ok_or_else(|| not_found(doc))?;
        for step in &doc.embedded {
            let children = target
                .get_mut(step.collection.as_str())
                .and_then(Value::as_array_mut)
                .ok_or_else(|| not_found(doc))?;
            target = find_by_id(children, &step.id).ok_or_else(|| not_found(doc))?;
        }
        patch.apply_to(target);

        self.updates
            .lock()
            .expect("store mutex poisoned")
            .push(UpdateRecord {
                doc: doc.clone(),
                patch: patch.clone(),
            });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
