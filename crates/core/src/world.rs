//! World collection identifiers and document addressing.
//!
//! [`Collection`] names the four top-level collections the migration
//! traverses; [`DocRef`] addresses one document, possibly through a chain
//! of embedded collections, and renders the URL path the world API expects.

use serde::{Deserialize, Serialize};

use crate::types::DocId;

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Top-level document collections, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Actors,
    Items,
    Journal,
    Scenes,
}

impl Collection {
    /// URL path segment of the collection on the world API.
    ///
    /// The journal collection's segment is singular, matching the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actors => "actors",
            Self::Items => "items",
            Self::Journal => "journal",
            Self::Scenes => "scenes",
        }
    }

    /// Parse a collection segment. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "actors" => Some(Self::Actors),
            "items" => Some(Self::Items),
            "journal" => Some(Self::Journal),
            "scenes" => Some(Self::Scenes),
            _ => None,
        }
    }

    /// All collections, in traversal order.
    pub const ALL: &'static [Collection] = &[
        Collection::Actors,
        Collection::Items,
        Collection::Journal,
        Collection::Scenes,
    ];
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Collections embedded inside another document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedCollection {
    /// Items owned by an actor (or by another item).
    Items,
    /// Tokens placed on a scene.
    Tokens,
}

impl EmbeddedCollection {
    /// URL path segment of the embedded collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Tokens => "tokens",
        }
    }
}

impl std::fmt::Display for EmbeddedCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Document addressing
// ---------------------------------------------------------------------------

/// One step into an embedded collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedRef {
    pub collection: EmbeddedCollection,
    pub id: DocId,
}

/// Address of a document for update purposes.
///
/// `embedded` is the chain of embedded collections from the top-level
/// document down to the target; it is empty for the top-level document
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRef {
    pub collection: Collection,
    pub id: DocId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded: Vec<EmbeddedRef>,
}

impl DocRef {
    /// Address a top-level document.
    pub fn top(collection: Collection, id: impl Into<DocId>) -> Self {
        Self {
            collection,
            id: id.into(),
            embedded: Vec::new(),
        }
    }

    /// Address a document embedded one level below `self`.
    pub fn child(&self, collection: EmbeddedCollection, id: impl Into<DocId>) -> Self {
        let mut embedded = self.embedded.clone();
        embedded.push(EmbeddedRef {
            collection,
            id: id.into(),
        });
        Self {
            collection: self.collection,
            id: self.id.clone(),
            embedded,
        }
    }

    /// Id of the addressed document itself (the deepest id in the chain).
    pub fn target_id(&self) -> &str {
        self.embedded
            .last()
            .map(|e| e.id.as_str())
            .unwrap_or(&self.id)
    }

    /// URL path of the document on the world API, without a leading slash:
    /// `actors/a1/items/i2`.
    pub fn api_path(&self) -> String {
        let mut path = format!("{}/{}", self.collection.as_str(), self.id);
        for e in &self.embedded {
            path.push('/');
            path.push_str(e.collection.as_str());
            path.push('/');
            path.push_str(&e.id);
        }
        path
    }
}

impl std::fmt::Display for DocRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_path())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
