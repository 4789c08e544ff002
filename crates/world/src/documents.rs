//! Serde types mirroring the world server's document JSON.
//!
//! Field names follow the host wire format (`_id`, `prototypeToken`,
//! `texture.src`). [`WorldDocument`] covers actors, items, and journal
//! entries; journals simply carry neither a prototype token nor embedded
//! items. Scenes have their own shape.

use mediashift_core::types::DocId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared containers
// ---------------------------------------------------------------------------

/// A texture reference container: `{ "src": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

/// An actor's prototype token: `{ "texture": { "src": ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrototypeToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<TextureRef>,
}

/// A scene's background container: `{ "src": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// An actor, item, or journal entry.
///
/// `items` nests further [`WorldDocument`]s; the traversal recurses through
/// whatever depth the host delivers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldDocument {
    #[serde(rename = "_id")]
    pub id: DocId,
    #[serde(default)]
    pub name: String,
    /// Primary image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    /// Prototype token carried by actors.
    #[serde(
        default,
        rename = "prototypeToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub prototype_token: Option<PrototypeToken>,
    /// Embedded child documents (an actor's items).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<WorldDocument>,
}

impl WorldDocument {
    /// The prototype token's texture reference, if any.
    pub fn prototype_texture(&self) -> Option<&str> {
        self.prototype_token.as_ref()?.texture.as_ref()?.src.as_deref()
    }
}

/// A scene: a background image plus placed tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(rename = "_id")]
    pub id: DocId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<SceneToken>,
}

impl SceneDocument {
    /// The background image reference, if any.
    pub fn background_src(&self) -> Option<&str> {
        self.background.as_ref()?.src.as_deref()
    }
}

/// A token placed on a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneToken {
    #[serde(rename = "_id")]
    pub id: DocId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<TextureRef>,
}

impl SceneToken {
    /// The token's texture reference, if any.
    pub fn texture_src(&self) -> Option<&str> {
        self.texture.as_ref()?.src.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
