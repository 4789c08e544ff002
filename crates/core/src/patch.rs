//! Partial document updates keyed by dotted field path.
//!
//! The world store applies updates as flat maps from a dotted field path
//! to a new value, e.g. `{"prototypeToken.texture.src": "a.webp"}`.
//! [`FieldPatch`] is that map; [`FieldPatch::apply_to`] mirrors the
//! host-side application against a JSON document and backs the in-memory
//! store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field paths
// ---------------------------------------------------------------------------

/// Primary image field carried by actors, items, and journal entries.
pub const FIELD_IMG: &str = "img";

/// Texture reference of an actor's prototype token.
pub const FIELD_PROTOTYPE_TOKEN_TEXTURE: &str = "prototypeToken.texture.src";

/// Background image of a scene.
pub const FIELD_BACKGROUND_SRC: &str = "background.src";

/// Texture reference of a token placed on a scene.
pub const FIELD_TOKEN_TEXTURE: &str = "texture.src";

// ---------------------------------------------------------------------------
// FieldPatch
// ---------------------------------------------------------------------------

/// A partial document update: dotted field path to replacement value.
///
/// Serializes as a flat JSON object, which is exactly the body the world
/// server expects for its update endpoint. Keys are ordered so serialized
/// output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPatch(BTreeMap<String, serde_json::Value>);

impl FieldPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for the common single-field case.
    pub fn single(path: &str, value: impl Into<serde_json::Value>) -> Self {
        let mut patch = Self::new();
        patch.set(path, value);
        patch
    }

    /// Set the value for a dotted field path, replacing any previous value.
    pub fn set(&mut self, path: &str, value: impl Into<serde_json::Value>) {
        self.0.insert(path.to_string(), value.into());
    }

    /// Whether the patch contains no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields in the patch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Value recorded for a field path, if present.
    pub fn get(&self, path: &str) -> Option<&serde_json::Value> {
        self.0.get(path)
    }

    /// Iterate over `(path, value)` entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Apply the patch to a JSON document.
    ///
    /// Each dotted path is walked from the document root. Missing
    /// intermediate objects are created; a non-object intermediate is
    /// replaced by an object, matching last-write-wins on the host.
    pub fn apply_to(&self, doc: &mut serde_json::Value) {
        for (path, value) in self.iter() {
            apply_field(doc, path, value.clone());
        }
    }
}

/// Set one dotted field path on a JSON document.
fn apply_field(doc: &mut serde_json::Value, path: &str, value: serde_json::Value) {
    let mut current = doc;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        if !current.is_object() {
            *current = serde_json::Value::Object(serde_json::Map::new());
        }
        let map = current
            .as_object_mut()
            .expect("value was just made an object");
        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return;
        }
        current = map
            .entry(part.to_string())
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // -- construction -------------------------------------------------------

    #[test]
    fn single_builds_a_one_field_patch() {
        let patch = FieldPatch::single(FIELD_IMG, "portrait.webp");
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get(FIELD_IMG), Some(&json!("portrait.webp")));
    }

    #[test]
    fn set_replaces_a_previous_value() {
        let mut patch = FieldPatch::new();
        patch.set(FIELD_IMG, "a.webp");
        patch.set(FIELD_IMG, "b.webp");
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get(FIELD_IMG), Some(&json!("b.webp")));
    }

    #[test]
    fn empty_patch_reports_empty() {
        let patch = FieldPatch::new();
        assert!(patch.is_empty());
        assert_eq!(patch.len(), 0);
    }

    // -- serialization ------------------------------------------------------

    #[test]
    fn serializes_as_a_flat_object() {
        let mut patch = FieldPatch::new();
        patch.set(FIELD_IMG, "portrait.webp");
        patch.set(FIELD_PROTOTYPE_TOKEN_TEXTURE, "token.webp");

        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            json!({
                "img": "portrait.webp",
                "prototypeToken.texture.src": "token.webp",
            })
        );
    }

    // -- apply_to -----------------------------------------------------------

    #[test]
    fn apply_sets_a_top_level_field() {
        let mut doc = json!({ "_id": "a1", "img": "portrait.png" });
        FieldPatch::single(FIELD_IMG, "portrait.webp").apply_to(&mut doc);
        assert_eq!(doc["img"], json!("portrait.webp"));
        assert_eq!(doc["_id"], json!("a1"));
    }

    #[test]
    fn apply_walks_nested_objects() {
        let mut doc = json!({
            "_id": "a1",
            "prototypeToken": { "texture": { "src": "token.png" } },
        });
        FieldPatch::single(FIELD_PROTOTYPE_TOKEN_TEXTURE, "token.webp").apply_to(&mut doc);
        assert_eq!(doc["prototypeToken"]["texture"]["src"], json!("token.webp"));
    }

    #[test]
    fn apply_creates_missing_intermediates() {
        let mut doc = json!({ "_id": "s1" });
        FieldPatch::single(FIELD_BACKGROUND_SRC, "map.webp").apply_to(&mut doc);
        assert_eq!(doc["background"]["src"], json!("map.webp"));
    }

    #[test]
    fn apply_replaces_a_non_object_intermediate() {
        let mut doc = json!({ "background": "not-an-object" });
        FieldPatch::single(FIELD_BACKGROUND_SRC, "map.webp").apply_to(&mut doc);
        assert_eq!(doc["background"]["src"], json!("map.webp"));
    }

    #[test]
    fn apply_sets_all_fields_of_the_patch() {
        let mut patch = FieldPatch::new();
        patch.set(FIELD_IMG, "portrait.webp");
        patch.set(FIELD_PROTOTYPE_TOKEN_TEXTURE, "token.webp");

        let mut doc = json!({ "_id": "a1" });
        patch.apply_to(&mut doc);
        assert_eq!(doc["img"], json!("portrait.webp"));
        assert_eq!(doc["prototypeToken"]["texture"]["src"], json!("token.webp"));
    }
}
