//! Asset reference rules: which image references are eligible for
//! migration and how the WebP sibling path is derived.
//!
//! A reference is eligible when the text after its final `.` is one of the
//! legacy raster extensions, compared case-insensitively. Everything else
//! (empty references, extensionless paths, references already pointing at
//! WebP) passes through untouched.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// File extensions eligible for migration, lowercase.
pub const MIGRATABLE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Extension of the migrated format.
pub const TARGET_EXTENSION: &str = "webp";

// ---------------------------------------------------------------------------
// Path rules
// ---------------------------------------------------------------------------

/// Extension of `path`: the text after the final `.`, if any.
///
/// A dot inside a directory segment does not count, so `covers.old/map`
/// has no extension.
fn extension(path: &str) -> Option<&str> {
    let (_, ext) = path.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext)
}

/// Whether `path` carries one of the legacy raster extensions.
pub fn is_migratable(path: &str) -> bool {
    match extension(path) {
        Some(ext) => MIGRATABLE_EXTENSIONS
            .iter()
            .any(|m| ext.eq_ignore_ascii_case(m)),
        None => false,
    }
}

/// Derive the WebP sibling path for a migratable reference.
///
/// Returns `None` when `path` is not a migration candidate. The sibling
/// keeps the full stem and always gets the lowercase target extension:
/// `tokens/Hero.PNG` becomes `tokens/Hero.webp`.
pub fn webp_sibling(path: &str) -> Option<String> {
    if !is_migratable(path) {
        return None;
    }
    path.rsplit_once('.')
        .map(|(stem, _)| format!("{stem}.{TARGET_EXTENSION}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- is_migratable ------------------------------------------------------

    #[test]
    fn legacy_raster_extensions_are_migratable() {
        assert!(is_migratable("portrait.jpg"));
        assert!(is_migratable("portrait.jpeg"));
        assert!(is_migratable("portrait.png"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_migratable("portrait.JPG"));
        assert!(is_migratable("portrait.Jpeg"));
        assert!(is_migratable("tokens/Hero.PNG"));
    }

    #[test]
    fn other_extensions_are_not_migratable() {
        assert!(!is_migratable("portrait.webp"));
        assert!(!is_migratable("portrait.gif"));
        assert!(!is_migratable("portrait.svg"));
        assert!(!is_migratable("clip.mp4"));
    }

    #[test]
    fn empty_and_extensionless_paths_are_not_migratable() {
        assert!(!is_migratable(""));
        assert!(!is_migratable("portrait"));
        assert!(!is_migratable("portrait."));
        assert!(!is_migratable("assets/portrait"));
    }

    #[test]
    fn dot_in_directory_is_not_an_extension() {
        assert!(!is_migratable("covers.old/map"));
        assert!(!is_migratable("covers.png/map"));
    }

    #[test]
    fn query_suffix_disqualifies_the_extension() {
        // The extension must be the final text of the reference.
        assert!(!is_migratable("portrait.png?v=2"));
    }

    // -- webp_sibling -------------------------------------------------------

    #[test]
    fn sibling_replaces_the_extension() {
        assert_eq!(webp_sibling("portrait.png").as_deref(), Some("portrait.webp"));
        assert_eq!(webp_sibling("portrait.jpeg").as_deref(), Some("portrait.webp"));
    }

    #[test]
    fn sibling_keeps_the_directory_and_stem() {
        assert_eq!(
            webp_sibling("worlds/demo/tokens/Hero.png").as_deref(),
            Some("worlds/demo/tokens/Hero.webp")
        );
        assert_eq!(webp_sibling("a.b/c.jpg").as_deref(), Some("a.b/c.webp"));
    }

    #[test]
    fn sibling_extension_is_always_lowercase() {
        assert_eq!(webp_sibling("tokens/Hero.PNG").as_deref(), Some("tokens/Hero.webp"));
        assert_eq!(webp_sibling("map.JPG").as_deref(), Some("map.webp"));
    }

    #[test]
    fn non_candidates_have_no_sibling() {
        assert_eq!(webp_sibling(""), None);
        assert_eq!(webp_sibling("portrait"), None);
        assert_eq!(webp_sibling("portrait.webp"), None);
        assert_eq!(webp_sibling("portrait.gif"), None);
    }

    #[test]
    fn bare_extension_still_gets_a_sibling() {
        // ".png" is a (degenerate) candidate: the stem is empty.
        assert_eq!(webp_sibling(".png").as_deref(), Some(".webp"));
    }
}
