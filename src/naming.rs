//! Golden-name composition.
//!
//! Every captured artifact pair shares one base name built from the test class,
//! the optional variant and night-mode prefixes, the per-capture id, and the
//! revision:
//!
//! - `"Foo.id1.rev_3"` (no prefixes)
//! - `"Foo.night-id1.rev_3"` (night-mode prefix only)
//! - `"Foo.var-night-id1.rev_3"` (variant prefix outermost)
//!
//! Composition is pure and deterministic: identical inputs always yield the
//! identical string, with no randomness and no timestamps, so the external
//! diffing service sees stable golden names across runs and machines.

/// Prefix recorded in golden names when night mode is enabled for a capture.
pub const NIGHT_MODE_ENABLED_PREFIX: &str = "NightModeEnabled";

/// Prefix recorded in golden names when night mode is explicitly disabled.
pub const NIGHT_MODE_DISABLED_PREFIX: &str = "NightModeDisabled";

/// Builds the extension-less base name for one golden capture.
///
/// Starts from `id`, prepends `night_mode_prefix + "-"` when present, then
/// `variant_prefix + "-"` when present (the variant prefix ends up outermost),
/// and formats the result as `"{test_class}.{desc}.rev_{revision}"`. Empty
/// prefixes are treated the same as absent ones.
///
/// No escaping is performed; callers must supply filesystem-safe strings for
/// `test_class`, the prefixes, and `id`.
pub fn base_name(
    test_class: &str,
    variant_prefix: Option<&str>,
    night_mode_prefix: Option<&str>,
    id: &str,
    revision: u32,
) -> String {
    let mut desc = id.to_string();

    if let Some(night) = night_mode_prefix.filter(|p| !p.is_empty()) {
        desc = format!("{night}-{desc}");
    }

    if let Some(variant) = variant_prefix.filter(|p| !p.is_empty()) {
        desc = format!("{variant}-{desc}");
    }

    format!("{test_class}.{desc}.rev_{revision}")
}

/// Name of the golden image file: the base name plus a `.png` extension.
pub fn image_name(
    test_class: &str,
    variant_prefix: Option<&str>,
    night_mode_prefix: Option<&str>,
    id: &str,
    revision: u32,
) -> String {
    format!(
        "{}.png",
        base_name(test_class, variant_prefix, night_mode_prefix, id, revision)
    )
}

/// Name of the metadata document: the base name plus a `.json` extension.
pub fn metadata_name(
    test_class: &str,
    variant_prefix: Option<&str>,
    night_mode_prefix: Option<&str>,
    id: &str,
    revision: u32,
) -> String {
    format!(
        "{}.json",
        base_name(test_class, variant_prefix, night_mode_prefix, id, revision)
    )
}
