//! Pure path functions mapping import specifiers to canonical module keys.
//!
//! A canonical key is an absolute, `.js`-suffixed, lexically normalized
//! path. Two specifiers that normalize to the same key denote the same
//! module exactly once in the graph. Normalization is lexical on purpose:
//! resolution must succeed even when the target file does not exist, so the
//! graph builder can downgrade a missing target to a runtime failure instead
//! of refusing to resolve.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use path_slash::PathExt as _;

use crate::error::BundleError;

/// How the graph builder should treat a specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// Begins with `./`, `../`, or `/`. Resolved to a canonical key and followed.
    Local,
    /// Anything else. Rewritten in place and left to the host module system.
    External,
}

/// Classify a specifier as local or external.
pub fn classify(specifier: &str) -> SpecifierKind {
    if specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/') {
        SpecifierKind::Local
    } else {
        SpecifierKind::External
    }
}

/// Resolve a local specifier from the perspective of `importer`.
///
/// Joins the importer's directory with the specifier, appends `.js` when the
/// suffix is missing, and lexically normalizes the result. No directory
/// lookup and no `index.js` expansion is performed.
///
/// # Errors
/// `UnresolvableSpecifier` when the importer has no directory component to
/// join against.
pub fn resolve(importer: &Path, specifier: &str) -> Result<PathBuf, BundleError> {
    let dir = importer
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| BundleError::UnresolvableSpecifier {
            importer: importer.to_path_buf(),
            specifier: specifier.to_owned(),
        })?;

    let with_ext = if specifier.ends_with(".js") {
        specifier.to_owned()
    } else {
        format!("{specifier}.js")
    };

    // `join` with a `/`-rooted specifier replaces the base, which is exactly
    // the semantics absolute specifiers want.
    Ok(dir.join(with_ext).clean())
}

/// Rewrite a canonical key to the form used in the emitted module table:
/// relative to `root` (the process working directory), forward-slashed, and
/// prefixed with `./`.
///
/// Rewritten imports and table keys both go through this function, so
/// lookups in the emitted `modules` object always agree.
pub fn display_key(key: &Path, root: &Path) -> String {
    let rel = pathdiff::diff_paths(key, root).unwrap_or_else(|| key.to_path_buf());
    format!("./{}", rel.to_slash_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_local_prefixes() {
        assert_eq!(classify("./a.js"), SpecifierKind::Local);
        assert_eq!(classify("../lib/a.js"), SpecifierKind::Local);
        assert_eq!(classify("/abs/a.js"), SpecifierKind::Local);
    }

    #[test]
    fn test_classify_external() {
        assert_eq!(classify("react"), SpecifierKind::External);
        assert_eq!(classify("@scope/pkg"), SpecifierKind::External);
        // A bare name that happens to look like a file is still external.
        assert_eq!(classify("utils.js"), SpecifierKind::External);
    }

    #[test]
    fn test_resolve_joins_importer_directory() {
        let key = resolve(Path::new("/proj/src/index.js"), "./util.js").unwrap();
        assert_eq!(key, PathBuf::from("/proj/src/util.js"));
    }

    #[test]
    fn test_resolve_appends_js_suffix() {
        let key = resolve(Path::new("/proj/src/index.js"), "./util").unwrap();
        assert_eq!(key, PathBuf::from("/proj/src/util.js"));
    }

    #[test]
    fn test_resolve_does_not_touch_existing_suffix() {
        let key = resolve(Path::new("/proj/src/index.js"), "./vendor.min.js").unwrap();
        assert_eq!(key, PathBuf::from("/proj/src/vendor.min.js"));
    }

    #[test]
    fn test_resolve_normalizes_parent_segments() {
        let key = resolve(Path::new("/proj/src/deep/mod.js"), "../util.js").unwrap();
        assert_eq!(key, PathBuf::from("/proj/src/util.js"));
    }

    #[test]
    fn test_resolve_two_spellings_same_key() {
        // Distinct specifiers that normalize to the same absolute path must
        // produce the same canonical key.
        let a = resolve(Path::new("/proj/src/index.js"), "./lib/../util.js").unwrap();
        let b = resolve(Path::new("/proj/src/index.js"), "./util").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_rejects_rootless_importer() {
        let err = resolve(Path::new("index.js"), "./util.js");
        assert!(
            matches!(err, Err(BundleError::UnresolvableSpecifier { .. })),
            "an importer with no directory component cannot anchor a join"
        );
    }

    #[test]
    fn test_display_key_is_dot_prefixed_and_relative() {
        let key = Path::new("/proj/src/util.js");
        assert_eq!(display_key(key, Path::new("/proj")), "./src/util.js");
    }

    #[test]
    fn test_display_key_outside_root() {
        let key = Path::new("/other/util.js");
        assert_eq!(display_key(key, Path::new("/proj")), "./../other/util.js");
    }
}
