//! Archive path normalization and traversal detection.
//!
//! Archive entry names are plain strings that may use either `/` or `\` as a
//! separator. Everything in this module works on the canonical `/` form and
//! never touches the filesystem.

use crate::BundleError;
use crate::Result;

/// Canonicalizes path separators to `/`.
///
/// # Examples
///
/// ```
/// use bundleguard_core::security::path::normalize_separators;
///
/// assert_eq!(normalize_separators(r"project\assets\app.js"), "project/assets/app.js");
/// ```
#[must_use]
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// Iterates over the meaningful segments of a normalized path.
///
/// Empty segments (from `//` or a trailing `/`) and `.` are skipped; `..` is
/// kept so callers can still see it.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

/// Joins the meaningful segments of a normalized path back together.
///
/// # Examples
///
/// ```
/// use bundleguard_core::security::path::clean;
///
/// assert_eq!(clean("./assets//app.js"), "assets/app.js");
/// assert_eq!(clean("project/"), "project");
/// ```
#[must_use]
pub fn clean(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

/// Returns the final meaningful segment of a normalized path.
#[must_use]
pub fn file_name(path: &str) -> Option<&str> {
    segments(path).last()
}

/// Returns `true` if any segment is exactly `..`.
///
/// Names that merely contain two dots (`release..notes`) are not traversal.
#[must_use]
pub fn has_parent_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "..")
}

/// Returns `true` for rooted paths and `C:`-style drive prefixes.
#[must_use]
pub fn is_absolute_like(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/') || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Rejects entry paths that could escape the extraction directory.
///
/// This is the validation-time zip-slip rule. It is evaluated against the
/// normalized path before root stripping, so traversal hidden inside the
/// root segment itself is caught too.
///
/// # Errors
///
/// Returns `BundleError::PathTraversal` if the path contains a `..` segment,
/// is absolute, or contains a NUL byte.
///
/// # Examples
///
/// ```
/// use bundleguard_core::security::path::check_traversal;
///
/// assert!(check_traversal("project/index.html").is_ok());
/// assert!(check_traversal("a/../../etc/passwd").is_err());
/// assert!(check_traversal("/etc/passwd").is_err());
/// ```
pub fn check_traversal(path: &str) -> Result<()> {
    if path.contains('\0') || has_parent_segment(path) || is_absolute_like(path) {
        return Err(BundleError::PathTraversal {
            path: path.to_string(),
        });
    }
    Ok(())
}
