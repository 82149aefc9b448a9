//! Validated write path type for slot extraction.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::BundleError;
use crate::Result;

/// A relative path that is safe to join onto a slot directory.
///
/// `SafePath` represents a path that has been validated to not contain:
/// - Parent directory segments (`..`)
/// - A leading root (`/`) or a drive prefix (`C:`)
/// - NUL bytes
///
/// This check is performed by the extractor itself, right before each write,
/// and does not rely on any earlier validation pass having run.
///
/// # Security Properties
///
/// - Can ONLY be constructed through validation
/// - NO `From<PathBuf>` implementation
/// - Always resolves within the slot directory it was validated against
/// - Normalized to remove `.` and empty segments
///
/// # Examples
///
/// ```
/// use bundleguard_core::types::SafePath;
/// use std::path::Path;
///
/// let slot = Path::new("/srv/projects/df26015b32025ec95e029d995e88a81c");
///
/// let safe = SafePath::validate("assets/./app.js", slot).unwrap();
/// assert_eq!(safe.as_path(), Path::new("assets/app.js"));
///
/// assert!(SafePath::validate("assets/../../etc/passwd", slot).is_err());
/// assert!(SafePath::validate("/etc/passwd", slot).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Validates a `/`-separated relative path against a slot directory.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::PathTraversal` if the path is empty, absolute,
    /// contains `..` or NUL, or would resolve outside `slot_dir`.
    pub fn validate(relative: &str, slot_dir: &Path) -> Result<Self> {
        let reject = || BundleError::PathTraversal {
            path: relative.to_string(),
        };

        if relative.contains('\0') || relative.starts_with('/') || has_drive_prefix(relative) {
            return Err(reject());
        }

        let mut normalized = PathBuf::new();
        for segment in relative.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(reject()),
                other => normalized.push(other),
            }
        }

        // Platform parsing must agree that only plain names remain.
        let mut depth = 0usize;
        for component in normalized.components() {
            match component {
                Component::Normal(_) => depth += 1,
                Component::ParentDir
                | Component::CurDir
                | Component::RootDir
                | Component::Prefix(_) => return Err(reject()),
            }
        }
        if depth == 0 {
            return Err(reject());
        }

        if !slot_dir.join(&normalized).starts_with(slot_dir) {
            return Err(reject());
        }

        Ok(Self(normalized))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

/// Detects `C:`-style drive prefixes regardless of host platform.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
