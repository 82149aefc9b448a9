//! Archive entry views.

use crate::security::path::clean;
use crate::security::path::is_absolute_like;
use crate::security::path::normalize_separators;
use crate::types::EntryKind;

/// An entry exactly as read from the archive.
///
/// The path may use either separator convention and is not trusted in any
/// way. Directory and special entries carry an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    path: String,
    payload: Vec<u8>,
    kind: EntryKind,
}

impl RawEntry {
    /// Creates a raw entry.
    #[must_use]
    pub fn new(path: impl Into<String>, payload: Vec<u8>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            payload,
            kind,
        }
    }

    /// Returns the raw archive path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }
}

/// A [`RawEntry`] with separators canonicalized and the detected root, if
/// any, stripped.
///
/// Both forms of the path are kept: `path` is what security rules look at,
/// `relative` is what required-file matching and extraction use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    path: String,
    relative: String,
    kind: EntryKind,
    payload: Vec<u8>,
}

impl NormalizedEntry {
    /// Normalizes a raw entry against an optional detected root.
    #[must_use]
    pub fn from_raw(raw: RawEntry, root: Option<&str>) -> Self {
        let path = normalize_separators(&raw.path);
        let relative = strip_root(&path, root);
        Self {
            path,
            relative,
            kind: raw.kind,
            payload: raw.payload,
        }
    }

    /// Normalized path before root stripping.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path relative to the bundle's top level, with `.` and empty segments
    /// removed. Empty for the root directory entry itself; absolute paths
    /// are kept verbatim.
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::try_from(self.payload.len()).unwrap_or(u64::MAX)
    }
}

/// Removes `root/` from the front of a normalized path and cleans the rest.
///
/// Absolute paths are returned untouched so later checks still see them.
fn strip_root(path: &str, root: Option<&str>) -> String {
    if is_absolute_like(path) {
        return path.to_string();
    }
    let cleaned = clean(path);
    let Some(root) = root else {
        return cleaned;
    };

    if cleaned == root {
        return String::new();
    }
    match cleaned.strip_prefix(root).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => rest.to_string(),
        None => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> RawEntry {
        RawEntry::new(path, b"x".to_vec(), EntryKind::File)
    }

    #[test]
    fn test_normalize_without_root() {
        let entry = NormalizedEntry::from_raw(file(r"assets\app.js"), None);
        assert_eq!(entry.path(), "assets/app.js");
        assert_eq!(entry.relative(), "assets/app.js");
        assert_eq!(entry.size(), 1);
    }

    #[test]
    fn test_strip_root() {
        let entry = NormalizedEntry::from_raw(file("project/index.html"), Some("project"));
        assert_eq!(entry.path(), "project/index.html");
        assert_eq!(entry.relative(), "index.html");
    }

    #[test]
    fn test_strip_root_directory_entry() {
        let dir = RawEntry::new("project/", Vec::new(), EntryKind::Directory);
        let entry = NormalizedEntry::from_raw(dir, Some("project"));
        assert_eq!(entry.relative(), "");
    }

    #[test]
    fn test_strip_root_requires_whole_segment() {
        let entry = NormalizedEntry::from_raw(file("project2/index.html"), Some("project"));
        assert_eq!(entry.relative(), "project2/index.html");
    }

    #[test]
    fn test_strip_root_cleans_dot_segments() {
        let entry = NormalizedEntry::from_raw(file("./project//./index.html"), Some("project"));
        assert_eq!(entry.relative(), "index.html");
    }

    #[test]
    fn test_absolute_paths_are_not_cleaned() {
        let entry = NormalizedEntry::from_raw(file("/etc/passwd"), None);
        assert_eq!(entry.relative(), "/etc/passwd");
    }

    #[test]
    fn test_parent_segments_survive_stripping() {
        let entry = NormalizedEntry::from_raw(file("project/../../etc/passwd"), Some("project"));
        assert_eq!(entry.relative(), "../../etc/passwd");
    }
}
