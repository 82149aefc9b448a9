//! Per-entry safety rules.

use std::collections::HashSet;

use crate::BundleError;
use crate::PublishPolicy;
use crate::Result;
use crate::inspection::NormalizedEntry;
use crate::security::path::check_traversal;
use crate::security::path::file_name;
use crate::security::path::segments;

/// Applies every per-entry rule to one entry, stopping at the first failure.
///
/// Rules run against the normalized path *before* root stripping, in this
/// order: traversal, forbidden folder (any segment), forbidden file name
/// (final segment), unsupported entry kind.
///
/// # Errors
///
/// Returns the first violated rule as a security error.
///
/// # Examples
///
/// ```
/// use bundleguard_core::PublishPolicy;
/// use bundleguard_core::inspection::NormalizedEntry;
/// use bundleguard_core::inspection::RawEntry;
/// use bundleguard_core::security::rules::check_entry;
/// use bundleguard_core::types::EntryKind;
///
/// let policy = PublishPolicy::default();
/// let entry = |path: &str| {
///     NormalizedEntry::from_raw(RawEntry::new(path, Vec::new(), EntryKind::File), None)
/// };
///
/// assert!(check_entry(&entry("src/node_modules_backup/index.js"), &policy).is_ok());
/// assert!(check_entry(&entry("src/node_modules/pkg/index.js"), &policy).is_err());
/// ```
pub fn check_entry(entry: &NormalizedEntry, policy: &PublishPolicy) -> Result<()> {
    let path = entry.path();

    check_traversal(path)?;

    if let Some(folder) = segments(path).find(|segment| policy.is_folder_forbidden(segment)) {
        return Err(BundleError::ForbiddenFolder {
            path: path.to_string(),
            folder: folder.to_string(),
        });
    }

    if let Some(name) = file_name(path)
        && policy.is_file_forbidden(name)
    {
        return Err(BundleError::ForbiddenFile {
            path: path.to_string(),
        });
    }

    if !entry.kind().is_file() && !entry.kind().is_directory() {
        return Err(BundleError::UnsupportedEntry {
            path: path.to_string(),
        });
    }

    Ok(())
}

/// Finds file entries whose path is also needed as a folder.
///
/// A bundle holding both `a` and `a/b` cannot be written to disk. One error
/// is returned per conflicting path, in archive order.
///
/// # Examples
///
/// ```
/// use bundleguard_core::inspection::NormalizedEntry;
/// use bundleguard_core::inspection::RawEntry;
/// use bundleguard_core::security::rules::find_path_conflicts;
/// use bundleguard_core::types::EntryKind;
///
/// let entries: Vec<_> = ["a", "a/b", "c"]
///     .into_iter()
///     .map(|path| NormalizedEntry::from_raw(RawEntry::new(path, Vec::new(), EntryKind::File), None))
///     .collect();
///
/// let conflicts = find_path_conflicts(&entries);
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].to_string(), "path used as both file and folder: a");
/// ```
#[must_use]
pub fn find_path_conflicts(entries: &[NormalizedEntry]) -> Vec<BundleError> {
    let mut folders: HashSet<&str> = HashSet::new();
    for entry in entries {
        let relative = entry.relative();
        if entry.kind().is_directory() && !relative.is_empty() {
            folders.insert(relative);
        }
        let mut end = relative.len();
        while let Some(slash) = relative[..end].rfind('/') {
            folders.insert(&relative[..slash]);
            end = slash;
        }
    }

    let mut reported = HashSet::new();
    entries
        .iter()
        .filter(|entry| entry.kind().is_file() && folders.contains(entry.relative()))
        .filter(|entry| reported.insert(entry.relative()))
        .map(|entry| BundleError::PathConflict {
            path: entry.path().to_string(),
        })
        .collect()
}
