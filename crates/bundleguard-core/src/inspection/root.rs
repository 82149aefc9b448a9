//! Enclosing root folder detection.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use super::RawEntry;
use crate::config::RootDetection;
use crate::security::path::clean;
use crate::security::path::normalize_separators;
use crate::security::path::segments;

/// Why a root candidate was not stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRejection {
    /// A non-directory entry carries the candidate's name.
    NotADirectory,
    /// Some entries sit next to the candidate instead of inside it.
    EntriesOutsideRoot,
    /// The candidate is `..`.
    InvalidName,
}

impl fmt::Display for RootRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotADirectory => "an entry with that name is not a folder",
            Self::EntriesOutsideRoot => "some entries are outside it",
            Self::InvalidName => "it is not a valid folder name",
        })
    }
}

/// Outcome of root folder detection.
///
/// The candidate is found by collecting the first segment of every entry
/// path that contains a separator between two names (plus every directory
/// entry). If exactly one distinct segment exists it is the candidate; the
/// configured [`RootDetection`] rule then decides whether it is stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootDetectionResult {
    top_level_segments: BTreeSet<String>,
    root: Option<String>,
    rejected: Option<(String, RootRejection)>,
}

impl RootDetectionResult {
    /// Distinct first segments of all nested entries and directories.
    #[must_use]
    pub const fn top_level_segments(&self) -> &BTreeSet<String> {
        &self.top_level_segments
    }

    /// The detected root, if one is stripped.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// The candidate that the rule refused, and why.
    #[must_use]
    pub fn rejected(&self) -> Option<(&str, RootRejection)> {
        self.rejected
            .as_ref()
            .map(|(candidate, reason)| (candidate.as_str(), *reason))
    }

    /// Human-readable warning for a rejected candidate.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        self.rejected()
            .map(|(candidate, reason)| format!("ignoring candidate root folder `{candidate}`: {reason}"))
    }
}

/// Detects the root folder of a list of raw entries.
///
/// # Examples
///
/// ```
/// use bundleguard_core::config::RootDetection;
/// use bundleguard_core::inspection::RawEntry;
/// use bundleguard_core::inspection::detect_root;
/// use bundleguard_core::types::EntryKind;
///
/// let entries = vec![
///     RawEntry::new("project/index.html", Vec::new(), EntryKind::File),
///     RawEntry::new(r"project\meta.json", Vec::new(), EntryKind::File),
/// ];
/// let result = detect_root(&entries, RootDetection::ContainerOnly);
/// assert_eq!(result.root(), Some("project"));
/// ```
#[must_use]
pub fn detect_root(entries: &[RawEntry], rule: RootDetection) -> RootDetectionResult {
    let paths: Vec<(String, &RawEntry)> = entries
        .iter()
        .map(|entry| (normalize_separators(entry.path()), entry))
        .collect();

    // Directory entries always name a folder; files count only when nested.
    let top_level_segments: BTreeSet<String> = paths
        .iter()
        .filter(|(path, entry)| entry.kind().is_directory() || segments(path).nth(1).is_some())
        .filter_map(|(path, _)| segments(path).next())
        .map(String::from)
        .collect();

    let mut result = RootDetectionResult {
        top_level_segments,
        root: None,
        rejected: None,
    };

    if rule == RootDetection::Disabled || result.top_level_segments.len() != 1 {
        return result;
    }
    let Some(candidate) = result.top_level_segments.first().cloned() else {
        return result;
    };

    let rejection = if candidate == ".." {
        Some(RootRejection::InvalidName)
    } else if paths
        .iter()
        .any(|(path, entry)| !entry.kind().is_directory() && clean(path) == candidate)
    {
        Some(RootRejection::NotADirectory)
    } else if rule == RootDetection::ContainerOnly
        && paths.iter().any(|(path, _)| {
            let cleaned = clean(path);
            !cleaned.is_empty()
                && cleaned != candidate
                && !cleaned
                    .strip_prefix(candidate.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    {
        Some(RootRejection::EntriesOutsideRoot)
    } else {
        None
    };

    match rejection {
        Some(reason) => {
            debug!(candidate = %candidate, %reason, "root candidate rejected");
            result.rejected = Some((candidate, reason));
        }
        None => {
            debug!(root = %candidate, "detected root folder");
            result.root = Some(candidate);
        }
    }
    result
}
