//! Archive inspection without extraction.
//!
//! Inspection turns an untrusted buffer into a normalized entry view: it
//! detects the format, reads every entry under the policy's quota, and
//! computes root folder detection. Nothing is written to disk.
//!
//! # Examples
//!
//! ```
//! use bundleguard_core::PublishPolicy;
//! use bundleguard_core::inspection::inspect;
//! use bundleguard_core::test_utils::valid_bundle;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = inspect(&valid_bundle(), &PublishPolicy::default())?;
//! assert_eq!(archive.root().root(), Some("project"));
//! for entry in archive.entries() {
//!     println!("{} -> {}", entry.path(), entry.relative());
//! }
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod root;

pub use entry::NormalizedEntry;
pub use entry::RawEntry;
pub use root::RootDetectionResult;
pub use root::RootRejection;
pub use root::detect_root;

use std::collections::BTreeSet;

use tracing::debug;

use crate::PublishPolicy;
use crate::Result;
use crate::formats::ArchiveType;
use crate::formats::open_reader;
use crate::report::BundleStructure;
use crate::security::QuotaTracker;
use crate::security::path::segments;

/// An archive read into memory and normalized.
#[derive(Debug, Clone)]
pub struct InspectedArchive {
    format: ArchiveType,
    entries: Vec<NormalizedEntry>,
    root: RootDetectionResult,
}

impl InspectedArchive {
    /// Returns the detected archive format.
    #[must_use]
    pub const fn format(&self) -> ArchiveType {
        self.format
    }

    /// Entries in archive order.
    #[must_use]
    pub fn entries(&self) -> &[NormalizedEntry] {
        &self.entries
    }

    /// Root folder detection outcome.
    #[must_use]
    pub const fn root(&self) -> &RootDetectionResult {
        &self.root
    }

    /// Returns `true` if the archive has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Regular file entries.
    pub fn files(&self) -> impl Iterator<Item = &NormalizedEntry> {
        self.entries.iter().filter(|entry| entry.kind().is_file())
    }

    /// Summarizes the archive's post-stripping layout.
    #[must_use]
    pub fn structure(&self) -> BundleStructure {
        let top_level: BTreeSet<&str> = self
            .entries
            .iter()
            .filter_map(|entry| segments(entry.relative()).next())
            .collect();

        BundleStructure {
            format: self.format,
            root_folder: self.root.root().map(String::from),
            file_count: self.files().count(),
            directory_count: self
                .entries
                .iter()
                .filter(|entry| entry.kind().is_directory())
                .count(),
            total_bytes: self.files().map(NormalizedEntry::size).sum(),
            top_level: top_level.into_iter().map(String::from).collect(),
        }
    }
}

/// Reads and normalizes an archive buffer.
///
/// An archive with zero entries is returned successfully; reporting it is
/// the validator's job.
///
/// # Errors
///
/// Returns `BundleError::InvalidArchive` if the buffer is not a supported,
/// well-formed archive, or `BundleError::QuotaExceeded` if it holds more
/// entries or decompressed bytes than the policy allows.
pub fn inspect(buffer: &[u8], policy: &PublishPolicy) -> Result<InspectedArchive> {
    let mut reader = open_reader(buffer)?;
    let format = reader.format();

    let mut quota = QuotaTracker::from_policy(policy);
    let raw = reader.read_entries(&mut quota)?;

    let root = detect_root(&raw, policy.root_detection);
    let entries: Vec<NormalizedEntry> = raw
        .into_iter()
        .map(|entry| NormalizedEntry::from_raw(entry, root.root()))
        .collect();

    debug!(
        %format,
        entries = entries.len(),
        bytes = quota.bytes(),
        root = root.root().unwrap_or("-"),
        "inspected archive"
    );

    Ok(InspectedArchive {
        format,
        entries,
        root,
    })
}
