//! Slot extraction.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::guard::SlotGuard;
use crate::BundleError;
use crate::PublishPolicy;
use crate::Result;
use crate::inspection::InspectedArchive;
use crate::inspection::inspect;
use crate::report::ExtractionReport;
use crate::report::ProgressCallback;
use crate::security::rules::find_path_conflicts;
use crate::types::SafePath;
use crate::types::SlotId;
use crate::types::StorageRoot;

/// Writes a bundle into a fresh slot directory.
///
/// The extractor never trusts an earlier validation pass. It re-inspects the
/// buffer, re-derives root detection with the same policy, and validates
/// every write path with [`SafePath`] immediately before writing. Any
/// failure removes the slot directory, so a rejected bundle leaves nothing
/// on disk.
///
/// The target is always `storage_root/slot_id`; there is no way to pass a
/// path that changes it.
///
/// # Examples
///
/// ```no_run
/// use bundleguard_core::NoopProgress;
/// use bundleguard_core::PublishPolicy;
/// use bundleguard_core::extraction::SafeExtractor;
/// use bundleguard_core::slot::OsSlotIds;
/// use bundleguard_core::slot::SlotIdGenerator;
/// use bundleguard_core::types::StorageRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let buffer = std::fs::read("bundle.zip")?;
/// let storage = StorageRoot::new("/srv/projects")?;
/// let policy = PublishPolicy::default();
/// let slot = OsSlotIds.new_id()?;
///
/// let report = SafeExtractor::new(&storage, &policy).extract(&buffer, &slot, &mut NoopProgress)?;
/// println!("wrote {} files", report.files_written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SafeExtractor<'a> {
    storage: &'a StorageRoot,
    policy: &'a PublishPolicy,
}

impl<'a> SafeExtractor<'a> {
    /// Creates an extractor writing under `storage`.
    #[must_use]
    pub const fn new(storage: &'a StorageRoot, policy: &'a PublishPolicy) -> Self {
        Self { storage, policy }
    }

    /// Extracts `buffer` into the slot directory for `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The buffer is not a readable archive or exceeds inspection limits
    /// - The slot directory already exists (`SlotCollision`)
    /// - An entry path would escape the slot (`PathTraversal`)
    /// - An entry is neither a file nor a directory (`UnsupportedEntry`)
    /// - A file path is also needed as a folder (`PathConflict`)
    /// - A directory or file cannot be written (`WriteFailed`)
    pub fn extract(
        &self,
        buffer: &[u8],
        slot: &SlotId,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        let archive = inspect(buffer, self.policy)?;
        if let Some(conflict) = find_path_conflicts(archive.entries()).into_iter().next() {
            return Err(conflict);
        }

        let slot_dir = self.storage.create_slot(slot)?;
        let guard = SlotGuard::new(self.storage, slot);

        let mut report = write_entries(&archive, &slot_dir, progress).inspect_err(|e| {
            warn!(slot = %slot, error = %e, "extraction aborted");
        })?;

        guard.commit();
        report.duration = start.elapsed();

        info!(
            slot = %slot,
            files = report.files_written,
            bytes = report.bytes_written,
            "extracted bundle"
        );
        Ok(report)
    }
}

/// Writes every file entry sequentially under `slot_dir`.
fn write_entries(
    archive: &InspectedArchive,
    slot_dir: &Path,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let mut report = ExtractionReport::new();
    let mut directories: HashSet<PathBuf> = HashSet::new();
    let total = archive.entries().len();

    for (index, entry) in archive.entries().iter().enumerate() {
        if entry.kind().is_directory() {
            continue;
        }
        if !entry.kind().is_file() {
            return Err(BundleError::UnsupportedEntry {
                path: entry.path().to_string(),
            });
        }

        let safe_path = SafePath::validate(entry.relative(), slot_dir)?;
        progress.on_entry_start(safe_path.as_path(), total, index + 1);

        let mut ancestor = safe_path.as_path().parent();
        while let Some(dir) = ancestor.filter(|dir| !dir.as_os_str().is_empty()) {
            directories.insert(dir.to_path_buf());
            ancestor = dir.parent();
        }

        let dest = slot_dir.join(safe_path.as_path());
        write_file(&dest, entry.payload())?;
        debug!(path = %safe_path.as_path().display(), size = entry.size(), "wrote file");

        report.files_written += 1;
        report.bytes_written += entry.size();
        progress.on_bytes_written(entry.size());
        progress.on_entry_complete(safe_path.as_path());
    }

    report.directories_created = directories.len();
    progress.on_complete();
    Ok(report)
}

/// Creates missing parent directories and writes the payload verbatim.
fn write_file(dest: &Path, payload: &[u8]) -> Result<()> {
    let write_failed = |source| BundleError::WriteFailed {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|source| BundleError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(dest).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(payload).map_err(write_failed)?;
    writer.flush().map_err(write_failed)?;
    Ok(())
}
