//! Common traits for archive format readers.

use std::io::Read;

use super::detect::ArchiveType;
use crate::BundleError;
use crate::Result;
use crate::inspection::RawEntry;
use crate::security::QuotaTracker;

/// Trait for archive format readers.
///
/// A reader enumerates every entry of an in-memory archive, in archive
/// order, charging each entry and payload against the quota.
pub trait ArchiveReader {
    /// Reads all entries.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::InvalidArchive` if the archive is malformed, or
    /// `BundleError::QuotaExceeded` if it is larger than the quota allows.
    fn read_entries(&mut self, quota: &mut QuotaTracker) -> Result<Vec<RawEntry>>;

    /// Returns the archive format.
    fn format(&self) -> ArchiveType;
}

/// Reads an entry payload without letting it exceed the remaining budget.
///
/// The reader is capped one byte past the budget so an overrun is detected
/// no matter what size the entry header claims.
pub(crate) fn read_payload<R: Read>(
    reader: &mut R,
    path: &str,
    quota: &mut QuotaTracker,
) -> Result<Vec<u8>> {
    let limit = quota.remaining_bytes().saturating_add(1);
    let mut payload = Vec::new();
    reader
        .take(limit)
        .read_to_end(&mut payload)
        .map_err(|e| BundleError::InvalidArchive(format!("failed to read {path}: {e}")))?;
    quota.record_bytes(u64::try_from(payload.len()).unwrap_or(u64::MAX))?;
    Ok(payload)
}
