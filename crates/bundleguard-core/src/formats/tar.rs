//! TAR archive format reader (plain and gzip-compressed).

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::trace;

use super::detect::ArchiveType;
use super::traits::ArchiveReader;
use super::traits::read_payload;
use crate::BundleError;
use crate::Result;
use crate::inspection::RawEntry;
use crate::security::QuotaTracker;
use crate::types::EntryKind;

/// TAR archive reader.
pub struct TarReader<R: Read> {
    archive: tar::Archive<R>,
    format: ArchiveType,
}

impl<'a> TarReader<&'a [u8]> {
    /// Creates a reader for an uncompressed tar buffer.
    #[must_use]
    pub fn plain(buffer: &'a [u8]) -> Self {
        Self {
            archive: tar::Archive::new(buffer),
            format: ArchiveType::Tar,
        }
    }
}

impl<'a> TarReader<GzDecoder<&'a [u8]>> {
    /// Creates a reader for a gzip-compressed tar buffer.
    #[must_use]
    pub fn gzip(buffer: &'a [u8]) -> Self {
        Self {
            archive: tar::Archive::new(GzDecoder::new(buffer)),
            format: ArchiveType::TarGz,
        }
    }
}

impl<R: Read> ArchiveReader for TarReader<R> {
    fn read_entries(&mut self, quota: &mut QuotaTracker) -> Result<Vec<RawEntry>> {
        let mut entries = Vec::new();

        let iter = self
            .archive
            .entries()
            .map_err(|e| BundleError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

        for entry_result in iter {
            let mut entry = entry_result.map_err(|e| {
                BundleError::InvalidArchive(format!("failed to read TAR entry: {e}"))
            })?;

            let entry_type = entry.header().entry_type();
            // Global pax headers carry metadata only (e.g. `git archive`).
            if entry_type == tar::EntryType::XGlobalHeader {
                continue;
            }

            quota.record_entry()?;

            let path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let kind = if entry_type.is_file() {
                EntryKind::File
            } else if entry_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::Other
            };

            let payload = if kind.is_file() {
                read_payload(&mut entry, &path, quota)?
            } else {
                Vec::new()
            };

            trace!(path = %path, ?kind, size = payload.len(), "read TAR entry");
            entries.push(RawEntry::new(path, payload, kind));
        }

        Ok(entries)
    }

    fn format(&self) -> ArchiveType {
        self.format
    }
}
