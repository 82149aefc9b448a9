//! ZIP archive format reader.

use std::io::Cursor;

use tracing::trace;

use super::detect::ArchiveType;
use super::traits::ArchiveReader;
use super::traits::read_payload;
use crate::BundleError;
use crate::Result;
use crate::inspection::RawEntry;
use crate::security::QuotaTracker;
use crate::types::EntryKind;

/// File type bits of a Unix mode.
const S_IFMT: u32 = 0o170_000;

/// Symlink file type.
const S_IFLNK: u32 = 0o120_000;

/// ZIP archive reader over an in-memory buffer.
pub struct ZipReader<'a> {
    archive: zip::ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ZipReader<'a> {
    /// Opens a ZIP archive by parsing its central directory.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::InvalidArchive` if the central directory cannot
    /// be read.
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(buffer))
            .map_err(|e| BundleError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;
        Ok(Self { archive })
    }
}

impl ArchiveReader for ZipReader<'_> {
    fn read_entries(&mut self, quota: &mut QuotaTracker) -> Result<Vec<RawEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());

        for index in 0..self.archive.len() {
            quota.record_entry()?;

            let mut file = self.archive.by_index(index).map_err(|e| {
                BundleError::InvalidArchive(format!("failed to read ZIP entry {index}: {e}"))
            })?;

            let path = file.name().to_string();
            let kind = if file.is_dir() {
                EntryKind::Directory
            } else if file.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
                EntryKind::Other
            } else {
                EntryKind::File
            };

            let payload = if kind.is_file() {
                read_payload(&mut file, &path, quota)?
            } else {
                Vec::new()
            };

            trace!(path = %path, ?kind, size = payload.len(), "read ZIP entry");
            entries.push(RawEntry::new(path, payload, kind));
        }

        Ok(entries)
    }

    fn format(&self) -> ArchiveType {
        ArchiveType::Zip
    }
}
