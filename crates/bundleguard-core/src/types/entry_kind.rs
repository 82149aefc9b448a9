//! Archive entry kind enumeration.

use serde::Serialize;

/// Kind of entry found in an archive.
///
/// Only regular files and directories are ever materialized. Everything else
/// (symlinks, hardlinks, device nodes, FIFOs) is carried as `Other` so the
/// validator can reject it by name.
///
/// # Examples
///
/// ```
/// use bundleguard_core::types::EntryKind;
///
/// assert!(EntryKind::File.is_file());
/// assert!(EntryKind::Directory.is_directory());
/// assert!(!EntryKind::Other.is_file());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symlink, hardlink, device or any other special entry.
    Other,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}
