//! Validated storage root directory type.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use super::SlotId;
use crate::BundleError;
use crate::Result;

/// The directory under which every slot is materialized.
///
/// Layout contract: one directory per slot id directly under the root,
/// nothing else. A `StorageRoot` is always an absolute canonical path, and
/// [`StorageRoot::slot_path`] is the only way a slot location is computed,
/// so no caller-supplied string can change where a slot lands.
///
/// # Examples
///
/// ```no_run
/// use bundleguard_core::types::SlotId;
/// use bundleguard_core::types::StorageRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = StorageRoot::new("/srv/projects")?;
/// let slot = SlotId::parse("df26015b32025ec95e029d995e88a81c")?;
/// println!("{}", storage.slot_path(&slot).display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot(PathBuf);

impl StorageRoot {
    /// Opens (creating if necessary) a storage root.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - The path exists but is not a directory
    /// - The path cannot be canonicalized
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        std::fs::create_dir_all(&path).map_err(|e| BundleError::WriteFailed {
            path: path.clone(),
            source: e,
        })?;

        Self::open(path)
    }

    /// Opens an existing storage root without creating anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist, is not a directory, or
    /// cannot be canonicalized.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.is_dir() {
            let kind = if path.exists() {
                ErrorKind::InvalidInput
            } else {
                ErrorKind::NotFound
            };
            return Err(BundleError::Io(std::io::Error::new(
                kind,
                format!("storage root is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            BundleError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize storage root {}: {e}", path.display()),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Returns the root as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns the directory of a slot: `storageRoot/slotId`.
    #[inline]
    #[must_use]
    pub fn slot_path(&self, slot: &SlotId) -> PathBuf {
        self.0.join(slot.as_str())
    }

    /// Returns `true` if the slot directory exists.
    #[must_use]
    pub fn slot_exists(&self, slot: &SlotId) -> bool {
        self.slot_path(slot).is_dir()
    }

    /// Creates a fresh slot directory.
    ///
    /// Uses a non-recursive create so an existing slot is never merged into.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::SlotCollision` if the directory already exists,
    /// or `BundleError::WriteFailed` for any other filesystem failure.
    pub fn create_slot(&self, slot: &SlotId) -> Result<PathBuf> {
        let path = self.slot_path(slot);
        match std::fs::create_dir(&path) {
            Ok(()) => {
                debug!(slot = %slot, "created slot directory");
                Ok(path)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(BundleError::SlotCollision {
                slot: slot.to_string(),
            }),
            Err(e) => Err(BundleError::WriteFailed { path, source: e }),
        }
    }

    /// Removes a slot directory and everything under it.
    ///
    /// Removing a slot that does not exist is not an error; the return value
    /// tells whether anything was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub fn remove_slot(&self, slot: &SlotId) -> Result<bool> {
        let path = self.slot_path(slot);
        match std::fs::remove_dir_all(&path) {
            Ok(()) => {
                info!(slot = %slot, "removed slot");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BundleError::WriteFailed { path, source: e }),
        }
    }
}
