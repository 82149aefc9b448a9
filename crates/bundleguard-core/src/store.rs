//! Persistence collaborator for published projects.
//!
//! Extraction owns the files; what a project *is* (its metadata and who
//! uploaded it) belongs to whatever database the host application uses.
//! [`ProjectStore`] is that seam.

use std::sync::Mutex;

use serde::Serialize;

use crate::BundleError;
use crate::Result;
use crate::metadata::ProjectMetadata;
use crate::types::SlotId;

/// The permanent record of a published bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Slot holding the extracted tree.
    pub slot_id: SlotId,

    /// Opaque reference to the uploading owner.
    pub owner_reference: String,

    /// Validated project metadata.
    pub metadata: ProjectMetadata,

    /// Whether the project is publicly visible.
    pub published: bool,
}

/// Stores project records once extraction succeeds.
///
/// Implementations must be shareable between threads; uploads are processed
/// concurrently.
pub trait ProjectStore: Send + Sync {
    /// Persists a record.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::Store` if the record cannot be saved. The caller
    /// removes the slot in that case.
    fn save(&self, record: &ProjectRecord) -> Result<()>;
}

/// Thread-safe in-process store, mostly useful for tests and tooling.
///
/// # Examples
///
/// ```
/// use bundleguard_core::store::InMemoryProjectStore;
///
/// let store = InMemoryProjectStore::new();
/// assert!(store.records().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    records: Mutex<Vec<ProjectRecord>>,
}

impl InMemoryProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all saved records.
    #[must_use]
    pub fn records(&self) -> Vec<ProjectRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Finds the record for a slot.
    #[must_use]
    pub fn find(&self, slot: &SlotId) -> Option<ProjectRecord> {
        self.records
            .lock()
            .ok()?
            .iter()
            .find(|record| &record.slot_id == slot)
            .cloned()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn save(&self, record: &ProjectRecord) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| BundleError::Store {
            reason: "record lock poisoned".to_string(),
        })?;
        records.push(record.clone());
        Ok(())
    }
}
