//! Cleanup of partially written slots.

use tracing::error;
use tracing::warn;

use crate::types::SlotId;
use crate::types::StorageRoot;

/// Removes a freshly created slot directory unless committed.
///
/// Created right after the slot directory itself, so an error or panic at
/// any later point leaves nothing behind for that slot.
#[derive(Debug)]
pub struct SlotGuard<'a> {
    storage: &'a StorageRoot,
    slot: &'a SlotId,
    committed: bool,
}

impl<'a> SlotGuard<'a> {
    /// Arms a guard for a slot the caller has just created.
    #[must_use]
    pub const fn new(storage: &'a StorageRoot, slot: &'a SlotId) -> Self {
        Self {
            storage,
            slot,
            committed: false,
        }
    }

    /// Keeps the slot on drop.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.storage.remove_slot(self.slot) {
            Ok(_) => warn!(slot = %self.slot, "removed partially extracted slot"),
            Err(e) => error!(slot = %self.slot, error = %e, "failed to remove partial slot"),
        }
    }
}
