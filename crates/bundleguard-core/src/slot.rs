//! Slot identifier generation.
//!
//! Slot ids name a project's storage directory and its public URL segment.
//! Collisions are avoided structurally by drawing 128 bits from the operating
//! system's CSPRNG; no counters, timestamps, or user input are involved.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::BundleError;
use crate::Result;
use crate::types::SlotId;
use crate::types::slot_id::SLOT_ID_BYTES;

/// Source of fresh slot identifiers.
///
/// This is the injectable seam for id generation: production code uses
/// [`OsSlotIds`], tests can supply deterministic ids.
pub trait SlotIdGenerator: Send + Sync {
    /// Produces a new, previously unused identifier.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::RandomSource` if the random source fails.
    fn new_id(&self) -> Result<SlotId>;
}

/// Slot ids drawn from the operating system's secure random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSlotIds;

impl SlotIdGenerator for OsSlotIds {
    fn new_id(&self) -> Result<SlotId> {
        let mut bytes = [0u8; SLOT_ID_BYTES];
        getrandom::fill(&mut bytes).map_err(|e| BundleError::RandomSource(e.to_string()))?;
        Ok(SlotId::from_bytes(bytes))
    }
}

/// Deterministic slot ids for tests and reproducible tooling.
///
/// Ids encode a counter in the low bytes, so they are unique per instance
/// but entirely predictable. Never use this for real storage.
#[derive(Debug, Default)]
pub struct SequentialSlotIds {
    next: AtomicU64,
}

impl SequentialSlotIds {
    /// Creates a generator whose first id encodes `start`.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl SlotIdGenerator for SequentialSlotIds {
    fn new_id(&self) -> Result<SlotId> {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; SLOT_ID_BYTES];
        bytes[SLOT_ID_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Ok(SlotId::from_bytes(bytes))
    }
}
