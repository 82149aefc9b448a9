//! Inspection quota tracking.
//!
//! Payloads are read fully into memory, so entry count and decompressed size
//! are capped while reading rather than after the fact.

use crate::BundleError;
use crate::PublishPolicy;
use crate::Result;
use crate::error::QuotaResource;

/// Tracks resource usage while reading an archive.
#[derive(Debug)]
pub struct QuotaTracker {
    entries: usize,
    bytes: u64,
    max_entries: usize,
    max_bytes: u64,
}

impl QuotaTracker {
    /// Creates a tracker with explicit limits.
    #[must_use]
    pub const fn new(max_entries: usize, max_bytes: u64) -> Self {
        Self {
            entries: 0,
            bytes: 0,
            max_entries,
            max_bytes,
        }
    }

    /// Creates a tracker from the policy's inspection limits.
    #[must_use]
    pub const fn from_policy(policy: &PublishPolicy) -> Self {
        Self::new(policy.max_entries, policy.max_uncompressed_bytes)
    }

    /// Records one more entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry count limit is exceeded.
    pub fn record_entry(&mut self) -> Result<()> {
        self.entries = self
            .entries
            .checked_add(1)
            .ok_or(BundleError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            })?;

        if self.entries > self.max_entries {
            return Err(BundleError::QuotaExceeded {
                resource: QuotaResource::EntryCount {
                    current: self.entries,
                    max: self.max_entries,
                },
            });
        }
        Ok(())
    }

    /// Records decompressed payload bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the byte budget is exceeded.
    pub fn record_bytes(&mut self, size: u64) -> Result<()> {
        self.bytes = self
            .bytes
            .checked_add(size)
            .ok_or(BundleError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            })?;

        if self.bytes > self.max_bytes {
            return Err(BundleError::QuotaExceeded {
                resource: QuotaResource::UncompressedSize {
                    current: self.bytes,
                    max: self.max_bytes,
                },
            });
        }
        Ok(())
    }

    /// Bytes that may still be read before the budget is exceeded.
    #[must_use]
    pub const fn remaining_bytes(&self) -> u64 {
        self.max_bytes.saturating_sub(self.bytes)
    }

    /// Returns the number of entries recorded.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Returns the decompressed bytes recorded.
    #[must_use]
    pub const fn bytes(&self) -> u64 {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_tracker_new() {
        let tracker = QuotaTracker::from_policy(&PublishPolicy::default());
        assert_eq!(tracker.entries(), 0);
        assert_eq!(tracker.bytes(), 0);
        assert_eq!(tracker.remaining_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_quota_tracker_exceed_entry_count() {
        let mut tracker = QuotaTracker::new(2, 1000);
        assert!(tracker.record_entry().is_ok());
        assert!(tracker.record_entry().is_ok());
        let result = tracker.record_entry();
        assert!(matches!(
            result,
            Err(BundleError::QuotaExceeded {
                resource: QuotaResource::EntryCount { current: 3, max: 2 }
            })
        ));
    }

    #[test]
    fn test_quota_tracker_exceed_bytes() {
        let mut tracker = QuotaTracker::new(10, 1000);
        assert!(tracker.record_bytes(600).is_ok());
        assert_eq!(tracker.remaining_bytes(), 400);
        let result = tracker.record_bytes(500);
        assert!(matches!(result, Err(BundleError::QuotaExceeded { .. })));
    }

    #[test]
    fn test_quota_tracker_overflow() {
        let mut tracker = QuotaTracker::new(10, u64::MAX);
        assert!(tracker.record_bytes(u64::MAX).is_ok());
        let result = tracker.record_bytes(1);
        assert!(matches!(
            result,
            Err(BundleError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow
            })
        ));
    }
}
