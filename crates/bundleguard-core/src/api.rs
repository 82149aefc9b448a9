//! High-level public API for bundle validation, extraction and publishing.

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::BundleError;
use crate::PublishPolicy;
use crate::Result;
use crate::extraction::SafeExtractor;
use crate::inspection::inspect;
use crate::report::ExtractionResult;
use crate::report::ProgressCallback;
use crate::report::ValidationResult;
use crate::security::PolicyValidator;
use crate::slot::SlotIdGenerator;
use crate::store::ProjectRecord;
use crate::store::ProjectStore;
use crate::types::SlotId;
use crate::types::StorageRoot;

/// How many fresh ids are tried when a slot directory already exists.
const MAX_SLOT_ATTEMPTS: usize = 3;

/// Validates a bundle without touching the filesystem.
///
/// Every problem, including an unreadable or oversized buffer, is reported
/// inside the returned [`ValidationResult`]; this function cannot fail.
///
/// # Examples
///
/// ```
/// use bundleguard_core::PublishPolicy;
/// use bundleguard_core::test_utils::valid_bundle;
/// use bundleguard_core::validate_bundle;
///
/// let result = validate_bundle(&valid_bundle(), &PublishPolicy::default());
/// assert!(result.is_valid());
/// assert_eq!(result.metadata().unwrap().title, "Demo");
///
/// let result = validate_bundle(b"not an archive", &PublishPolicy::default());
/// assert!(!result.is_valid());
/// ```
#[must_use]
pub fn validate_bundle(buffer: &[u8], policy: &PublishPolicy) -> ValidationResult {
    if let Err(e) = check_size(buffer, policy) {
        warn!(error = %e, "bundle rejected before inspection");
        return ValidationResult::with_error(e.to_string());
    }

    match inspect(buffer, policy) {
        Ok(archive) => PolicyValidator::new(policy).validate(&archive),
        Err(e) => {
            warn!(error = %e, "bundle could not be inspected");
            ValidationResult::with_error(e.to_string())
        }
    }
}

/// Extracts a bundle into the slot `slot` under `storage`.
///
/// Security and format problems come back as an unsuccessful
/// [`ExtractionResult`]; any partial output has already been removed.
///
/// # Errors
///
/// Returns an error only for conditions the uploader cannot fix: I/O
/// failures, slot collisions, or a broken random source.
pub fn extract_bundle(
    buffer: &[u8],
    slot: &SlotId,
    storage: &StorageRoot,
    policy: &PublishPolicy,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionResult> {
    check_size(buffer, policy)
        .and_then(|()| SafeExtractor::new(storage, policy).extract(buffer, slot, progress))
        .map(|_| ExtractionResult::succeeded(slot, &storage.slot_path(slot)))
        .or_else(|e| {
            if e.is_recoverable() {
                Ok(ExtractionResult::failed(slot, &e))
            } else {
                Err(e)
            }
        })
}

/// Outcome of [`publish_bundle`].
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// The bundle failed validation; nothing was written.
    Rejected(ValidationResult),

    /// Validation passed but extraction refused the bundle.
    ExtractionFailed {
        /// The validation result (valid).
        validation: ValidationResult,
        /// The failed extraction.
        extraction: ExtractionResult,
    },

    /// The bundle is on disk and recorded.
    Published {
        /// The validation result, including warnings.
        validation: ValidationResult,
        /// The successful extraction.
        extraction: ExtractionResult,
        /// The record handed to the store.
        record: ProjectRecord,
    },
}

impl PublishOutcome {
    /// Returns `true` for [`PublishOutcome::Published`].
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    /// Returns the validation result of any outcome.
    #[must_use]
    pub const fn validation(&self) -> &ValidationResult {
        match self {
            Self::Rejected(validation)
            | Self::ExtractionFailed { validation, .. }
            | Self::Published { validation, .. } => validation,
        }
    }
}

/// Runs the full publish flow: validate, mint a slot id, extract, record.
///
/// # Errors
///
/// Returns an error if the filesystem, the random source, or the store
/// fails. When the store rejects the record, the freshly extracted slot is
/// removed before the error is returned.
///
/// # Examples
///
/// ```
/// use bundleguard_core::NoopProgress;
/// use bundleguard_core::PublishPolicy;
/// use bundleguard_core::publish_bundle;
/// use bundleguard_core::slot::OsSlotIds;
/// use bundleguard_core::store::InMemoryProjectStore;
/// use bundleguard_core::test_utils::valid_bundle;
/// use bundleguard_core::types::StorageRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let storage = StorageRoot::new(temp.path())?;
/// let store = InMemoryProjectStore::new();
///
/// let outcome = publish_bundle(
///     &valid_bundle(),
///     "user-42",
///     &PublishPolicy::default(),
///     &storage,
///     &OsSlotIds,
///     &store,
///     &mut NoopProgress,
/// )?;
/// assert!(outcome.is_published());
/// assert_eq!(store.records().len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn publish_bundle(
    buffer: &[u8],
    owner: &str,
    policy: &PublishPolicy,
    storage: &StorageRoot,
    ids: &dyn SlotIdGenerator,
    store: &dyn ProjectStore,
    progress: &mut dyn ProgressCallback,
) -> Result<PublishOutcome> {
    let validation = validate_bundle(buffer, policy);
    if !validation.is_valid() {
        return Ok(PublishOutcome::Rejected(validation));
    }
    let Some(metadata) = validation.metadata().cloned() else {
        return Ok(PublishOutcome::Rejected(validation));
    };

    let mut attempt = 1;
    let (slot, extraction) = loop {
        let slot = ids.new_id()?;
        match extract_bundle(buffer, &slot, storage, policy, progress) {
            Err(BundleError::SlotCollision { .. }) if attempt < MAX_SLOT_ATTEMPTS => {
                warn!(slot = %slot, attempt, "slot id collision, retrying");
                attempt += 1;
            }
            other => break (slot, other?),
        }
    };

    if !extraction.success {
        return Ok(PublishOutcome::ExtractionFailed {
            validation,
            extraction,
        });
    }

    let record = ProjectRecord {
        slot_id: slot.clone(),
        owner_reference: owner.to_string(),
        metadata,
        published: true,
    };
    if let Err(e) = store.save(&record) {
        warn!(slot = %slot, error = %e, "store rejected record, removing slot");
        if let Err(cleanup) = storage.remove_slot(&slot) {
            error!(slot = %slot, error = %cleanup, "failed to remove unrecorded slot");
        }
        return Err(e);
    }

    info!(slot = %slot, owner, "published bundle");
    Ok(PublishOutcome::Published {
        validation,
        extraction,
        record,
    })
}

/// Deletes a published slot. Removing a missing slot is not an error.
///
/// # Errors
///
/// Returns an error if the slot exists but cannot be removed.
pub fn remove_bundle(storage: &StorageRoot, slot: &SlotId) -> Result<bool> {
    storage.remove_slot(slot)
}

/// Rejects buffers above the policy's archive size ceiling.
fn check_size(buffer: &[u8], policy: &PublishPolicy) -> Result<()> {
    let size = u64::try_from(buffer.len()).unwrap_or(u64::MAX);
    if size > policy.max_archive_bytes {
        return Err(BundleError::ArchiveTooLarge {
            size,
            max: policy.max_archive_bytes,
        });
    }
    Ok(())
}
