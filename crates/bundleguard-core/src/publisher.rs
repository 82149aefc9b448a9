//! Publisher facade and builder.

use std::path::PathBuf;
use std::sync::Arc;

use crate::BundleError;
use crate::PublishPolicy;
use crate::Result;
use crate::api;
use crate::api::PublishOutcome;
use crate::report::ProgressCallback;
use crate::report::ValidationResult;
use crate::slot::OsSlotIds;
use crate::slot::SlotIdGenerator;
use crate::store::InMemoryProjectStore;
use crate::store::ProjectStore;
use crate::types::SlotId;
use crate::types::StorageRoot;

/// Bundles a policy, a storage root, an id source and a store.
///
/// A `Publisher` holds no per-upload state and is `Send + Sync`, so one
/// instance can serve many concurrent uploads.
pub struct Publisher {
    policy: PublishPolicy,
    storage: StorageRoot,
    ids: Box<dyn SlotIdGenerator>,
    store: Arc<dyn ProjectStore>,
}

impl Publisher {
    /// Starts building a publisher.
    #[must_use]
    pub fn builder() -> PublisherBuilder {
        PublisherBuilder::default()
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> &PublishPolicy {
        &self.policy
    }

    /// Returns the storage root.
    #[must_use]
    pub const fn storage(&self) -> &StorageRoot {
        &self.storage
    }

    /// Validates a bundle without writing anything.
    #[must_use]
    pub fn validate(&self, buffer: &[u8]) -> ValidationResult {
        api::validate_bundle(buffer, &self.policy)
    }

    /// Validates, extracts and records a bundle.
    ///
    /// # Errors
    ///
    /// See [`api::publish_bundle`].
    pub fn publish(
        &self,
        buffer: &[u8],
        owner: &str,
        progress: &mut dyn ProgressCallback,
    ) -> Result<PublishOutcome> {
        api::publish_bundle(
            buffer,
            owner,
            &self.policy,
            &self.storage,
            self.ids.as_ref(),
            self.store.as_ref(),
            progress,
        )
    }

    /// Removes a slot directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be removed.
    pub fn remove(&self, slot: &SlotId) -> Result<bool> {
        api::remove_bundle(&self.storage, slot)
    }
}

/// Builder for configuring a [`Publisher`].
///
/// # Examples
///
/// ```no_run
/// use bundleguard_core::PublishPolicy;
/// use bundleguard_core::Publisher;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let publisher = Publisher::builder()
///     .storage_root("/srv/projects")
///     .policy(PublishPolicy::default().with_forbidden_file(".npmrc"))
///     .build()?;
/// let result = publisher.validate(&std::fs::read("bundle.zip")?);
/// println!("valid: {}", result.is_valid());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PublisherBuilder {
    storage_root: Option<PathBuf>,
    policy: Option<PublishPolicy>,
    ids: Option<Box<dyn SlotIdGenerator>>,
    store: Option<Arc<dyn ProjectStore>>,
}

impl PublisherBuilder {
    /// Sets the storage root directory.
    #[must_use]
    pub fn storage_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_root = Some(path.into());
        self
    }

    /// Sets the publishing policy.
    #[must_use]
    pub fn policy(mut self, policy: PublishPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the slot id source. Defaults to [`OsSlotIds`].
    #[must_use]
    pub fn slot_ids(mut self, ids: impl SlotIdGenerator + 'static) -> Self {
        self.ids = Some(Box::new(ids));
        self
    }

    /// Sets the project store. Defaults to an [`InMemoryProjectStore`].
    #[must_use]
    pub fn store(mut self, store: Arc<dyn ProjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the publisher, opening the storage root.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage root is not set or cannot be opened,
    /// or if the policy is inconsistent.
    pub fn build(self) -> Result<Publisher> {
        let root = self.storage_root.ok_or_else(|| BundleError::InvalidPolicy {
            reason: "storage root not set".to_string(),
        })?;
        let policy = self.policy.unwrap_or_default();
        policy.check()?;

        Ok(Publisher {
            policy,
            storage: StorageRoot::new(root)?,
            ids: self.ids.unwrap_or_else(|| Box::new(OsSlotIds)),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryProjectStore::new())),
        })
    }
}
