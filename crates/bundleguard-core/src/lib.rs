//! Untrusted project bundle validation and isolated extraction.
//!
//! `bundleguard-core` takes an attacker-controlled archive (zip, tar or
//! tar.gz) as an in-memory buffer, checks it against a [`PublishPolicy`],
//! and writes it into a fresh, randomly named slot directory without ever
//! writing outside that directory.
//!
//! The pipeline, leaves first:
//!
//! - [`inspection`]: reads entries, normalizes separators, detects a single
//!   enclosing root folder.
//! - [`security`]: applies required-file and per-entry safety rules,
//!   collecting every violation.
//! - [`metadata`]: parses the project manifest.
//! - [`extraction`]: writes files into `storage_root/slot_id`, re-checking
//!   every path on its own.
//! - [`slot`]: mints 128-bit random slot ids.
//!
//! # Examples
//!
//! ```no_run
//! use bundleguard_core::NoopProgress;
//! use bundleguard_core::PublishPolicy;
//! use bundleguard_core::extract_bundle;
//! use bundleguard_core::slot::OsSlotIds;
//! use bundleguard_core::slot::SlotIdGenerator;
//! use bundleguard_core::types::StorageRoot;
//! use bundleguard_core::validate_bundle;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let buffer = std::fs::read("upload.zip")?;
//! let policy = PublishPolicy::default();
//!
//! let validation = validate_bundle(&buffer, &policy);
//! if !validation.is_valid() {
//!     for error in validation.errors() {
//!         eprintln!("{error}");
//!     }
//!     return Ok(());
//! }
//!
//! let storage = StorageRoot::new("/srv/projects")?;
//! let slot = OsSlotIds.new_id()?;
//! let result = extract_bundle(&buffer, &slot, &storage, &policy, &mut NoopProgress)?;
//! println!("published at {}", result.storage_path);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod inspection;
pub mod metadata;
pub mod publisher;
pub mod report;
pub mod security;
pub mod slot;
pub mod store;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::PublishOutcome;
pub use api::extract_bundle;
pub use api::publish_bundle;
pub use api::remove_bundle;
pub use api::validate_bundle;
pub use config::PublishPolicy;
pub use config::RootDetection;
pub use error::BundleError;
pub use error::Result;
pub use metadata::ProjectMetadata;
pub use publisher::Publisher;
pub use publisher::PublisherBuilder;
pub use report::BundleStructure;
pub use report::ExtractionReport;
pub use report::ExtractionResult;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::ValidationResult;

// Re-export types module for easier access
pub use types::SafePath;
pub use types::SlotId;
pub use types::StorageRoot;
