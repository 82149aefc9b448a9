//! Error conversion utilities for CLI.
//!
//! Converts bundleguard-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use crate::output::OutputFormatter;
use anyhow::anyhow;
use bundleguard_core::BundleError;
use std::path::Path;

/// Converts `BundleError` to user-friendly anyhow error with context
pub fn convert_bundle_error(err: BundleError, subject: &Path) -> anyhow::Error {
    match err {
        BundleError::ArchiveTooLarge { size, max } => {
            anyhow!(
                "Bundle '{}' is too large: {size} bytes (limit {max} bytes)\n\
                 HINT: Use --max-size to raise the limit if the bundle is legitimate.",
                subject.display()
            )
        }
        BundleError::QuotaExceeded { resource } => {
            anyhow!(
                "Inspection limit exceeded for '{}': {resource}\n\
                 HINT: Use --max-entries or --max-uncompressed-size to increase limits.",
                subject.display()
            )
        }
        BundleError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid bundle '{}': {reason}\n\
                 HINT: Supported formats: zip, tar, tar.gz",
                subject.display()
            )
        }
        BundleError::InvalidSlotId(id) => {
            anyhow!(
                "Invalid slot id '{id}'\n\
                 HINT: Slot ids are exactly 32 lowercase hexadecimal characters."
            )
        }
        BundleError::SlotCollision { slot } => {
            anyhow!(
                "Slot '{slot}' already exists under '{}'\n\
                 HINT: Retry the upload; a fresh slot id is drawn each time.",
                subject.display()
            )
        }
        BundleError::InvalidPolicy { reason } => {
            anyhow!(
                "Invalid publishing policy: {reason}\n\
                 HINT: Check the --policy file and limit flags."
            )
        }
        BundleError::Store { reason } => {
            anyhow!(
                "Could not record project for '{}': {reason}\n\
                 HINT: The extracted slot was removed; check the --records file.",
                subject.display()
            )
        }
        BundleError::WriteFailed { path, source } => {
            anyhow!(
                "I/O error while writing '{}': {source}",
                path.display()
            )
        }
        BundleError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {io_err}",
                subject.display()
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing bundle '{}'", subject.display())),
    }
}

/// Reports a failed core call through the formatter, then adds context
pub fn report_bundle_error<T>(
    result: Result<T, BundleError>,
    operation: &str,
    subject: &Path,
    formatter: &dyn OutputFormatter,
) -> anyhow::Result<T> {
    result.map_err(|e| {
        formatter.format_error(operation, &e);
        convert_bundle_error(e, subject)
    })
}
