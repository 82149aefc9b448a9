//! Output formatter trait for CLI results.

use anyhow::Result;
use bundleguard_core::BundleError;
use bundleguard_core::ExtractionResult;
use bundleguard_core::SlotId;
use bundleguard_core::ValidationResult;
use bundleguard_core::store::ProjectRecord;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a validation result
    fn format_validation_result(&self, archive: &Path, result: &ValidationResult) -> Result<()>;

    /// Format a completed publication
    fn format_publish_result(
        &self,
        validation: &ValidationResult,
        extraction: &ExtractionResult,
        record: &ProjectRecord,
    ) -> Result<()>;

    /// Format an extraction the core refused
    fn format_extraction_failure(&self, extraction: &ExtractionResult) -> Result<()>;

    /// Format a slot removal
    fn format_removal(&self, slot: &SlotId, removed: bool) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);

    /// Format a core failure that aborts the command
    fn format_error(&self, operation: &str, error: &BundleError);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// An error that still carries its result data.
    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
