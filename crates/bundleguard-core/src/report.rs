//! Result shapes for validation and extraction.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::BundleError;
use crate::error::ErrorPayload;
use crate::formats::ArchiveType;
use crate::metadata::ProjectMetadata;
use crate::types::SlotId;

/// Outcome of a validate-only pass.
///
/// Problems are data, not `Err`: every failed rule appends a message to
/// `errors`, and the bundle is valid exactly when no error was recorded.
/// Fields are private so that invariant cannot be broken from outside.
///
/// # Examples
///
/// ```
/// use bundleguard_core::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid());
///
/// result.push_warning("tech should be a list");
/// assert!(result.is_valid());
///
/// result.push_error("missing required file: index.html");
/// assert!(!result.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    metadata: Option<ProjectMetadata>,
    structure: Option<BundleStructure>,
}

impl ValidationResult {
    /// Creates an empty, valid result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            metadata: None,
            structure: None,
        }
    }

    /// Creates a result holding a single error.
    #[must_use]
    pub fn with_error(message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.push_error(message);
        result
    }

    /// Records an error; the result becomes invalid.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    /// Records a warning. Warnings never affect validity.
    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Attaches the parsed project metadata.
    pub fn set_metadata(&mut self, metadata: ProjectMetadata) {
        self.metadata = Some(metadata);
    }

    /// Attaches the structure summary.
    pub fn set_structure(&mut self, structure: BundleStructure) {
        self.structure = Some(structure);
    }

    /// Returns `true` if no error was recorded.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Errors in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Warnings in the order they were found.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Parsed metadata, present only for valid bundles.
    #[must_use]
    pub const fn metadata(&self) -> Option<&ProjectMetadata> {
        self.metadata.as_ref()
    }

    /// Structure summary, present whenever the archive could be read.
    #[must_use]
    pub const fn structure(&self) -> Option<&BundleStructure> {
        self.structure.as_ref()
    }

    /// Consumes the result and returns the metadata.
    #[must_use]
    pub fn into_metadata(self) -> Option<ProjectMetadata> {
        self.metadata
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of what an archive contains, after root stripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStructure {
    /// Detected archive format.
    pub format: ArchiveType,

    /// Root folder that was stripped, if any.
    pub root_folder: Option<String>,

    /// Number of regular file entries.
    pub file_count: usize,

    /// Number of directory entries.
    pub directory_count: usize,

    /// Total decompressed size of all files.
    pub total_bytes: u64,

    /// Sorted, distinct top-level names after root stripping.
    pub top_level: Vec<String>,
}

/// Outcome of an extraction call.
///
/// # Examples
///
/// ```
/// use bundleguard_core::BundleError;
/// use bundleguard_core::ExtractionResult;
/// use bundleguard_core::types::SlotId;
///
/// let slot = SlotId::parse("df26015b32025ec95e029d995e88a81c").unwrap();
/// let error = BundleError::PathTraversal { path: "../x".into() };
/// let result = ExtractionResult::failed(&slot, &error);
/// assert!(!result.success);
/// assert_eq!(result.storage_path, "");
/// assert_eq!(result.error.unwrap().code, "PATH_TRAVERSAL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Whether the tree was fully written.
    pub success: bool,

    /// Slot the bundle was (or would have been) written to.
    pub slot_id: String,

    /// Absolute path of the slot directory; empty on failure.
    pub storage_path: String,

    /// Failure payload, with host paths reduced to file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl ExtractionResult {
    /// A successful extraction into `storage_path`.
    #[must_use]
    pub fn succeeded(slot: &SlotId, storage_path: &Path) -> Self {
        Self {
            success: true,
            slot_id: slot.to_string(),
            storage_path: storage_path.display().to_string(),
            error: None,
        }
    }

    /// A rejected extraction. Nothing is left on disk for the slot.
    #[must_use]
    pub fn failed(slot: &SlotId, error: &BundleError) -> Self {
        Self {
            success: false,
            slot_id: slot.to_string(),
            storage_path: String::new(),
            error: Some(error.to_payload(true)),
        }
    }
}

/// Statistics of a completed extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of files written.
    pub files_written: usize,

    /// Number of directories created below the slot directory.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of items materialized.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.files_written + self.directories_created
    }
}

/// Callback trait for progress reporting during extraction.
///
/// The trait requires `Send` so a progress sink can live on a worker thread.
///
/// # Examples
///
/// ```
/// use bundleguard_core::ProgressCallback;
/// use std::path::Path;
///
/// struct Counter {
///     bytes: u64,
/// }
///
/// impl ProgressCallback for Counter {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, bytes: u64) {
///         self.bytes += bytes;
///     }
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {
///         println!("wrote {} bytes", self.bytes);
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an entry is written.
    ///
    /// # Arguments
    ///
    /// * `path` - Slot-relative path of the entry
    /// * `total` - Number of entries in the archive
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called after payload bytes are written.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once after the last entry.
    fn on_complete(&mut self);
}

/// Progress sink that ignores every event.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
