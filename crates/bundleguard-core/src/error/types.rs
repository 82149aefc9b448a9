//! Error types for bundle validation and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `BundleError`.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Represents a specific inspection limit that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// Too many entries in the archive.
    EntryCount {
        /// Entries seen so far.
        current: usize,
        /// Maximum allowed entry count.
        max: usize,
    },
    /// Decompressed payloads exceed the in-memory budget.
    UncompressedSize {
        /// Bytes read so far.
        current: u64,
        /// Maximum allowed decompressed bytes.
        max: u64,
    },
    /// Integer overflow detected in quota tracking.
    IntegerOverflow,
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryCount { current, max } => {
                write!(f, "quota exceeded: entry count ({current} > {max})")
            }
            Self::UncompressedSize { current, max } => {
                write!(f, "quota exceeded: uncompressed size ({current} > {max})")
            }
            Self::IntegerOverflow => {
                write!(f, "quota exceeded: integer overflow in quota tracking")
            }
        }
    }
}

/// Coarse classification of a [`BundleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The buffer is not a readable archive, or the manifest is not parseable.
    Format,
    /// A required file or manifest field is absent.
    Structural,
    /// Traversal, forbidden content, or a resource limit.
    Security,
    /// Filesystem failure while materializing a slot.
    Io,
    /// Configuration, randomness, or collaborator failures.
    Internal,
}

/// Errors that can occur while validating or extracting a bundle.
///
/// The `Display` output of the validation-time variants is the exact
/// diagnostic string that ends up in `ValidationResult::errors`.
#[derive(Error, Debug)]
pub enum BundleError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a file or directory under a slot failed.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        /// Host path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The buffer is not a readable archive.
    #[error("archive could not be read: {0}")]
    InvalidArchive(String),

    /// The archive has no entries at all.
    #[error("archive is empty")]
    EmptyArchive,

    /// The buffer exceeds the configured size ceiling.
    #[error("archive exceeds maximum size ({size} > {max} bytes)")]
    ArchiveTooLarge {
        /// Buffer size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        max: u64,
    },

    /// A required file is absent at the bundle's top level.
    #[error("missing required file: {name}")]
    MissingRequiredFile {
        /// Name of the missing file.
        name: String,
    },

    /// The manifest could not be located.
    #[error("{manifest} not found")]
    ManifestNotFound {
        /// Manifest file name.
        manifest: String,
    },

    /// The manifest is not a parseable JSON object.
    #[error("{manifest} is not valid JSON: {reason}")]
    InvalidManifest {
        /// Manifest file name.
        manifest: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A mandatory manifest field is missing, empty, or not a string.
    #[error("{manifest} must include a non-empty \"{field}\"")]
    MissingManifestField {
        /// Manifest file name.
        manifest: String,
        /// Field name.
        field: &'static str,
    },

    /// Path traversal, absolute path, or NUL byte in an entry name.
    #[error("invalid path detected: {path}")]
    PathTraversal {
        /// Entry path as found in the archive (separators normalized).
        path: String,
    },

    /// An entry lives inside a forbidden folder.
    #[error("forbidden folder detected: {path}")]
    ForbiddenFolder {
        /// Entry path.
        path: String,
        /// The matching folder segment.
        folder: String,
    },

    /// An entry has a forbidden file name.
    #[error("forbidden file detected: {path}")]
    ForbiddenFile {
        /// Entry path.
        path: String,
    },

    /// A file entry sits where another entry needs a folder (`a` and `a/b`).
    #[error("path used as both file and folder: {path}")]
    PathConflict {
        /// Entry path of the conflicting file.
        path: String,
    },

    /// Symlinks, hardlinks, devices and other non-regular entries.
    #[error("unsupported entry type: {path}")]
    UnsupportedEntry {
        /// Entry path.
        path: String,
    },

    /// An inspection limit was exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// The slot directory already exists.
    #[error("slot already exists: {slot}")]
    SlotCollision {
        /// The colliding slot id.
        slot: String,
    },

    /// A slot id string is not a well-formed identifier.
    #[error("invalid slot id: {0}")]
    InvalidSlotId(String),

    /// The secure random source failed.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// The publish policy is unusable.
    #[error("invalid policy: {reason}")]
    InvalidPolicy {
        /// Reason the policy was rejected.
        reason: String,
    },

    /// The persistence collaborator rejected a record.
    #[error("project store failure: {reason}")]
    Store {
        /// Collaborator-provided reason.
        reason: String,
    },
}

impl BundleError {
    /// Returns the category this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use bundleguard_core::BundleError;
    /// use bundleguard_core::error::ErrorCategory;
    ///
    /// let err = BundleError::PathTraversal {
    ///     path: "a/../../etc/passwd".into(),
    /// };
    /// assert_eq!(err.category(), ErrorCategory::Security);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArchive(_) | Self::EmptyArchive | Self::InvalidManifest { .. } => {
                ErrorCategory::Format
            }
            Self::MissingRequiredFile { .. }
            | Self::ManifestNotFound { .. }
            | Self::MissingManifestField { .. }
            | Self::PathConflict { .. } => ErrorCategory::Structural,
            Self::PathTraversal { .. }
            | Self::ForbiddenFolder { .. }
            | Self::ForbiddenFile { .. }
            | Self::UnsupportedEntry { .. }
            | Self::QuotaExceeded { .. }
            | Self::ArchiveTooLarge { .. }
            | Self::InvalidSlotId(_) => ErrorCategory::Security,
            Self::Io(_) | Self::WriteFailed { .. } => ErrorCategory::Io,
            Self::SlotCollision { .. }
            | Self::RandomSource(_)
            | Self::InvalidPolicy { .. }
            | Self::Store { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns `true` if this error represents a security violation.
    ///
    /// Security violations are always fatal to the operation; they are never
    /// downgraded to warnings.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self.category(), ErrorCategory::Security)
    }

    /// Returns `true` if the caller can recover by submitting a corrected
    /// archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use bundleguard_core::BundleError;
    ///
    /// let err = BundleError::MissingRequiredFile {
    ///     name: "index.html".into(),
    /// };
    /// assert!(err.is_recoverable());
    ///
    /// let err = BundleError::Io(std::io::Error::other("disk full"));
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Format | ErrorCategory::Structural | ErrorCategory::Security
        )
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }
}
