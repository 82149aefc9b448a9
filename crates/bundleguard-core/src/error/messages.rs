//! Client-facing error payloads.
//!
//! Converts a [`BundleError`] into a small structured payload suitable for an
//! HTTP response body or machine-readable CLI output.

use std::path::Path;

use serde::Serialize;

use super::types::BundleError;

/// Error payload returned to clients when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Stable error code (e.g., `PATH_TRAVERSAL`, `IO_ERROR`).
    pub code: &'static str,

    /// Human-readable error description.
    pub message: String,

    /// Optional additional context for operators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl BundleError {
    /// Formats the error as a client payload.
    ///
    /// Archive-internal paths are shown as-is because the client supplied
    /// them. Host paths are reduced to their final component when
    /// `sanitize_paths` is set so storage layout does not leak.
    ///
    /// # Examples
    ///
    /// ```
    /// use bundleguard_core::BundleError;
    /// use std::path::PathBuf;
    ///
    /// let error = BundleError::WriteFailed {
    ///     path: PathBuf::from("/srv/projects/0123/index.html"),
    ///     source: std::io::Error::other("disk full"),
    /// };
    ///
    /// let payload = error.to_payload(true);
    /// assert_eq!(payload.code, "WRITE_FAILED");
    /// assert!(!payload.message.contains("/srv/projects"));
    /// ```
    #[must_use]
    pub fn to_payload(&self, sanitize_paths: bool) -> ErrorPayload {
        match self {
            Self::WriteFailed { path, source } => ErrorPayload {
                code: self.error_code(),
                message: format!(
                    "failed to write {}: {source}",
                    format_path(path, sanitize_paths)
                ),
                context: Some(source.kind().to_string()),
            },

            Self::Io(io_err) => ErrorPayload {
                code: self.error_code(),
                message: io_err.to_string(),
                context: Some(io_err.kind().to_string()),
            },

            Self::ForbiddenFolder { folder, .. } => ErrorPayload {
                code: self.error_code(),
                message: self.to_string(),
                context: Some(format!("folder: {folder}")),
            },

            Self::QuotaExceeded { resource } => ErrorPayload {
                code: self.error_code(),
                message: resource.to_string(),
                context: None,
            },

            _ => ErrorPayload {
                code: self.error_code(),
                message: self.to_string(),
                context: None,
            },
        }
    }

    /// Returns the error code as a static string.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::WriteFailed { .. } => "WRITE_FAILED",
            Self::InvalidArchive(_) => "INVALID_ARCHIVE",
            Self::EmptyArchive => "EMPTY_ARCHIVE",
            Self::ArchiveTooLarge { .. } => "ARCHIVE_TOO_LARGE",
            Self::MissingRequiredFile { .. } => "MISSING_REQUIRED_FILE",
            Self::ManifestNotFound { .. } => "MANIFEST_NOT_FOUND",
            Self::InvalidManifest { .. } => "INVALID_MANIFEST",
            Self::MissingManifestField { .. } => "MISSING_MANIFEST_FIELD",
            Self::PathTraversal { .. } => "PATH_TRAVERSAL",
            Self::ForbiddenFolder { .. } => "FORBIDDEN_FOLDER",
            Self::ForbiddenFile { .. } => "FORBIDDEN_FILE",
            Self::PathConflict { .. } => "PATH_CONFLICT",
            Self::UnsupportedEntry { .. } => "UNSUPPORTED_ENTRY",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::SlotCollision { .. } => "SLOT_COLLISION",
            Self::InvalidSlotId(_) => "INVALID_SLOT_ID",
            Self::RandomSource(_) => "RANDOM_SOURCE",
            Self::InvalidPolicy { .. } => "INVALID_POLICY",
            Self::Store { .. } => "STORE_FAILURE",
        }
    }
}

/// Formats a host path for error messages.
///
/// If `sanitize` is true, only returns the file name.
fn format_path(path: &Path, sanitize: bool) -> String {
    if sanitize {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
            .to_string()
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuotaResource;
    use std::path::PathBuf;

    #[test]
    fn test_path_sanitization() {
        let error = BundleError::WriteFailed {
            path: PathBuf::from("/srv/projects/abc/index.html"),
            source: std::io::Error::other("boom"),
        };

        let msg = error.to_payload(false);
        assert!(msg.message.contains("/srv/projects/abc/index.html"));

        let msg = error.to_payload(true);
        assert!(msg.message.contains("index.html"));
        assert!(!msg.message.contains("/srv/"));
    }

    #[test]
    fn test_archive_paths_are_not_sanitized() {
        let error = BundleError::PathTraversal {
            path: "a/../../etc/passwd".into(),
        };
        let msg = error.to_payload(true);
        assert_eq!(msg.code, "PATH_TRAVERSAL");
        assert_eq!(msg.message, "invalid path detected: a/../../etc/passwd");
    }

    #[test]
    fn test_forbidden_folder_context() {
        let error = BundleError::ForbiddenFolder {
            path: ".git/config".into(),
            folder: ".git".into(),
        };
        let msg = error.to_payload(true);
        assert_eq!(msg.context.as_deref(), Some("folder: .git"));
    }

    #[test]
    fn test_all_error_variants_have_codes() {
        let errors = vec![
            BundleError::Io(std::io::Error::other("test")),
            BundleError::WriteFailed {
                path: PathBuf::from("x"),
                source: std::io::Error::other("test"),
            },
            BundleError::InvalidArchive("test".into()),
            BundleError::EmptyArchive,
            BundleError::ArchiveTooLarge { size: 2, max: 1 },
            BundleError::MissingRequiredFile {
                name: "index.html".into(),
            },
            BundleError::ManifestNotFound {
                manifest: "meta.json".into(),
            },
            BundleError::InvalidManifest {
                manifest: "meta.json".into(),
                reason: "eof".into(),
            },
            BundleError::MissingManifestField {
                manifest: "meta.json".into(),
                field: "title",
            },
            BundleError::PathTraversal { path: "../x".into() },
            BundleError::ForbiddenFolder {
                path: ".git/HEAD".into(),
                folder: ".git".into(),
            },
            BundleError::ForbiddenFile { path: ".env".into() },
            BundleError::UnsupportedEntry {
                path: "link".into(),
            },
            BundleError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            },
            BundleError::SlotCollision { slot: "ab".into() },
            BundleError::InvalidSlotId("..".into()),
            BundleError::RandomSource("test".into()),
            BundleError::InvalidPolicy {
                reason: "test".into(),
            },
            BundleError::Store {
                reason: "test".into(),
            },
        ];

        for error in errors {
            let code = error.error_code();
            assert!(!code.is_empty(), "Error code should not be empty");

            let msg = error.to_payload(false);
            assert_eq!(msg.code, code);
            assert!(!msg.message.is_empty());
        }
    }
}
