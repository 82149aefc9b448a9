//! Publishing policy for bundle validation and extraction.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::BundleError;
use crate::Result;

/// How a single enclosing root folder is recognized and stripped.
///
/// Archives produced by "compress this folder" tools wrap every entry in one
/// top-level directory. The candidate root is the unique first segment of all
/// entries whose path contains a separator; this rule decides whether that
/// candidate is actually stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootDetection {
    /// Strip the candidate only if every entry lives inside it and no file
    /// entry carries the candidate's name.
    #[default]
    ContainerOnly,
    /// Strip the candidate unless a file entry carries the candidate's name.
    /// Files sitting next to the folder at the top level are tolerated.
    FirstSegment,
    /// Never strip; paths are used as-is.
    Disabled,
}

/// Externally supplied publishing policy.
///
/// Nothing in the validator or extractor hard-codes file names or limits;
/// everything flows from this struct. Sets are ordered so diagnostics come
/// out in a deterministic order.
///
/// # Examples
///
/// ```
/// use bundleguard_core::PublishPolicy;
///
/// // Use secure defaults
/// let policy = PublishPolicy::default();
/// assert!(policy.required_files.contains("index.html"));
///
/// // Customize for specific needs
/// let custom = PublishPolicy::default()
///     .with_forbidden_folder("dist")
///     .with_max_archive_bytes(20 * 1024 * 1024);
/// assert!(custom.is_folder_forbidden("dist"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishPolicy {
    /// Files that must exist at the bundle's top level (after root stripping).
    pub required_files: BTreeSet<String>,

    /// Folder names that may not appear as any path segment.
    pub forbidden_folder_names: BTreeSet<String>,

    /// File names that may not appear as the final path segment.
    pub forbidden_file_names: BTreeSet<String>,

    /// Name of the manifest file parsed for project metadata.
    pub manifest_file: String,

    /// Maximum size of the compressed archive buffer in bytes.
    pub max_archive_bytes: u64,

    /// Maximum total size of all decompressed payloads in bytes.
    pub max_uncompressed_bytes: u64,

    /// Maximum number of entries (files and directories).
    pub max_entries: usize,

    /// Root folder detection rule.
    pub root_detection: RootDetection,
}

impl Default for PublishPolicy {
    /// Creates a `PublishPolicy` with the publishing defaults.
    ///
    /// Default values:
    /// - `required_files`: `["index.html", "meta.json"]`
    /// - `forbidden_folder_names`: `[".git", "node_modules"]`
    /// - `forbidden_file_names`: `[".env"]`
    /// - `manifest_file`: `"meta.json"`
    /// - `max_archive_bytes`: 10 MB
    /// - `max_uncompressed_bytes`: 100 MB
    /// - `max_entries`: 10,000
    /// - `root_detection`: `ContainerOnly`
    fn default() -> Self {
        Self {
            required_files: ["index.html", "meta.json"]
                .into_iter()
                .map(String::from)
                .collect(),
            forbidden_folder_names: [".git", "node_modules"]
                .into_iter()
                .map(String::from)
                .collect(),
            forbidden_file_names: [".env"].into_iter().map(String::from).collect(),
            manifest_file: "meta.json".to_string(),
            max_archive_bytes: 10 * 1024 * 1024,       // 10 MB
            max_uncompressed_bytes: 100 * 1024 * 1024, // 100 MB
            max_entries: 10_000,
            root_detection: RootDetection::ContainerOnly,
        }
    }
}

impl PublishPolicy {
    /// Parses a policy from TOML. Missing keys fall back to defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use bundleguard_core::PublishPolicy;
    /// use bundleguard_core::config::RootDetection;
    ///
    /// let policy = PublishPolicy::from_toml_str(
    ///     r#"
    ///     forbidden_file_names = [".env", ".npmrc"]
    ///     root_detection = "disabled"
    ///     "#,
    /// )
    /// .unwrap();
    /// assert!(policy.is_file_forbidden(".npmrc"));
    /// assert_eq!(policy.root_detection, RootDetection::Disabled);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let policy: Self = toml::from_str(source).map_err(|e| BundleError::InvalidPolicy {
            reason: e.to_string(),
        })?;
        policy.check()?;
        Ok(policy)
    }

    /// Loads a policy from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Checks internal consistency of the policy.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::InvalidPolicy` if the manifest name is empty or
    /// contains a separator, or if any limit is zero.
    pub fn check(&self) -> Result<()> {
        if self.manifest_file.is_empty()
            || self.manifest_file.contains(['/', '\\'])
            || self.manifest_file == ".."
        {
            return Err(BundleError::InvalidPolicy {
                reason: format!("manifest file name {:?} is not a plain file name", self.manifest_file),
            });
        }
        if self.max_archive_bytes == 0 || self.max_uncompressed_bytes == 0 || self.max_entries == 0 {
            return Err(BundleError::InvalidPolicy {
                reason: "size and entry limits must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns `true` if `segment` names a forbidden folder.
    ///
    /// Comparison is case-insensitive to prevent bypass on case-insensitive
    /// filesystems (Windows, macOS default).
    #[must_use]
    pub fn is_folder_forbidden(&self, segment: &str) -> bool {
        self.forbidden_folder_names
            .iter()
            .any(|banned| banned.eq_ignore_ascii_case(segment))
    }

    /// Returns `true` if `file_name` is a forbidden file name.
    ///
    /// Comparison is case-insensitive, see [`Self::is_folder_forbidden`].
    #[must_use]
    pub fn is_file_forbidden(&self, file_name: &str) -> bool {
        self.forbidden_file_names
            .iter()
            .any(|banned| banned.eq_ignore_ascii_case(file_name))
    }

    /// Adds a required top-level file.
    #[must_use]
    pub fn with_required_file(mut self, name: impl Into<String>) -> Self {
        self.required_files.insert(name.into());
        self
    }

    /// Adds a forbidden folder name.
    #[must_use]
    pub fn with_forbidden_folder(mut self, name: impl Into<String>) -> Self {
        self.forbidden_folder_names.insert(name.into());
        self
    }

    /// Adds a forbidden file name.
    #[must_use]
    pub fn with_forbidden_file(mut self, name: impl Into<String>) -> Self {
        self.forbidden_file_names.insert(name.into());
        self
    }

    /// Sets the compressed archive size ceiling.
    #[must_use]
    pub fn with_max_archive_bytes(mut self, max: u64) -> Self {
        self.max_archive_bytes = max;
        self
    }

    /// Sets the decompressed payload budget.
    #[must_use]
    pub fn with_max_uncompressed_bytes(mut self, max: u64) -> Self {
        self.max_uncompressed_bytes = max;
        self
    }

    /// Sets the maximum entry count.
    #[must_use]
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the root detection rule.
    #[must_use]
    pub fn with_root_detection(mut self, rule: RootDetection) -> Self {
        self.root_detection = rule;
        self
    }
}
