//! Bundle validation orchestrator.
//!
//! This module provides the `PolicyValidator` type that applies the
//! publishing policy to an inspected archive and collects every violation
//! into a single [`ValidationResult`].

use std::collections::BTreeSet;
use std::collections::HashSet;

use tracing::debug;
use tracing::warn;

use crate::BundleError;
use crate::PublishPolicy;
use crate::inspection::InspectedArchive;
use crate::metadata::MetadataExtractor;
use crate::report::ValidationResult;
use crate::security::rules::check_entry;
use crate::security::rules::find_path_conflicts;

/// Applies a [`PublishPolicy`] to an inspected archive.
///
/// Validation never short-circuits across rules or entries: required-file
/// checks and per-entry checks all run, and the caller sees every problem
/// at once. Only the per-entry rules stop at the first failure for that
/// entry. The manifest is parsed only when everything else passed.
///
/// # Examples
///
/// ```
/// use bundleguard_core::PublishPolicy;
/// use bundleguard_core::inspection::inspect;
/// use bundleguard_core::security::PolicyValidator;
/// use bundleguard_core::test_utils::ZipTestBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let buffer = ZipTestBuilder::new()
///     .add_file("index.html", b"<p>hi</p>")
///     .add_file(".env", b"SECRET=1")
///     .build();
///
/// let policy = PublishPolicy::default();
/// let archive = inspect(&buffer, &policy)?;
/// let result = PolicyValidator::new(&policy).validate(&archive);
///
/// assert!(!result.is_valid());
/// assert_eq!(
///     result.errors(),
///     ["missing required file: meta.json", "forbidden file detected: .env"]
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PolicyValidator<'a> {
    policy: &'a PublishPolicy,
}

impl<'a> PolicyValidator<'a> {
    /// Creates a validator for the given policy.
    #[must_use]
    pub const fn new(policy: &'a PublishPolicy) -> Self {
        Self { policy }
    }

    /// Validates an inspected archive.
    #[must_use]
    pub fn validate(&self, archive: &InspectedArchive) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.set_structure(archive.structure());

        if archive.is_empty() {
            result.push_error(BundleError::EmptyArchive.to_string());
            return result;
        }

        if let Some(warning) = archive.root().warning() {
            result.push_warning(warning);
        }

        self.check_required_files(archive, &mut result);
        self.check_entries(archive, &mut result);
        for conflict in find_path_conflicts(archive.entries()) {
            result.push_error(conflict.to_string());
        }
        check_duplicates(archive, &mut result);

        if result.is_valid() {
            match MetadataExtractor::new(self.policy).extract(archive) {
                Ok(parsed) => {
                    for warning in parsed.warnings {
                        result.push_warning(warning);
                    }
                    result.set_metadata(parsed.metadata);
                }
                Err(e) => result.push_error(e.to_string()),
            }
        }

        debug!(
            valid = result.is_valid(),
            errors = result.errors().len(),
            warnings = result.warnings().len(),
            "validated bundle"
        );
        result
    }

    fn check_required_files(&self, archive: &InspectedArchive, result: &mut ValidationResult) {
        for name in &self.policy.required_files {
            if !archive.files().any(|entry| entry.relative() == name) {
                result.push_error(
                    BundleError::MissingRequiredFile {
                        name: name.clone(),
                    }
                    .to_string(),
                );
            }
        }
    }

    fn check_entries(&self, archive: &InspectedArchive, result: &mut ValidationResult) {
        for entry in archive.entries() {
            if let Err(e) = check_entry(entry, self.policy) {
                warn!(path = %entry.path(), code = e.error_code(), "entry rejected");
                result.push_error(e.to_string());
            }
        }
    }
}

/// Warns about file paths that occur more than once after normalization.
fn check_duplicates(archive: &InspectedArchive, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    let duplicates: BTreeSet<&str> = archive
        .files()
        .map(|entry| entry.relative())
        .filter(|relative| !relative.is_empty() && !seen.insert(*relative))
        .collect();

    for path in duplicates {
        result.push_warning(format!(
            "duplicate entry `{path}`; the last copy will be used"
        ));
    }
}
