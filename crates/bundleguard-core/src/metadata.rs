//! Project manifest parsing.
//!
//! The manifest (`meta.json` by default) is a JSON object with mandatory
//! `title` and `description` strings and an optional `tech` list. Malformed
//! optional data produces warnings; malformed mandatory data is an error.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::BundleError;
use crate::PublishPolicy;
use crate::Result;
use crate::inspection::InspectedArchive;

/// UTF-8 byte order mark, tolerated at the start of a manifest.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Project metadata declared by a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// Project title, never blank.
    pub title: String,

    /// Project description, never blank.
    pub description: String,

    /// Technologies used; empty when not declared.
    #[serde(default)]
    pub tech: Vec<String>,
}

/// Parsed metadata plus non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedManifest {
    /// The validated metadata.
    pub metadata: ProjectMetadata,

    /// Warnings about ignored optional data.
    pub warnings: Vec<String>,
}

/// Locates and parses a bundle's manifest.
#[derive(Debug, Clone, Copy)]
pub struct MetadataExtractor<'a> {
    policy: &'a PublishPolicy,
}

impl<'a> MetadataExtractor<'a> {
    /// Creates an extractor for the policy's manifest file name.
    #[must_use]
    pub const fn new(policy: &'a PublishPolicy) -> Self {
        Self { policy }
    }

    /// Finds the manifest at the bundle's top level and parses it.
    ///
    /// If the archive holds the manifest more than once, the last copy wins,
    /// matching what extraction would leave on disk.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::ManifestNotFound`, `BundleError::InvalidManifest`
    /// or `BundleError::MissingManifestField`.
    pub fn extract(&self, archive: &InspectedArchive) -> Result<ParsedManifest> {
        let name = self.policy.manifest_file.as_str();
        let entry = archive
            .files()
            .filter(|entry| entry.relative() == name)
            .last()
            .ok_or_else(|| BundleError::ManifestNotFound {
                manifest: name.to_string(),
            })?;
        parse_manifest(name, entry.payload())
    }
}

/// Parses manifest bytes.
///
/// # Errors
///
/// Returns `BundleError::InvalidManifest` if the bytes are not a JSON object,
/// or `BundleError::MissingManifestField` if `title` or `description` is
/// absent, not a string, or blank.
///
/// # Examples
///
/// ```
/// use bundleguard_core::metadata::parse_manifest;
///
/// let parsed =
///     parse_manifest("meta.json", br#"{"title":"Demo","description":"A demo","tech":["js"]}"#)
///         .unwrap();
/// assert_eq!(parsed.metadata.title, "Demo");
/// assert_eq!(parsed.metadata.tech, vec!["js"]);
///
/// assert!(parse_manifest("meta.json", br#"{"title":"","description":"x"}"#).is_err());
/// ```
pub fn parse_manifest(manifest: &str, bytes: &[u8]) -> Result<ParsedManifest> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| BundleError::InvalidManifest {
            manifest: manifest.to_string(),
            reason: e.to_string(),
        })?;

    let Value::Object(fields) = document else {
        return Err(BundleError::InvalidManifest {
            manifest: manifest.to_string(),
            reason: "expected a JSON object".to_string(),
        });
    };

    let required = |field: &'static str| -> Result<String> {
        fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(String::from)
            .ok_or_else(|| BundleError::MissingManifestField {
                manifest: manifest.to_string(),
                field,
            })
    };

    let title = required("title")?;
    let description = required("description")?;

    let mut warnings = Vec::new();
    let tech = match fields.get("tech") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let tech: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect();
            if tech.len() != items.len() {
                warnings.push(format!(
                    "ignored {} non-string value(s) in \"tech\" of {manifest}",
                    items.len() - tech.len()
                ));
            }
            tech
        }
        Some(_) => {
            warnings.push(format!(
                "\"tech\" in {manifest} is not a list of strings; ignoring it"
            ));
            Vec::new()
        }
    };

    Ok(ParsedManifest {
        metadata: ProjectMetadata {
            title,
            description,
            tech,
        },
        warnings,
    })
}
