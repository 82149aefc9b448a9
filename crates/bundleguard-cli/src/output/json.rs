//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use bundleguard_core::BundleError;
use bundleguard_core::ExtractionResult;
use bundleguard_core::ProjectMetadata;
use bundleguard_core::SlotId;
use bundleguard_core::ValidationResult;
use bundleguard_core::store::ProjectRecord;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

/// Publish data: the extraction result plus what the store recorded.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishOutput<'a> {
    #[serde(flatten)]
    extraction: &'a ExtractionResult,
    owner_reference: &'a str,
    metadata: &'a ProjectMetadata,
    warnings: &'a [String],
}

impl OutputFormatter for JsonFormatter {
    fn format_validation_result(&self, _archive: &Path, result: &ValidationResult) -> Result<()> {
        let output = if result.is_valid() {
            JsonOutput::success("validate", result)
        } else {
            JsonOutput::failure("validate", result, "bundle failed validation")
        };
        Self::output(&output)
    }

    fn format_publish_result(
        &self,
        validation: &ValidationResult,
        extraction: &ExtractionResult,
        record: &ProjectRecord,
    ) -> Result<()> {
        let data = PublishOutput {
            extraction,
            owner_reference: &record.owner_reference,
            metadata: &record.metadata,
            warnings: validation.warnings(),
        };
        Self::output(&JsonOutput::success("publish", data))
    }

    fn format_extraction_failure(&self, extraction: &ExtractionResult) -> Result<()> {
        let message = extraction
            .error
            .as_ref()
            .map_or_else(|| "extraction failed".to_string(), |payload| payload.message.clone());
        Self::output(&JsonOutput::failure("publish", extraction, message))
    }

    fn format_removal(&self, slot: &SlotId, removed: bool) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct RemovalOutput<'a> {
            slot_id: &'a SlotId,
            removed: bool,
        }

        Self::output(&JsonOutput::success(
            "remove",
            RemovalOutput {
                slot_id: slot,
                removed,
            },
        ))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }

    fn format_error(&self, operation: &str, error: &BundleError) {
        let output = JsonOutput::failure(operation, error.to_payload(true), error.to_string());
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_output_is_flat() {
        let slot = SlotId::parse("df26015b32025ec95e029d995e88a81c").unwrap();
        let extraction = ExtractionResult::succeeded(&slot, Path::new("/srv/p/df26"));
        let metadata = ProjectMetadata {
            title: "Demo".to_string(),
            description: "A demo".to_string(),
            tech: Vec::new(),
        };
        let data = PublishOutput {
            extraction: &extraction,
            owner_reference: "owner",
            metadata: &metadata,
            warnings: &[],
        };

        let json = serde_json::to_value(JsonOutput::success("publish", data)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["success"], true);
        assert_eq!(json["data"]["slotId"], "df26015b32025ec95e029d995e88a81c");
        assert_eq!(json["data"]["storagePath"], "/srv/p/df26");
        assert_eq!(json["data"]["metadata"]["title"], "Demo");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_extraction_failure_carries_payload() {
        let slot = SlotId::parse("df26015b32025ec95e029d995e88a81c").unwrap();
        let error = BundleError::PathConflict {
            path: "a".to_string(),
        };
        let extraction = ExtractionResult::failed(&slot, &error);
        let message = extraction.error.as_ref().unwrap().message.clone();

        let json =
            serde_json::to_value(JsonOutput::failure("publish", &extraction, message)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "path used as both file and folder: a");
        assert_eq!(json["data"]["error"]["code"], "PATH_CONFLICT");
        assert_eq!(json["data"]["storagePath"], "");
    }

    #[test]
    fn test_error_payload_hides_host_paths() {
        let error = BundleError::WriteFailed {
            path: std::path::PathBuf::from("/srv/projects/df26/index.html"),
            source: std::io::Error::other("disk full"),
        };
        let json = serde_json::to_value(JsonOutput::failure(
            "publish",
            error.to_payload(true),
            error.to_string(),
        ))
        .unwrap();
        assert_eq!(json["data"]["code"], "WRITE_FAILED");
        assert!(!json["data"]["message"].as_str().unwrap().contains("/srv"));
    }

    #[test]
    fn test_failure_keeps_data() {
        let result = ValidationResult::with_error("archive is empty");
        let json =
            serde_json::to_value(JsonOutput::failure("validate", &result, "bundle failed validation"))
                .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"]["isValid"], false);
        assert_eq!(json["data"]["errors"][0], "archive is empty");
    }
}
