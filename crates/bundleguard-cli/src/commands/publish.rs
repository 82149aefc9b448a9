//! Publish command implementation.

use super::read_archive;
use crate::cli::PublishArgs;
use crate::error::report_bundle_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use crate::store::JsonLinesStore;
use anyhow::Result;
use anyhow::bail;
use bundleguard_core::NoopProgress;
use bundleguard_core::ProgressCallback;
use bundleguard_core::PublishOutcome;
use bundleguard_core::StorageRoot;
use bundleguard_core::publish_bundle;
use bundleguard_core::slot::OsSlotIds;
use bundleguard_core::store::InMemoryProjectStore;
use bundleguard_core::store::ProjectStore;
use tracing::debug;
use tracing::info;
use tracing::warn;

pub fn execute(args: &PublishArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let policy = args.policy.resolve()?;
    let buffer = read_archive(&args.archive)?;
    debug!(bytes = buffer.len(), root_detection = ?policy.root_detection, "read bundle");
    let storage = report_bundle_error(
        StorageRoot::new(&args.storage.storage_root),
        "publish",
        &args.storage.storage_root,
        formatter,
    )?;

    let store: Box<dyn ProjectStore> = match &args.records {
        Some(path) => Box::new(JsonLinesStore::new(path)),
        None => Box::new(InMemoryProjectStore::new()),
    };

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let mut progress: Box<dyn ProgressCallback> = if !quiet && CliProgress::should_show() {
        Box::new(CliProgress::new("Publishing"))
    } else {
        Box::new(NoopProgress)
    };

    let outcome = report_bundle_error(
        publish_bundle(
            &buffer,
            &args.owner,
            &policy,
            &storage,
            &OsSlotIds,
            store.as_ref(),
            progress.as_mut(),
        ),
        "publish",
        &args.archive,
        formatter,
    )?;
    drop(progress);

    match outcome {
        PublishOutcome::Rejected(validation) => {
            formatter.format_validation_result(&args.archive, &validation)?;
            bail!(
                "Bundle failed validation with {} error(s)",
                validation.errors().len()
            );
        }
        PublishOutcome::ExtractionFailed { extraction, .. } => {
            warn!(slot = %extraction.slot_id, "extraction refused after validation passed");
            formatter.format_extraction_failure(&extraction)?;
            bail!("Bundle could not be extracted");
        }
        PublishOutcome::Published {
            validation,
            extraction,
            record,
        } => {
            info!(
                slot = %record.slot_id,
                owner = %record.owner_reference,
                warnings = validation.warnings().len(),
                "published bundle from {}",
                args.archive.display()
            );
            formatter.format_publish_result(&validation, &extraction, &record)
        }
    }
}
