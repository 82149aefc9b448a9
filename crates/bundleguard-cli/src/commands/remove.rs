//! Remove command implementation.

use crate::cli::RemoveArgs;
use crate::error::report_bundle_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use bundleguard_core::SlotId;
use bundleguard_core::StorageRoot;
use bundleguard_core::remove_bundle;
use tracing::info;

pub fn execute(args: &RemoveArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = &args.storage.storage_root;

    // Parse before touching the filesystem so a hostile id never reaches a path.
    let slot = report_bundle_error(SlotId::parse(&args.slot_id), "remove", root, formatter)?;
    let storage = report_bundle_error(StorageRoot::open(root), "remove", root, formatter)?;

    let removed = report_bundle_error(remove_bundle(&storage, &slot), "remove", root, formatter)?;
    info!(slot = %slot, removed, "remove finished");
    formatter.format_removal(&slot, removed)
}
