//! Validate command implementation.

use super::read_archive;
use crate::cli::ValidateArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use bundleguard_core::validate_bundle;

pub fn execute(args: &ValidateArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let policy = args.policy.resolve()?;
    let buffer = read_archive(&args.archive)?;

    let result = validate_bundle(&buffer, &policy);
    formatter.format_validation_result(&args.archive, &result)?;

    if !result.is_valid() {
        bail!(
            "Bundle failed validation with {} error(s)",
            result.errors().len()
        );
    }
    Ok(())
}
