//! Subcommand implementations.

pub mod completion;
pub mod publish;
pub mod remove;
pub mod validate;

use anyhow::Context;
use anyhow::Result;
use std::path::Path;

/// Reads a bundle into memory.
fn read_archive(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read bundle '{}'", path.display()))
}
