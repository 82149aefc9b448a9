//! CLI argument parsing using clap.

use anyhow::Context;
use anyhow::Result;
use bundleguard_core::PublishPolicy;
use bundleguard_core::RootDetection;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bundleguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a bundle without writing anything
    Validate(ValidateArgs),
    /// Validate, extract and record a bundle
    Publish(PublishArgs),
    /// Delete a published slot
    Remove(RemoveArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the bundle archive (zip, tar, tar.gz)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(clap::Args)]
pub struct PublishArgs {
    /// Path to the bundle archive (zip, tar, tar.gz)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Owner reference stored with the project record
    #[arg(long, default_value = "cli")]
    pub owner: String,

    /// Append project records to this JSON lines file
    #[arg(long, value_name = "FILE")]
    pub records: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct RemoveArgs {
    /// Slot identifier (32 lowercase hex characters)
    #[arg(value_name = "SLOT_ID")]
    pub slot_id: String,

    #[command(flatten)]
    pub storage: StorageArgs,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(clap::Args)]
pub struct StorageArgs {
    /// Directory holding published slots
    #[arg(long, env = "BUNDLEGUARD_STORAGE_ROOT", value_name = "DIR")]
    pub storage_root: PathBuf,
}

#[derive(clap::Args, Default)]
pub struct PolicyArgs {
    /// Load the publishing policy from a TOML file
    #[arg(long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Maximum archive size (e.g. 10M)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_size: Option<u64>,

    /// Maximum total decompressed size (e.g. 100M)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_uncompressed_size: Option<u64>,

    /// Maximum number of archive entries
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_entries: Option<u64>,

    /// Additional required top-level file (can be repeated)
    #[arg(long = "require", value_name = "FILE")]
    pub require: Vec<String>,

    /// Additional forbidden folder name (can be repeated)
    #[arg(long = "forbid-folder", value_name = "NAME")]
    pub forbid_folder: Vec<String>,

    /// Additional forbidden file name (can be repeated)
    #[arg(long = "forbid-file", value_name = "NAME")]
    pub forbid_file: Vec<String>,

    /// Root folder detection rule
    #[arg(long, value_enum)]
    pub root_detection: Option<RootDetectionArg>,
}

impl PolicyArgs {
    /// Layers flags over the policy file over the defaults.
    pub fn resolve(&self) -> Result<PublishPolicy> {
        let mut policy = match &self.policy {
            Some(path) => PublishPolicy::load(path)
                .with_context(|| format!("failed to load policy '{}'", path.display()))?,
            None => PublishPolicy::default(),
        };

        if let Some(max) = self.max_size {
            policy = policy.with_max_archive_bytes(max);
        }
        if let Some(max) = self.max_uncompressed_size {
            policy = policy.with_max_uncompressed_bytes(max);
        }
        if let Some(max) = self.max_entries {
            let max = usize::try_from(max).context("--max-entries is too large")?;
            policy = policy.with_max_entries(max);
        }
        for name in &self.require {
            policy = policy.with_required_file(name.as_str());
        }
        for name in &self.forbid_folder {
            policy = policy.with_forbidden_folder(name.as_str());
        }
        for name in &self.forbid_file {
            policy = policy.with_forbidden_file(name.as_str());
        }
        if let Some(rule) = self.root_detection {
            policy = policy.with_root_detection(rule.into());
        }

        policy.check()?;
        Ok(policy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RootDetectionArg {
    /// Strip a single folder only if it contains every entry
    ContainerOnly,
    /// Strip a single folder even with loose top-level files next to it
    FirstSegment,
    /// Never strip a root folder
    Disabled,
}

impl From<RootDetectionArg> for RootDetection {
    fn from(arg: RootDetectionArg) -> Self {
        match arg {
            RootDetectionArg::ContainerOnly => Self::ContainerOnly,
            RootDetectionArg::FirstSegment => Self::FirstSegment,
            RootDetectionArg::Disabled => Self::Disabled,
        }
    }
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
        .and_then(|n| {
            if n == 0 {
                Err("byte size must be greater than zero".to_string())
            } else {
                Ok(n)
            }
        })
}
