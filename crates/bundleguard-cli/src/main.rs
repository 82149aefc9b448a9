//! Bundleguard CLI - Command-line utility for validating and publishing
//! untrusted project bundles.

mod cli;
mod commands;
mod error;
mod output;
mod progress;
mod store;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose, cli.quiet)?;

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Validate(args) => commands::validate::execute(args, &*formatter),
        cli::Commands::Publish(args) => {
            commands::publish::execute(args, &*formatter, cli.quiet || cli.json)
        }
        cli::Commands::Remove(args) => commands::remove::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool, quiet: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("bundleguard={level}").parse()?)
                .add_directive(format!("bundleguard_core={level}").parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
