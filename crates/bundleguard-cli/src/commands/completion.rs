//! Shell completion generation command.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

/// Generates shell completions for the specified shell.
pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "bundleguard", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_mentions_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let mut cmd = Cli::command();
            let mut output = Vec::new();
            clap_complete::generate(shell, &mut cmd, "bundleguard", &mut output);

            let script = String::from_utf8_lossy(&output);
            assert!(script.contains("publish"), "{shell:?} completion lacks publish");
            assert!(script.contains("validate"), "{shell:?} completion lacks validate");
        }
    }
}
