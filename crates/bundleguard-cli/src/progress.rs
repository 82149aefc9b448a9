//! Progress bar implementation for CLI operations.

use bundleguard_core::ProgressCallback;
use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use std::fmt::Write;
use std::path::Path;

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// The bar's length is unknown until extraction reports the entry total, so
/// it starts empty and is sized by the first `on_entry_start`. Displays file
/// count, bytes written and elapsed time when running in a TTY.
pub struct CliProgress {
    bar: ProgressBar,
    bytes_written: u64,
}

impl CliProgress {
    /// Creates a new CLI progress bar.
    ///
    /// # Arguments
    ///
    /// * `message` - Message to display (e.g., "Publishing")
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(0);

        // Template: "Publishing [████████░░░░] 42/100 files (15.2 MB, 3s)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files ({prefix}, {elapsed_short})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("elapsed_short", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.elapsed())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        bar.set_message(message.to_string());

        Self {
            bar,
            bytes_written: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn refresh_bytes(&self) {
        self.bar.set_prefix(humanize_bytes(self.bytes_written));
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, _path: &Path, total: usize, _current: usize) {
        let total = u64::try_from(total).unwrap_or(u64::MAX);
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        self.refresh_bytes();
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
