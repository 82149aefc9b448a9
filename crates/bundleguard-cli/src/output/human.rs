//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use bundleguard_core::BundleError;
use bundleguard_core::ExtractionResult;
use bundleguard_core::SlotId;
use bundleguard_core::ValidationResult;
use bundleguard_core::store::ProjectRecord;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn headline(&self, ok: bool, message: &str) {
        let line = match (self.use_colors, ok) {
            (true, true) => format!("{} {message}", style("✓").green().bold()),
            (true, false) => format!("{} {message}", style("✗").red().bold()),
            (false, _) => message.to_string(),
        };
        let _ = self.term.write_line(&line);
    }

    fn list(&self, title: &str, items: &[String], error: bool) {
        if items.is_empty() {
            return;
        }
        let _ = self.term.write_line("");
        if self.use_colors {
            let title = if error {
                style(title).red().bold()
            } else {
                style(title).yellow().bold()
            };
            let _ = self.term.write_line(&format!("{title}"));
        } else {
            let _ = self.term.write_line(title);
        }
        for item in items {
            let _ = self.term.write_line(&format!("  - {item}"));
        }
    }

    fn details(&self, result: &ValidationResult) {
        if let Some(structure) = result.structure() {
            let _ = self
                .term
                .write_line(&format!("  Format:       {}", structure.format));
            if let Some(root) = &structure.root_folder {
                let _ = self.term.write_line(&format!("  Root folder:  {root}/"));
            }
            let _ = self.term.write_line(&format!(
                "  Files:        {} ({})",
                structure.file_count,
                humanize_bytes(structure.total_bytes)
            ));
            if self.verbose {
                let _ = self
                    .term
                    .write_line(&format!("  Directories:  {}", structure.directory_count));
                let _ = self
                    .term
                    .write_line(&format!("  Top level:    {}", structure.top_level.join(", ")));
            }
        }

        if let Some(metadata) = result.metadata() {
            let _ = self
                .term
                .write_line(&format!("  Title:        {}", metadata.title));
            if self.verbose {
                let _ = self
                    .term
                    .write_line(&format!("  Description:  {}", metadata.description));
                if !metadata.tech.is_empty() {
                    let _ = self
                        .term
                        .write_line(&format!("  Tech:         {}", metadata.tech.join(", ")));
                }
            }
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_validation_result(&self, archive: &Path, result: &ValidationResult) -> Result<()> {
        // Errors are shown even in quiet mode
        if result.is_valid() {
            if self.quiet {
                return Ok(());
            }
            self.headline(true, &format!("{} is valid", archive.display()));
        } else {
            self.headline(false, &format!("{} failed validation", archive.display()));
        }

        if !self.quiet {
            self.details(result);
        }
        self.list("Errors:", result.errors(), true);
        if !self.quiet {
            self.list("Warnings:", result.warnings(), false);
        }
        Ok(())
    }

    fn format_publish_result(
        &self,
        validation: &ValidationResult,
        extraction: &ExtractionResult,
        record: &ProjectRecord,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(true, &format!("Published \"{}\"", record.metadata.title));
        let _ = self
            .term
            .write_line(&format!("  Slot:         {}", extraction.slot_id));
        let _ = self
            .term
            .write_line(&format!("  Path:         {}", extraction.storage_path));
        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Owner:        {}", record.owner_reference));
        }
        self.list("Warnings:", validation.warnings(), false);
        Ok(())
    }

    fn format_extraction_failure(&self, extraction: &ExtractionResult) -> Result<()> {
        self.headline(false, "Extraction refused; nothing was published");
        if let Some(error) = &extraction.error {
            let _ = self
                .term
                .write_line(&format!("  Reason:       {}", error.message));
        }
        Ok(())
    }

    fn format_removal(&self, slot: &SlotId, removed: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        if removed {
            self.headline(true, &format!("Removed slot {slot}"));
        } else {
            self.format_warning(&format!("slot {slot} does not exist"));
        }
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }

    // The converted anyhow error is printed on stderr by main
    fn format_error(&self, _operation: &str, _error: &BundleError) {}
}
