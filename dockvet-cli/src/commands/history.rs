//! `dockvet history` command handler

use std::io::Write;

use serde::Serialize;

use dockvet_core::config::DockvetConfig;
use dockvet_scanner::{HistoryReport, JsonVulnStore, VulnStore, format_output_timestamp};

use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `history` command.
///
/// Reads the history file only; neither the vulnerability database nor the
/// container runtime is touched.
pub fn execute(
    args: HistoryArgs,
    config: &DockvetConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let store = JsonVulnStore::history_only(&config.store.history_path);
    let reports = store.get_history(&args.image)?;
    tracing::debug!(image = %args.image, reports = reports.len(), "loaded scan history");

    writer.render(&HistoryOutput {
        image: args.image,
        reports,
    })?;
    Ok(())
}

/// Stored reports for one image.
pub struct HistoryOutput {
    pub image: String,
    pub reports: Vec<HistoryReport>,
}

// JSON output is the bare list of stored reports.
impl Serialize for HistoryOutput {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.reports.serialize(serializer)
    }
}

impl Render for HistoryOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "History: {}", self.image.bold())?;
        if self.reports.is_empty() {
            writeln!(w, "{}", "No stored scans.".dimmed())?;
            return Ok(());
        }

        writeln!(w, "{:<28} {:>8} {:>8} {:>8}", "Scanned at (UTC)", "Total", "Vuln", "OK")?;
        writeln!(w, "{}", "-".repeat(56))?;
        for report in &self.reports {
            let vuln = format!("{:>8}", report.vuln_products());
            let vuln = if report.vuln_products() > 0 {
                vuln.red()
            } else {
                vuln.normal()
            };
            writeln!(
                w,
                "{:<28} {:>8} {} {:>8}",
                format_output_timestamp(report.timestamp()),
                report.total_products(),
                vuln,
                report.ok_products()
            )?;
        }
        Ok(())
    }
}
