//! `dockvet scan` command handler

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info};

use dockvet_core::config::DockvetConfig;
use dockvet_inventory::{BollardRuntime, CollectorConfig, ContainerRuntime};
use dockvet_scanner::{ImageScanner, JsonVulnStore, OutputReport};

use crate::cli::{ScanArgs, ScanTarget};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config: &DockvetConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let target = args.target().ok_or_else(|| {
        CliError::Command("exactly one of --image or --container-id is required".to_owned())
    })?;

    // The DB loads before Docker is contacted.
    let store = Arc::new(JsonVulnStore::open(
        &config.store.vuln_db_path,
        &config.store.history_path,
    )?);

    let runtime = BollardRuntime::connect(&config.docker.socket)?;
    runtime.ping().await?;
    debug!(socket = %config.docker.socket, "docker daemon reachable");
    let runtime = Arc::new(runtime);
    let scanner = ImageScanner::new(runtime, store, CollectorConfig::from(&config.docker));

    let report = match target {
        ScanTarget::Image(image) => {
            info!(image = %image, "starting image scan");
            scanner.scan_image(&image).await?
        }
        ScanTarget::Container(id) => {
            info!(container_id = %id, "starting container scan");
            scanner.scan_container(&id).await?
        }
    };

    writer.render(&report)?;
    Ok(())
}

impl Render for OutputReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Image: {}", self.image_name.bold())?;
        writeln!(w, "Scanned at: {} UTC", self.timestamp)?;
        writeln!(w)?;

        if self.evaluated_packages_info.is_empty() {
            writeln!(w, "{}", "No packages found.".dimmed())?;
        } else {
            writeln!(w, "{:<40} {:<24} Status", "Product", "Version")?;
            writeln!(w, "{}", "-".repeat(72))?;
            for pkg in &self.evaluated_packages_info {
                let status = pkg.status().to_string();
                let status = if pkg.is_vulnerable() {
                    status.red().bold()
                } else {
                    status.green()
                };
                writeln!(w, "{:<40} {:<24} {}", pkg.product(), pkg.version(), status)?;
            }
        }

        writeln!(w)?;
        let summary = format!(
            "{} total, {} vulnerable, {} ok",
            self.total_products, self.vuln_products, self.ok_products
        );
        if self.vuln_products > 0 {
            writeln!(w, "Summary: {}", summary.red().bold())?;
        } else {
            writeln!(w, "Summary: {}", summary.green().bold())?;
        }

        Ok(())
    }
}
