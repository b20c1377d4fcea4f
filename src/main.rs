//! nested-installer - command-line entry point
//!
//! Loads a manifest, runs nested installer resolution and validation for
//! every installer entry, and reports the outcome.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use nested_installer::cli::{Cli, Commands};
use nested_installer::{InstallerValidationCoordinator, Manifest, ManifestReport, ValidationPolicy};

/// Initialize logging; `RUST_LOG` overrides the default level
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    let policy = match &cli.policy {
        Some(path) => {
            info!("Loading validation policy: {:?}", path);
            ValidationPolicy::load_from_file(path)?
        }
        None => ValidationPolicy::default(),
    };
    let coordinator = InstallerValidationCoordinator::new(policy);

    match cli.command {
        Commands::Validate { manifest } => {
            let report = run(&coordinator, &manifest)?;
            print_report(&report);
            if !report.is_valid() {
                error!(
                    "{} of {} installer(s) failed validation",
                    report.invalid_count(),
                    report.outcomes.len()
                );
                std::process::exit(1);
            }
        }
        Commands::Resolve { manifest, pretty } => {
            let report = run(&coordinator, &manifest)?;
            let published: Vec<_> = report.valid_installers().map(|i| i.to_rest()).collect();
            let json = if pretty {
                serde_json::to_string_pretty(&published)?
            } else {
                serde_json::to_string(&published)?
            };
            println!("{}", json);
            for (index, errors) in report.failures() {
                error!("Installer #{} skipped: {}", index, errors);
            }
        }
    }

    Ok(())
}

fn run(coordinator: &InstallerValidationCoordinator, path: &Path) -> Result<ManifestReport> {
    info!("Processing manifest: {:?}", path);
    let manifest = Manifest::from_file(path)?;
    Ok(coordinator.process_manifest(&manifest))
}

fn print_report(report: &ManifestReport) {
    println!("{} {}", report.package_identifier, report.package_version);
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(installer) => {
                let nested = installer
                    .nested_installer_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "none".to_string());
                let files = installer
                    .nested_installer_files
                    .as_ref()
                    .map(|f| f.len().to_string())
                    .unwrap_or_else(|| "none".to_string());
                println!(
                    "  ✓ installer #{} ({}): nested type {}, files {}",
                    outcome.index, installer.installer_type, nested, files
                );
            }
            Err(errors) => {
                println!("  ✗ installer #{}: {}", outcome.index, errors);
            }
        }
    }
}
