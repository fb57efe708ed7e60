use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use orcamate::orchestrator::{run_conversion, ConversionReport, ConversionRequest};
use orcamate::profile::catalog::ProfileCatalog;
use orcamate::profile::paths::OrcaPaths;
use orcamate::profile::types::NozzleSize;

#[derive(Parser)]
#[command(name = "orcamate")]
#[command(about = "Batch nozzle-size variants for OrcaSlicer filament profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered filament profiles grouped by material
    List {
        /// Profile directory (default: auto-detected OrcaSlicer user dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Create nozzle-size variants from an existing size
    Convert {
        /// Source nozzle size to copy from (e.g. 0.4)
        #[arg(long)]
        from: NozzleSize,
        /// Target nozzle size to create (e.g. 0.6)
        #[arg(long)]
        to: NozzleSize,
        /// Profile directory (default: auto-detected OrcaSlicer user dir)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Derive from the material's base profile when the source size is missing
        #[arg(long)]
        use_base_template: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { dir } => {
            let dir = resolve_profile_dir(dir)?;
            let catalog = ProfileCatalog::build(&dir)?;
            render_catalog(&catalog);
        }
        Commands::Convert {
            from,
            to,
            dir,
            use_base_template,
        } => {
            let dir = resolve_profile_dir(dir)?;
            let report = run_conversion(&ConversionRequest {
                profile_dir: dir,
                source: from,
                target: to,
                use_base_template,
            })?;
            render_report(&report);
        }
    }

    Ok(())
}

/// Use the given directory, or fall back to OrcaSlicer auto-detection.
/// Multiple user installs are ambiguous and must be disambiguated with
/// an explicit --dir.
fn resolve_profile_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir);
    }

    let paths = OrcaPaths::detect()?;
    let users = paths.user_profile_dirs()?;
    match users.as_slice() {
        [] => bail!(
            "no OrcaSlicer user profiles found under {} -- pass --dir explicitly",
            paths.user_root.display()
        ),
        [(user_id, dir)] => {
            info!("Using profiles of the only user: {}", user_id);
            Ok(dir.clone())
        }
        many => {
            let ids: Vec<&str> = many.iter().map(|(id, _)| id.as_str()).collect();
            bail!(
                "multiple OrcaSlicer users found ({}) -- pass --dir explicitly",
                ids.join(", ")
            )
        }
    }
}

fn render_catalog(catalog: &ProfileCatalog) {
    println!(
        "{} profiles in {} material groups ({})",
        catalog.profile_count(),
        catalog.groups.len(),
        catalog.dir.display()
    );
    for group in catalog.groups.values() {
        let mut variants: Vec<String> = group
            .variants
            .keys()
            .map(|size| format!("{size}mm"))
            .collect();
        if group.base.is_some() {
            variants.insert(0, "base".to_string());
        }
        println!("  {}: {}", group.material, variants.join(", "));
    }
    for warning in &catalog.warnings {
        println!("  warning: {warning}");
    }
}

fn render_report(report: &ConversionReport) {
    for item in &report.converted {
        println!("created: {}", item.name);
    }
    for item in &report.skipped {
        println!("skipped: {} ({})", item.material, item.reason);
    }
    for item in &report.failed {
        println!("failed:  {} ({})", item.material, item.reason);
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    println!();
    println!(
        "{} converted, {} skipped, {} failed",
        report.converted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    println!("Backup: {}", report.backup_dir.display());
    println!("To restore, copy the backed-up files over the originals.");
}
