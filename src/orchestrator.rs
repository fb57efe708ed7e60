use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::backup;
use crate::error::OrcaMateError;
use crate::profile::catalog::ProfileCatalog;
use crate::profile::types::NozzleSize;
use crate::profile::writer::write_profile_atomic;
use crate::variant::{generate_variant, IdAllocator};

/// One full conversion to perform: which directory, which sizes, and
/// whether a group lacking the exact source size may fall back to its
/// base profile as the template.
pub struct ConversionRequest {
    pub profile_dir: PathBuf,
    pub source: NozzleSize,
    pub target: NozzleSize,
    pub use_base_template: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertedItem {
    pub material: String,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedItem {
    pub material: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedItem {
    pub material: String,
    pub reason: String,
}

/// Per-profile outcome of one conversion run, plus where the pre-run
/// snapshot lives. The engine performs no console output; rendering
/// this is the caller's job.
#[derive(Debug, Serialize)]
pub struct ConversionReport {
    pub converted: Vec<ConvertedItem>,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<FailedItem>,
    pub warnings: Vec<String>,
    pub backup_dir: PathBuf,
}

/// Run one conversion: discover, back up, then convert each material
/// group independently.
///
/// The pipeline is strictly ordered: the catalog is built first (zero
/// profiles is fatal), the exact set of conversion-source files is
/// snapshotted next (any backup failure is fatal and nothing downstream
/// executes), and only then are variants generated and written. A
/// failure on one material is recorded as a per-item failure and
/// processing continues with the next material.
///
/// Re-running with the same sizes is naturally idempotent: every group
/// already holding the target size is reported as skipped, and no
/// existing file is rewritten.
pub fn run_conversion(req: &ConversionRequest) -> Result<ConversionReport, OrcaMateError> {
    if req.source == req.target {
        return Err(OrcaMateError::InvalidSize(format!(
            "target size {}mm must differ from source size",
            req.target
        )));
    }

    // Idle -> Discovered
    let catalog = ProfileCatalog::build(&req.profile_dir)?;
    if catalog.is_empty() {
        return Err(OrcaMateError::NoProfilesFound(req.profile_dir.clone()));
    }
    info!(
        "Converting {}mm -> {}mm across {} material groups",
        req.source,
        req.target,
        catalog.groups.len()
    );

    // Discovered -> BackedUp: snapshot exactly the files that will be
    // read as conversion sources. Groups already holding the target are
    // skipped, not re-converted, so their sources are not touched.
    let sources: Vec<PathBuf> = catalog
        .groups
        .values()
        .filter(|g| !g.variants.contains_key(&req.target))
        .filter_map(|g| g.template_for(req.source, req.use_base_template))
        .map(|entry| entry.path.clone())
        .collect();
    let backup = backup::snapshot(&req.profile_dir, &sources)?;

    // BackedUp -> Converting
    let mut ids = IdAllocator::new(catalog.known_ids.iter().cloned());
    let mut converted = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();

    for group in catalog.groups.values() {
        if group.variants.contains_key(&req.target) {
            skipped.push(SkippedItem {
                material: group.material.clone(),
                reason: format!("{}mm variant already exists", req.target),
            });
            continue;
        }

        let profile =
            match generate_variant(group, req.source, req.target, req.use_base_template, &mut ids)
            {
                Ok(p) => p,
                Err(e) => {
                    warn!("Conversion failed for {}: {}", group.material, e);
                    failed.push(FailedItem {
                        material: group.material.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

        // name was just set by generate_variant
        let name = profile.name().unwrap_or_default().to_string();
        let path = req.profile_dir.join(format!("{name}.json"));
        if path.exists() {
            skipped.push(SkippedItem {
                material: group.material.clone(),
                reason: format!("output file already exists: {}", path.display()),
            });
            continue;
        }

        match write_profile_atomic(&profile, &path) {
            Ok(()) => converted.push(ConvertedItem {
                material: group.material.clone(),
                name,
                path,
            }),
            Err(e) => {
                warn!("Write failed for {}: {}", group.material, e);
                failed.push(FailedItem {
                    material: group.material.clone(),
                    reason: format!("write failed: {e}"),
                });
            }
        }
    }

    // Converting -> Done
    info!(
        "Conversion complete: {} converted, {} skipped, {} failed",
        converted.len(),
        skipped.len(),
        failed.len()
    );

    Ok(ConversionReport {
        converted,
        skipped,
        failed,
        warnings: catalog.warnings,
        backup_dir: backup.dir,
    })
}
