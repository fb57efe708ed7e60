use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::FilamentProfile;
use crate::error::OrcaMateError;

/// Enumerate the `*.json` profile files directly inside `dir`.
///
/// Non-recursive by the OrcaSlicer directory convention (one flat
/// `filament/base` directory per user). Sorted by path so every run
/// sees the same listing order.
pub fn list_profile_files(dir: &Path) -> Result<Vec<PathBuf>, OrcaMateError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} profile files in {:?}", files.len(), dir);
    Ok(files)
}

/// Read a filament profile from a JSON file on disk.
///
/// Fails with `MalformedProfile` if the bytes do not decode into a JSON
/// object or the required `id`/`name` fields are missing.
pub fn read_profile(path: &Path) -> Result<FilamentProfile, OrcaMateError> {
    let content = std::fs::read_to_string(path)?;
    let profile = FilamentProfile::from_json(&content).map_err(|reason| {
        OrcaMateError::MalformedProfile {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    debug!(
        "Read profile {:?} with {} fields from {:?}",
        profile.name().unwrap_or("<unnamed>"),
        profile.field_count(),
        path
    );

    Ok(profile)
}
