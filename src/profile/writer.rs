use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use super::types::FilamentProfile;
use crate::error::OrcaMateError;

/// Write a filament profile to disk atomically.
///
/// Uses a temporary file in the same directory as `target_path`, writes
/// the JSON content, then atomically renames the temp file to the target.
/// This guarantees that an interrupted write never leaves a partial file.
pub fn write_profile_atomic(
    profile: &FilamentProfile,
    target_path: &Path,
) -> Result<(), OrcaMateError> {
    let json = profile.to_json_4space()?;

    let parent = target_path.parent().ok_or_else(|| {
        OrcaMateError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "target path has no parent directory: {}",
                target_path.display()
            ),
        ))
    })?;

    // Temp file in the same directory (same filesystem for atomic rename)
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(json.as_bytes())?;
    temp.flush()?;

    temp.persist(target_path)
        .map_err(|e| OrcaMateError::Io(e.error))?;

    info!("Wrote profile to {:?}", target_path);
    Ok(())
}
