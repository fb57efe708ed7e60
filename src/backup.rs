use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::error::OrcaMateError;

/// The immutable record of one pre-conversion snapshot: where the copies
/// live and which source files were copied, in order. Retained on disk
/// after the run; restoring is copying the files back over the originals.
#[derive(Debug)]
pub struct BackupSet {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Snapshot `paths` into a fresh `backup_<UTC timestamp>` directory
/// adjacent to `profile_dir`, before any conversion write happens.
///
/// Fails if the destination directory already exists (it must not
/// silently merge into a prior backup) or if any copy fails. On partial
/// failure the already-copied files are left in place and the error
/// names the first failing path.
pub fn snapshot(profile_dir: &Path, paths: &[PathBuf]) -> Result<BackupSet, OrcaMateError> {
    let parent = profile_dir.parent().ok_or_else(|| OrcaMateError::Backup {
        reason: format!(
            "profile directory has no parent for backup: {}",
            profile_dir.display()
        ),
    })?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let backup_dir = parent.join(format!("backup_{timestamp}"));
    snapshot_into(&backup_dir, paths)
}

/// Copy `paths` into `backup_dir`, which must not exist yet.
pub fn snapshot_into(backup_dir: &Path, paths: &[PathBuf]) -> Result<BackupSet, OrcaMateError> {
    if backup_dir.exists() {
        return Err(OrcaMateError::Backup {
            reason: format!(
                "backup directory already exists: {}",
                backup_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(backup_dir).map_err(|e| OrcaMateError::Backup {
        reason: format!("creating {} failed: {e}", backup_dir.display()),
    })?;

    let mut copied = Vec::with_capacity(paths.len());
    for src in paths {
        let file_name = src.file_name().ok_or_else(|| OrcaMateError::Backup {
            reason: format!("not a file path: {}", src.display()),
        })?;
        let dest = backup_dir.join(file_name);
        std::fs::copy(src, &dest).map_err(|e| OrcaMateError::Backup {
            reason: format!("copying {} failed: {e}", src.display()),
        })?;
        copied.push(src.clone());
    }

    info!(
        "Backup complete: {} profiles archived in {:?}",
        copied.len(),
        backup_dir
    );

    Ok(BackupSet {
        dir: backup_dir.to_path_buf(),
        files: copied,
    })
}
