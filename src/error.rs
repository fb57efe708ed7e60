use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for profile discovery, backup, and conversion.
///
/// Only `Backup` and `NoProfilesFound` (and an unreadable profile
/// directory, surfaced as `Io`) abort a whole run; everything else is
/// downgraded to a per-item report entry at the orchestrator boundary.
#[derive(Debug, Error)]
pub enum OrcaMateError {
    /// The file did not decode into a JSON object with string `id` and
    /// `name` fields. The offending file is skipped, the run continues.
    #[error("malformed profile {}: {reason}", .path.display())]
    MalformedProfile { path: PathBuf, reason: String },

    /// Snapshot creation failed. Fatal: nothing may be written without
    /// a complete backup.
    #[error("backup failed: {reason}")]
    Backup { reason: String },

    /// A nozzle size was non-positive, unparseable, or not usable for
    /// the requested conversion (missing source, existing target).
    #[error("invalid nozzle size: {0}")]
    InvalidSize(String),

    /// The profile directory contained no readable filament profiles.
    #[error("no filament profiles found in {}", .0.display())]
    NoProfilesFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("profile serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
