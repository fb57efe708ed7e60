use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Resolved paths to the OrcaSlicer configuration tree.
pub struct OrcaPaths {
    /// Root configuration directory (e.g., %APPDATA%/OrcaSlicer/)
    pub config_root: PathBuf,
    /// User profiles root (e.g., .../user/)
    pub user_root: PathBuf,
}

impl OrcaPaths {
    /// Detect OrcaSlicer paths on the current platform.
    pub fn detect() -> Result<Self> {
        let config_root = Self::find_config_root()?;
        let user_root = config_root.join("user");
        Ok(Self {
            config_root,
            user_root,
        })
    }

    /// Find the OrcaSlicer config root directory.
    /// Windows keeps it under %APPDATA% (roaming config dir).
    #[cfg(target_os = "windows")]
    fn find_config_root() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let orca_dir = config_dir.join("OrcaSlicer");
            if orca_dir.exists() {
                debug!("Found OrcaSlicer config at {:?}", orca_dir);
                return Ok(orca_dir);
            }
        }
        bail!("OrcaSlicer config directory not found. Is OrcaSlicer installed?")
    }

    #[cfg(target_os = "macos")]
    fn find_config_root() -> Result<PathBuf> {
        // dirs::data_dir maps to ~/Library/Application Support on macOS
        if let Some(data_dir) = dirs::data_dir() {
            let orca_dir = data_dir.join("OrcaSlicer");
            if orca_dir.exists() {
                debug!("Found OrcaSlicer config at {:?}", orca_dir);
                return Ok(orca_dir);
            }
        }
        bail!("OrcaSlicer config directory not found. Is OrcaSlicer installed?")
    }

    #[cfg(target_os = "linux")]
    fn find_config_root() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let orca_dir = config_dir.join("OrcaSlicer");
            if orca_dir.exists() {
                debug!("Found OrcaSlicer config at {:?}", orca_dir);
                return Ok(orca_dir);
            }
        }
        bail!("OrcaSlicer config directory not found. Is OrcaSlicer installed?")
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    fn find_config_root() -> Result<PathBuf> {
        bail!("Unsupported platform")
    }

    /// Discover every user with a filament profile directory.
    ///
    /// Scans `user/*/filament/base` and returns `(user_id, path)` pairs
    /// sorted by user id. An empty result is not an error here; callers
    /// decide whether that is fatal.
    pub fn user_profile_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut users = Vec::new();
        let entries = match std::fs::read_dir(&self.user_root) {
            Ok(e) => e,
            Err(e) => {
                warn!("Could not read user root {:?}: {}", self.user_root, e);
                return Ok(users);
            }
        };

        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let filament_base = entry.path().join("filament").join("base");
            if filament_base.is_dir() {
                let user_id = entry.file_name().to_string_lossy().to_string();
                debug!("Found user profile dir for {:?}: {:?}", user_id, filament_base);
                users.push((user_id, filament_base));
            }
        }

        users.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(users)
    }
}
