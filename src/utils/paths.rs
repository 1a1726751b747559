//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Everything lives under `~/.worldforge/`.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the WorldForge directory (~/.worldforge/)
pub fn worldforge_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".worldforge"))
}

/// Get the config file path (~/.worldforge/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(worldforge_dir()?.join("config.json"))
}

/// Get the default database file path (~/.worldforge/worlds.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(worldforge_dir()?.join("worlds.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the WorldForge directory, creating if it doesn't exist
pub fn ensure_worldforge_dir() -> AppResult<PathBuf> {
    let path = worldforge_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
