//! JSON Configuration Management
//!
//! Handles reading and writing the application configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, database_path, ensure_worldforge_dir};

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load the config from ~/.worldforge/config.json, creating defaults if absent
    pub fn new() -> AppResult<Self> {
        ensure_worldforge_dir()?;
        Self::open(config_path()?)
    }

    /// Load the config at `path`, writing defaults there if the file is absent
    pub fn open(path: PathBuf) -> AppResult<Self> {
        let config = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            let default_config = AppConfig::default();
            Self::save_to_file(&path, &default_config)?;
            default_config
        };

        Ok(Self {
            config_path: path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::config)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::config)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolved database path: explicit override or the default location
    pub fn database_path(&self) -> AppResult<PathBuf> {
        match &self.config.database_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => database_path(),
        }
    }

    /// Update the configuration with a partial update
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        Self::save_to_file(&self.config_path, &next)?;
        self.config = next;
        Ok(self.config.clone())
    }
}
