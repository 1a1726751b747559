//! Settings Models
//!
//! Application configuration and settings data structures.

use serde::{Deserialize, Serialize};
use worldforge_llm::ProviderConfig;

/// Shapes the world generator understands
pub const WORLD_SHAPES: &[&str] = &["sphere", "flat", "torus"];

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database file override; defaults to ~/.worldforge/worlds.db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    /// Text-generation provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Environment variable holding the provider API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Radius (km) given to newly created worlds
    #[serde(default = "default_world_radius")]
    pub default_world_radius: f64,
    /// Shape given to newly created worlds
    #[serde(default = "default_world_shape")]
    pub default_world_shape: String,
}

fn default_api_key_env() -> String {
    "WORLDFORGE_API_KEY".to_string()
}

fn default_world_radius() -> f64 {
    6371.0
}

fn default_world_shape() -> String {
    "sphere".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            provider: ProviderConfig::default(),
            api_key_env: default_api_key_env(),
            default_world_radius: default_world_radius(),
            default_world_shape: default_world_shape(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub database_path: Option<String>,
    pub provider_base_url: Option<String>,
    pub provider_model: Option<String>,
    pub api_key_env: Option<String>,
    pub default_world_radius: Option<f64>,
    pub default_world_shape: Option<String>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(path) = update.database_path {
            self.database_path = Some(path);
        }
        if let Some(base_url) = update.provider_base_url {
            self.provider.base_url = Some(base_url);
        }
        if let Some(model) = update.provider_model {
            self.provider.model = model;
        }
        if let Some(env) = update.api_key_env {
            self.api_key_env = env;
        }
        if let Some(radius) = update.default_world_radius {
            self.default_world_radius = radius;
        }
        if let Some(shape) = update.default_world_shape {
            self.default_world_shape = shape;
        }
    }

    /// Provider settings with the API key resolved from the environment
    pub fn resolved_provider(&self) -> ProviderConfig {
        let mut provider = self.provider.clone();
        if provider.api_key.is_none() {
            provider.api_key = std::env::var(&self.api_key_env)
                .ok()
                .filter(|k| !k.is_empty());
        }
        provider
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.provider.model.trim().is_empty() {
            return Err("provider.model must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(format!(
                "provider.temperature must be between 0.0 and 2.0, got {}",
                self.provider.temperature
            ));
        }

        if self.provider.max_tokens == 0 {
            return Err("provider.max_tokens must be greater than 0".to_string());
        }

        if !(self.default_world_radius > 0.0 && self.default_world_radius <= 1_000_000.0) {
            return Err(format!(
                "default_world_radius must be in (0, 1000000], got {}",
                self.default_world_radius
            ));
        }

        if !WORLD_SHAPES.contains(&self.default_world_shape.as_str()) {
            return Err(format!(
                "Invalid default_world_shape: {}. Must be one of {}",
                self.default_world_shape,
                WORLD_SHAPES.join(", ")
            ));
        }

        Ok(())
    }
}
