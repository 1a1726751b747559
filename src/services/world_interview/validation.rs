//! Configuration Validation

use crate::models::world::{PlanetSize, TechLevel, WorldConfiguration};
use crate::utils::error::{AppError, AppResult};

/// Check required fields and enum values, collecting every problem.
pub fn validate_configuration(config: &WorldConfiguration) -> AppResult<()> {
    let mut errors = Vec::new();

    if config.world_name.trim().is_empty() {
        errors.push("world_name is required".to_string());
    }
    if config.theme.trim().is_empty() {
        errors.push("theme is required".to_string());
    }

    if config.tech_level.trim().is_empty() {
        errors.push("tech_level is required".to_string());
    } else if TechLevel::parse(&config.tech_level).is_none() {
        errors.push(format!(
            "tech_level '{}' is not one of: {}",
            config.tech_level,
            TechLevel::ALL.map(|t| t.as_str()).join(", ")
        ));
    }

    if config.planet_size.trim().is_empty() {
        errors.push("planet_size is required".to_string());
    } else if PlanetSize::parse(&config.planet_size).is_none() {
        errors.push(format!(
            "planet_size '{}' is not one of: {}",
            config.planet_size,
            PlanetSize::ALL.map(|s| s.as_str()).join(", ")
        ));
    }

    if config.sentient_species.iter().all(|s| s.trim().is_empty()) {
        errors.push("at least one sentient species is required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ConfigurationInvalid(errors))
    }
}
