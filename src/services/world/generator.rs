//! Procedural Generator Seam
//!
//! The geography/weather generator is an external collaborator. This module
//! only defines how the engine talks to it.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::world::{GeneratedWorld, WorldConfiguration};

/// Errors reported by a world generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// No generator is reachable from this process
    #[error("World generator unavailable: {0}")]
    Unavailable(String),

    /// The generator ran and failed
    #[error("World generation failed: {0}")]
    Failed(String),
}

/// Produces a generated world from a configuration
#[async_trait]
pub trait WorldGenerator: Send + Sync {
    async fn generate_world(
        &self,
        world_id: &str,
        config: &WorldConfiguration,
    ) -> Result<GeneratedWorld, GeneratorError>;
}

/// Generator used when none is wired in; every call reports unavailability,
/// leaving worlds ungenerated until regenerated elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableWorldGenerator;

#[async_trait]
impl WorldGenerator for UnavailableWorldGenerator {
    async fn generate_world(
        &self,
        world_id: &str,
        _config: &WorldConfiguration,
    ) -> Result<GeneratedWorld, GeneratorError> {
        Err(GeneratorError::Unavailable(format!(
            "no generator configured for world {}",
            world_id
        )))
    }
}
