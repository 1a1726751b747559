//! World Creation Trigger
//!
//! Creates the world record for a confirmed configuration and runs the
//! procedural generator against it. The record is committed before
//! generation starts, so a generator failure never loses the world.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use crate::models::settings::AppConfig;
use crate::models::world::{GeneratedWorld, World, WorldConfiguration};
use crate::utils::error::{AppError, AppResult};

use super::generator::WorldGenerator;
use super::repository::WorldRepository;

/// Shape and size given to newly created worlds
#[derive(Debug, Clone, PartialEq)]
pub struct WorldDefaults {
    pub shape: String,
    pub radius: f64,
}

impl Default for WorldDefaults {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for WorldDefaults {
    fn from(config: &AppConfig) -> Self {
        Self {
            shape: config.default_world_shape.clone(),
            radius: config.default_world_radius,
        }
    }
}

/// Short prose description stored alongside the theme
fn describe(config: &WorldConfiguration) -> String {
    let mut parts = vec![format!(
        "A {} world of {} technology",
        config.theme.to_lowercase(),
        config.tech_level
    )];
    if let Some(tone) = &config.tone {
        parts.push(format!("with a {} tone", tone.to_lowercase()));
    }
    if !config.sentient_species.is_empty() {
        parts.push(format!("home to {}", config.sentient_species.join(", ")));
    }
    let mut description = parts.join(", ");
    if let Some(conflict) = &config.central_conflict {
        description.push_str(&format!(". Central conflict: {}", conflict));
    }
    description.push('.');
    description
}

fn generation_metadata(generated: &GeneratedWorld) -> Value {
    let meta = &generated.metadata;
    json!({
        "seed": meta.seed,
        "generation_time_ms": meta.generation_time_ms,
        "sea_level": meta.sea_level,
        "land_ratio": meta.land_ratio,
        "width": meta.width,
        "height": meta.height,
    })
}

/// Creates worlds and drives generation
#[derive(Clone)]
pub struct WorldCreationTrigger {
    worlds: Arc<dyn WorldRepository>,
    generator: Arc<dyn WorldGenerator>,
    /// Shared with every clone so a settings change reaches live services
    defaults: Arc<RwLock<WorldDefaults>>,
}

impl WorldCreationTrigger {
    pub fn new(
        worlds: Arc<dyn WorldRepository>,
        generator: Arc<dyn WorldGenerator>,
        defaults: WorldDefaults,
    ) -> Self {
        Self {
            worlds,
            generator,
            defaults: Arc::new(RwLock::new(defaults)),
        }
    }

    /// Replace the shape and radius used for worlds created from now on.
    pub async fn set_defaults(&self, defaults: WorldDefaults) {
        tracing::debug!(shape = %defaults.shape, radius = defaults.radius, "World defaults updated");
        *self.defaults.write().await = defaults;
    }

    pub fn get_world(&self, world_id: &str) -> AppResult<Option<World>> {
        self.worlds.get_world(world_id)
    }

    /// Persist a new world for `config`, then generate it best-effort.
    ///
    /// Only the initial insert can fail the call. Anything that goes wrong
    /// while generating or storing the generation result is logged and the
    /// world is returned ungenerated.
    pub async fn create_world(&self, config: &WorldConfiguration) -> AppResult<World> {
        let now = chrono::Utc::now().to_rfc3339();
        let defaults = self.defaults.read().await.clone();
        let mut metadata = Map::new();
        metadata.insert("theme".to_string(), json!(config.theme));
        metadata.insert("description".to_string(), json!(describe(config)));
        metadata.insert("tech_level".to_string(), json!(config.tech_level));
        metadata.insert("planet_size".to_string(), json!(config.planet_size));
        metadata.insert("configuration_id".to_string(), json!(config.id));

        let world = World {
            id: uuid::Uuid::new_v4().to_string(),
            name: config.world_name.clone(),
            shape: defaults.shape,
            radius: defaults.radius,
            metadata,
            created_at: now.clone(),
            updated_at: now,
        };
        self.worlds.create_world(&world)?;
        tracing::info!(world_id = %world.id, world_name = %world.name, "Created world");

        match self.run_generator(world.clone(), config).await {
            Ok(generated) => Ok(generated),
            Err(e) => {
                tracing::warn!(world_id = %world.id, "World generation failed, continuing: {}", e);
                Ok(world)
            }
        }
    }

    /// Re-run generation for a world that has not been generated yet.
    pub async fn regenerate(&self, world_id: &str, config: &WorldConfiguration) -> AppResult<World> {
        let world = self
            .worlds
            .get_world(world_id)?
            .ok_or_else(|| AppError::not_found(format!("World {}", world_id)))?;

        if world.is_generated() {
            return Err(AppError::conflict(format!(
                "World {} has already been generated",
                world_id
            )));
        }

        self.run_generator(world, config).await
    }

    async fn run_generator(&self, mut world: World, config: &WorldConfiguration) -> AppResult<World> {
        let generated = self.generator.generate_world(&world.id, config).await?;

        world
            .metadata
            .insert("generation".to_string(), generation_metadata(&generated));
        world.updated_at = chrono::Utc::now().to_rfc3339();
        self.worlds.update_world(&world)?;

        tracing::info!(
            world_id = %world.id,
            seed = generated.metadata.seed,
            generation_time_ms = generated.metadata.generation_time_ms,
            "World generated"
        );
        Ok(world)
    }
}

impl std::fmt::Debug for WorldCreationTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("WorldCreationTrigger");
        match self.defaults.try_read() {
            Ok(defaults) => s.field("defaults", &*defaults),
            Err(_) => s.field("defaults", &"<locked>"),
        };
        s.finish()
    }
}
