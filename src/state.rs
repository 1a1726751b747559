//! Application State
//!
//! Wires configuration, storage, the text-generation client, and the world
//! generator into one [`InterviewService`].

use std::sync::Arc;

use tokio::sync::RwLock;
use worldforge_llm::{OpenAICompatibleClient, TextGenerator};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::world::{
    SqliteWorldRepository, WorldCreationTrigger, WorldDefaults, WorldGenerator,
};
use crate::services::world_interview::{InterviewService, SqliteInterviewRepository};
use crate::storage::{ConfigService, Database};
use crate::utils::error::AppResult;

/// Everything a front end needs to drive interviews
pub struct AppState {
    /// SQLite database with connection pool
    database: Database,
    /// Configuration service for app settings
    config: Arc<RwLock<ConfigService>>,
    /// Handle on the trigger inside `interviews`, for pushing new defaults
    worlds: WorldCreationTrigger,
    interviews: InterviewService,
}

impl AppState {
    /// Assemble state from already-open collaborators
    pub fn new(
        config: ConfigService,
        database: Database,
        client: Arc<dyn TextGenerator>,
        generator: Arc<dyn WorldGenerator>,
    ) -> Self {
        let defaults = WorldDefaults::from(config.get_config());
        let repository = Arc::new(SqliteInterviewRepository::new(database.pool().clone()));
        let worlds = WorldCreationTrigger::new(
            Arc::new(SqliteWorldRepository::new(database.pool().clone())),
            generator,
            defaults,
        );

        Self {
            interviews: InterviewService::new(repository, client, worlds.clone()),
            worlds,
            database,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Load config from disk, open the database it points at, and build an
    /// OpenAI-compatible client from the provider settings.
    pub fn initialize(config: ConfigService, generator: Arc<dyn WorldGenerator>) -> AppResult<Self> {
        let database = Database::open(&config.database_path()?)?;
        let client = OpenAICompatibleClient::new(config.get_config().resolved_provider())?;
        tracing::debug!(model = %config.get_config().provider.model, "Text-generation client ready");
        Ok(Self::new(config, database, Arc::new(client), generator))
    }

    pub fn interviews(&self) -> &InterviewService {
        &self.interviews
    }

    /// Check if database is healthy
    pub fn is_database_healthy(&self) -> bool {
        self.database.is_healthy()
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppConfig {
        self.config.read().await.get_config().clone()
    }

    /// Update and persist configuration.
    ///
    /// New world defaults take effect for the next world created.
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let updated = self.config.write().await.update_config(update)?;
        self.worlds.set_defaults(WorldDefaults::from(&updated)).await;
        Ok(updated)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
