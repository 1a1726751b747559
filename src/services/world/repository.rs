//! World Persistence

use rusqlite::{params, OptionalExtension};

use crate::models::world::World;
use crate::storage::database::DbPool;
use crate::utils::error::{AppError, AppResult};

/// Storage operations for world records
pub trait WorldRepository: Send + Sync {
    fn create_world(&self, world: &World) -> AppResult<()>;

    /// Overwrite name, shape, radius, and metadata of an existing world
    fn update_world(&self, world: &World) -> AppResult<()>;

    fn get_world(&self, world_id: &str) -> AppResult<Option<World>>;
}

/// SQLite-backed [`WorldRepository`]
#[derive(Clone)]
pub struct SqliteWorldRepository {
    pool: DbPool,
}

impl SqliteWorldRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }
}

impl WorldRepository for SqliteWorldRepository {
    fn create_world(&self, world: &World) -> AppResult<()> {
        let metadata = serde_json::to_string(&world.metadata)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO worlds (id, name, shape, radius, metadata, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                world.id,
                world.name,
                world.shape,
                world.radius,
                metadata,
                world.created_at,
                world.updated_at,
            ],
        )?;
        Ok(())
    }

    fn update_world(&self, world: &World) -> AppResult<()> {
        let metadata = serde_json::to_string(&world.metadata)?;
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE worlds SET name = ?2, shape = ?3, radius = ?4, metadata = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                world.id,
                world.name,
                world.shape,
                world.radius,
                metadata,
                world.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(AppError::not_found(format!("World {}", world.id)));
        }
        Ok(())
    }

    fn get_world(&self, world_id: &str) -> AppResult<Option<World>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, name, shape, radius, metadata, created_at, updated_at
                 FROM worlds WHERE id = ?1",
                params![world_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, name, shape, radius, metadata, created_at, updated_at)) => Ok(Some(World {
                id,
                name,
                shape,
                radius,
                metadata: serde_json::from_str(&metadata)?,
                created_at,
                updated_at,
            })),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for SqliteWorldRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteWorldRepository").finish()
    }
}
