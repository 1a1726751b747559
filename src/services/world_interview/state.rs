//! Interview State Persistence
//!
//! Persists interviews, answers, and world configurations to SQLite so an
//! interview can be resumed after a restart. Every method takes a fresh pooled
//! connection and releases it before returning.

use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension};

use crate::models::interview::{Answer, Interview, InterviewStatus};
use crate::models::world::WorldConfiguration;
use crate::storage::database::{is_constraint_violation, DbPool};
use crate::utils::error::{AppError, AppResult};

/// Storage operations the interview engine needs
pub trait InterviewRepository: Send + Sync {
    /// Create a NotStarted interview at index 0
    fn create_interview(&self, user_id: &str) -> AppResult<Interview>;

    /// Most recently created interview for the user, whatever its status
    fn get_interview(&self, user_id: &str) -> AppResult<Option<Interview>>;

    fn update_interview_status(&self, interview_id: &str, status: InterviewStatus)
        -> AppResult<()>;

    fn update_question_index(&self, interview_id: &str, index: usize) -> AppResult<()>;

    /// Insert or overwrite the answer for `(interview_id, question_index)`
    fn save_answer(&self, interview_id: &str, question_index: usize, answer: &str)
        -> AppResult<()>;

    /// All answers, ordered by question index
    fn get_answers(&self, interview_id: &str) -> AppResult<Vec<Answer>>;

    /// Insert or replace the configuration for its interview
    fn save_configuration(&self, config: &WorldConfiguration) -> AppResult<()>;

    fn get_configuration_by_user_id(&self, user_id: &str)
        -> AppResult<Option<WorldConfiguration>>;

    fn get_configuration_by_world_id(&self, world_id: &str)
        -> AppResult<Option<WorldConfiguration>>;

    fn get_configuration_by_interview_id(
        &self,
        interview_id: &str,
    ) -> AppResult<Option<WorldConfiguration>>;

    /// Case-insensitive check against stored configuration names, optionally
    /// ignoring the configuration owned by `exclude_interview_id`
    fn is_world_name_taken(&self, name: &str, exclude_interview_id: Option<&str>)
        -> AppResult<bool>;
}

/// Answers keyed by question index
pub fn answers_by_index(answers: &[Answer]) -> BTreeMap<usize, String> {
    answers
        .iter()
        .map(|a| (a.question_index, a.answer_text.clone()))
        .collect()
}

/// SQLite-backed [`InterviewRepository`]
#[derive(Clone)]
pub struct SqliteInterviewRepository {
    pool: DbPool,
}

impl SqliteInterviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    fn query_configuration(
        &self,
        where_clause: &str,
        key: &str,
    ) -> AppResult<Option<WorldConfiguration>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT data, world_id FROM world_configurations WHERE {}
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
            where_clause
        );

        let row = conn
            .query_row(&sql, params![key], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })
            .optional()?;

        match row {
            Some((data, world_id)) => {
                let mut config: WorldConfiguration = serde_json::from_str(&data)?;
                if world_id.is_some() {
                    config.world_id = world_id;
                }
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn row_to_interview(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Interview, String)> {
    let status: String = row.get(2)?;
    let index: i64 = row.get(3)?;
    Ok((
        Interview {
            id: row.get(0)?,
            user_id: row.get(1)?,
            status: InterviewStatus::NotStarted,
            current_question_index: index.max(0) as usize,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        },
        status,
    ))
}

impl InterviewRepository for SqliteInterviewRepository {
    fn create_interview(&self, user_id: &str) -> AppResult<Interview> {
        let timestamp = now();
        let interview = Interview {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            status: InterviewStatus::NotStarted,
            current_question_index: 0,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO interviews (id, user_id, status, current_question_index, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                interview.id,
                interview.user_id,
                interview.status.as_str(),
                interview.current_question_index as i64,
                interview.created_at,
                interview.updated_at,
            ],
        );

        match result {
            Ok(_) => Ok(interview),
            Err(e) if is_constraint_violation(&e) => Err(AppError::conflict(format!(
                "User {} already has an active interview",
                user_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn get_interview(&self, user_id: &str) -> AppResult<Option<Interview>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, user_id, status, current_question_index, created_at, updated_at
                 FROM interviews WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT 1",
                params![user_id],
                row_to_interview,
            )
            .optional()?;

        match row {
            Some((mut interview, status)) => {
                interview.status = InterviewStatus::parse(&status).ok_or_else(|| {
                    AppError::database(format!("Unknown interview status '{}'", status))
                })?;
                Ok(Some(interview))
            }
            None => Ok(None),
        }
    }

    fn update_interview_status(
        &self,
        interview_id: &str,
        status: InterviewStatus,
    ) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE interviews SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![interview_id, status.as_str(), now()],
        )?;
        if changed == 0 {
            return Err(AppError::not_found(format!("Interview {}", interview_id)));
        }
        Ok(())
    }

    fn update_question_index(&self, interview_id: &str, index: usize) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE interviews SET current_question_index = ?2, updated_at = ?3 WHERE id = ?1",
            params![interview_id, index as i64, now()],
        )?;
        if changed == 0 {
            return Err(AppError::not_found(format!("Interview {}", interview_id)));
        }
        Ok(())
    }

    fn save_answer(
        &self,
        interview_id: &str,
        question_index: usize,
        answer: &str,
    ) -> AppResult<()> {
        let conn = self.conn()?;
        let timestamp = now();
        let result = conn.execute(
            "INSERT INTO interview_answers (interview_id, question_index, answer_text, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(interview_id, question_index)
             DO UPDATE SET answer_text = excluded.answer_text, updated_at = excluded.updated_at",
            params![interview_id, question_index as i64, answer, timestamp],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => {
                Err(AppError::not_found(format!("Interview {}", interview_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get_answers(&self, interview_id: &str) -> AppResult<Vec<Answer>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT interview_id, question_index, answer_text, created_at
             FROM interview_answers WHERE interview_id = ?1 ORDER BY question_index ASC",
        )?;

        let answers = stmt
            .query_map(params![interview_id], |row| {
                let index: i64 = row.get(1)?;
                Ok(Answer {
                    interview_id: row.get(0)?,
                    question_index: index.max(0) as usize,
                    answer_text: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(answers)
    }

    fn save_configuration(&self, config: &WorldConfiguration) -> AppResult<()> {
        let data = serde_json::to_string(config)?;
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO world_configurations (id, interview_id, user_id, world_id, world_name, data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(interview_id) DO UPDATE SET
                world_id = excluded.world_id,
                world_name = excluded.world_name,
                data = excluded.data",
            params![
                config.id,
                config.interview_id,
                config.user_id,
                config.world_id,
                config.world_name,
                data,
                config.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(AppError::conflict(format!(
                "World name '{}' is already taken",
                config.world_name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn get_configuration_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Option<WorldConfiguration>> {
        self.query_configuration("user_id = ?1", user_id)
    }

    fn get_configuration_by_world_id(
        &self,
        world_id: &str,
    ) -> AppResult<Option<WorldConfiguration>> {
        self.query_configuration("world_id = ?1", world_id)
    }

    fn get_configuration_by_interview_id(
        &self,
        interview_id: &str,
    ) -> AppResult<Option<WorldConfiguration>> {
        self.query_configuration("interview_id = ?1", interview_id)
    }

    fn is_world_name_taken(
        &self,
        name: &str,
        exclude_interview_id: Option<&str>,
    ) -> AppResult<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM world_configurations
             WHERE world_name = ?1 COLLATE NOCASE
               AND (?2 IS NULL OR interview_id != ?2)",
            params![name.trim(), exclude_interview_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl std::fmt::Debug for SqliteInterviewRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteInterviewRepository").finish()
    }
}
