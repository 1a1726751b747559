//! WorldForge - World Interview Engine
//!
//! This library provides the conversational world-creation engine:
//! - A resumable, editable interview over a fixed topic catalog
//! - Structured extraction of a validated world configuration
//! - World creation and best-effort procedural generation
//! - Storage layer (SQLite, JSON config)

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::interview::{Answer, Interview, InterviewPhase, InterviewStatus};
pub use models::settings::{AppConfig, SettingsUpdate};
pub use models::world::{GeneratedWorld, World, WorldConfiguration};
pub use services::{InterviewReply, InterviewService};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
