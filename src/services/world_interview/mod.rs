//! World Interview Service
//!
//! Resumable, editable interview that walks a user through a fixed catalog of
//! world-building topics and turns the answers into a validated
//! [`WorldConfiguration`](crate::models::world::WorldConfiguration).
//!
//! ## Architecture
//! - `catalog.rs` - The ordered topic catalog
//! - `prompt.rs` - Pure prompt and summary rendering
//! - `state.rs` - SQLite-backed interview, answer, and configuration persistence
//! - `extraction.rs` - Single-call structured extraction from the answers
//! - `derivation.rs` - Deterministic generation parameters from descriptive answers
//! - `naming.rs` - World name format, uniqueness, and suggestions
//! - `validation.rs` - Required-field and enum checks on a configuration
//! - `interview.rs` - The state machine tying it all together

pub mod catalog;
pub mod derivation;
pub mod extraction;
pub mod interview;
pub mod naming;
pub mod prompt;
pub mod state;
pub mod validation;

pub use catalog::{Topic, TopicCategory, TOPICS, WORLD_NAME_TOPIC};
pub use extraction::ExtractionService;
pub use interview::{InterviewReply, InterviewService};
pub use naming::{NameCheck, NameResolver};
pub use state::{InterviewRepository, SqliteInterviewRepository};
pub use validation::validate_configuration;
