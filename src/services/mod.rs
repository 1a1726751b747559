//! Services
//!
//! Business logic for the interview engine and world creation.

pub mod world;
pub mod world_interview;

pub use world::{WorldCreationTrigger, WorldDefaults, WorldGenerator};
pub use world_interview::{InterviewReply, InterviewService};
