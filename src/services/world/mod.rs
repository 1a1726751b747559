//! World Creation
//!
//! World records, the procedural generator seam, and the trigger that ties a
//! confirmed configuration to a generated world.

pub mod generator;
pub mod repository;
pub mod trigger;

pub use generator::{GeneratorError, UnavailableWorldGenerator, WorldGenerator};
pub use repository::{SqliteWorldRepository, WorldRepository};
pub use trigger::{WorldCreationTrigger, WorldDefaults};
