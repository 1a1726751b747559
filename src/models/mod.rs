//! Data Models
//!
//! Contains the data structures shared by storage and services.

pub mod interview;
pub mod settings;
pub mod world;

pub use interview::*;
pub use settings::*;
pub use world::*;
