//! Integration Tests Module
//!
//! End-to-end tests for the world interview engine over in-memory SQLite with
//! scripted text-generation and world-generation fakes.

// Shared fakes and helpers
mod support;

// Interview flow, name resolution, and finalization tests
mod world_interview_test;

// World creation and regeneration tests
mod world_creation_test;
