//! World Creation Integration Tests
//!
//! Best-effort generation on confirmation, later regeneration, and the
//! application state wiring.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use worldforge::services::world::WorldRepository;
use worldforge::storage::{ConfigService, Database};
use worldforge::{AppError, AppState, InterviewPhase, SettingsUpdate};

use super::support::{Harness, ScriptedClient, SwitchableGenerator};

#[tokio::test]
async fn test_generation_failure_still_completes_interview() {
    let h = Harness::with_generator(false);
    h.answer_all("amy", "Aethoria").await;

    let done = h.service.process("amy", "yes").await.unwrap();
    assert_eq!(done.phase, InterviewPhase::Completed);
    assert!(done.message.contains("regenerated later"));

    let world_id = done.world_id.unwrap();
    let world = h.worlds.get_world(&world_id).unwrap().unwrap();
    assert!(!world.is_generated());
    assert_eq!(world.metadata["theme"], "High fantasy");
    assert!(world.metadata["description"]
        .as_str()
        .unwrap()
        .contains("medieval technology"));

    let config = h.service.configuration("amy").unwrap();
    assert_eq!(config.world_id.as_deref(), Some(world_id.as_str()));
}

#[tokio::test]
async fn test_regenerate_after_failed_generation() {
    let h = Harness::with_generator(false);
    h.answer_all("ben", "Aethoria").await;
    let world_id = h
        .service
        .process("ben", "yes")
        .await
        .unwrap()
        .world_id
        .unwrap();

    // Still failing: surfaced to the caller this time
    let err = h.service.regenerate(&world_id).await.unwrap_err();
    assert!(matches!(err, AppError::Generation(_)));

    h.generator.set_available(true);
    let world = h.service.regenerate(&world_id).await.unwrap();
    assert!(world.is_generated());
    assert_eq!(world.metadata["generation"]["width"], 1024);
    assert_eq!(world.metadata["generation"]["land_ratio"], 0.32);

    let stored = h.worlds.get_world(&world_id).unwrap().unwrap();
    assert!(stored.is_generated());
    assert_eq!(h.generator.calls.load(Ordering::SeqCst), 3);

    let err = h.service.regenerate(&world_id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_regenerate_unknown_world_is_not_found() {
    let h = Harness::new();
    let err = h.service.regenerate("no-such-world").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_app_state_uses_configured_world_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = ConfigService::open(temp_dir.path().join("config.json")).unwrap();
    config
        .update_config(SettingsUpdate {
            default_world_shape: Some("torus".to_string()),
            default_world_radius: Some(1200.0),
            ..Default::default()
        })
        .unwrap();

    let database = Database::new_in_memory().unwrap();
    let state = AppState::new(
        config,
        database.clone(),
        Arc::new(ScriptedClient::new()),
        Arc::new(SwitchableGenerator::new(true)),
    );
    assert!(state.is_database_healthy());
    assert_eq!(state.get_config().await.default_world_shape, "torus");

    let interviews = state.interviews();
    interviews.start("cy").await.unwrap();
    for answer in super::support::ANSWERS {
        interviews.process("cy", answer).await.unwrap();
    }
    interviews.process("cy", "Ringworld").await.unwrap();
    let world_id = interviews.process("cy", "yes").await.unwrap().world_id.unwrap();

    let worlds = worldforge::services::world::SqliteWorldRepository::new(database.pool().clone());
    let world = worlds.get_world(&world_id).unwrap().unwrap();
    assert_eq!(world.shape, "torus");
    assert!((world.radius - 1200.0).abs() < f64::EPSILON);

    let updated = state
        .update_config(SettingsUpdate {
            default_world_shape: Some("flat".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.default_world_shape, "flat");

    // The running service picks up the new shape without a restart
    interviews.start("dee").await.unwrap();
    for answer in super::support::ANSWERS {
        interviews.process("dee", answer).await.unwrap();
    }
    interviews.process("dee", "Flatland").await.unwrap();
    let second_id = interviews.process("dee", "yes").await.unwrap().world_id.unwrap();

    let second = worlds.get_world(&second_id).unwrap().unwrap();
    assert_eq!(second.shape, "flat");
    assert!((second.radius - 1200.0).abs() < f64::EPSILON);
    assert_eq!(worlds.get_world(&world_id).unwrap().unwrap().shape, "torus");
}
