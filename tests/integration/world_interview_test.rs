//! World Interview Integration Tests
//!
//! Tests for the complete interview pipeline:
//! - Multi-turn progress through every topic into Review
//! - Editing, resuming, and idempotent start
//! - World name validation and conflict suggestions
//! - Finalization failures leaving the interview in Review
//!
//! All tests use in-memory SQLite databases via Database::new_in_memory().

use worldforge::services::world_interview::catalog::{topic_count, world_name_index};
use worldforge::services::world_interview::InterviewRepository;
use worldforge::services::world::WorldRepository;
use worldforge::{AppError, InterviewPhase, InterviewStatus};
use worldforge_llm::LlmError;

use super::support::{extraction_json, Harness, ANSWERS};

// ============================================================================
// Full flow
// ============================================================================

#[tokio::test]
async fn test_aethoria_scenario() {
    let h = Harness::new();

    let first = h.service.start("alice").await.unwrap();
    assert_eq!(first.phase, InterviewPhase::InProgress { index: 0 });
    assert_eq!(first.interview.status, InterviewStatus::InProgress);
    assert_eq!(first.message, "Tell me about Core Theme?");

    let review = h.answer_all("alice", "Aethoria").await;
    assert_eq!(review.phase, InterviewPhase::Review);
    assert_eq!(review.interview.current_question_index, topic_count());
    assert!(review.message.contains("World Name: Aethoria"));
    assert!(review.message.contains("Technology Level: Medieval"));

    let done = h.service.process("alice", "Looks good!").await.unwrap();
    assert_eq!(done.phase, InterviewPhase::Completed);
    assert!(done.interview.is_completed());
    assert!(done.message.contains("Aethoria"));
    let world_id = done.world_id.clone().unwrap();

    let config = h.service.configuration("alice").unwrap();
    assert_eq!(config.world_name, "Aethoria");
    assert_eq!(config.tech_level, "medieval");
    assert_eq!(config.planet_size, "medium");
    assert_eq!(config.sentient_species, vec!["Humans", "Elves"]);
    assert_eq!(config.world_id.as_deref(), Some(world_id.as_str()));
    assert_eq!(config.biome_weights["forest"], 0.3);
    assert!(config.resource_distribution.contains_key("iron"));
    assert_eq!(config.species_start_attributes["Elves"]["agility"], 14);

    let world = h.worlds.get_world(&world_id).unwrap().unwrap();
    assert_eq!(world.name, "Aethoria");
    assert_eq!(world.shape, "sphere");
    assert!(world.is_generated());
    assert_eq!(world.metadata["generation"]["seed"], 1234);
    assert_eq!(world.metadata["theme"], "High fantasy");
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let h = Harness::new();
    let mut reply = h.service.start("bob").await.unwrap();
    let mut previous = reply.interview.current_question_index;

    for (i, answer) in ANSWERS.iter().enumerate() {
        reply = h.service.process("bob", answer).await.unwrap();
        assert_eq!(reply.interview.current_question_index, previous + 1);
        assert_eq!(reply.phase, InterviewPhase::InProgress { index: i + 1 });
        previous = reply.interview.current_question_index;
    }

    // Edits never move the index
    let edited = h
        .service
        .process("bob", "change Tone to grim")
        .await
        .unwrap();
    assert_eq!(edited.interview.current_question_index, previous);
    assert!(edited.message.starts_with("Updated Tone."));
    assert!(edited.message.contains("World Name"));
}

#[tokio::test]
async fn test_start_is_idempotent() {
    let h = Harness::new();
    let first = h.service.start("carol").await.unwrap();
    h.service.process("carol", ANSWERS[0]).await.unwrap();

    let again = h.service.start("carol").await.unwrap();
    assert_eq!(again.interview.id, first.interview.id);
    assert_eq!(again.phase, InterviewPhase::InProgress { index: 1 });
    assert_eq!(again.message, "Tell me about Tone?");
}

#[tokio::test]
async fn test_start_after_completion_creates_new_interview() {
    let h = Harness::new();
    h.answer_all("dana", "Aethoria").await;
    let done = h.service.process("dana", "yes").await.unwrap();

    let fresh = h.service.start("dana").await.unwrap();
    assert_ne!(fresh.interview.id, done.interview.id);
    assert_eq!(fresh.phase, InterviewPhase::InProgress { index: 0 });
}

#[tokio::test]
async fn test_resume_regenerates_current_question() {
    let h = Harness::new();
    h.service.start("erin").await.unwrap();
    for answer in &ANSWERS[..3] {
        h.service.process("erin", answer).await.unwrap();
    }

    let calls_before = h.client.call_count();
    let resumed = h.service.resume("erin").await.unwrap();
    assert_eq!(h.client.call_count(), calls_before + 1);
    assert_eq!(resumed.phase, InterviewPhase::InProgress { index: 3 });
    assert_eq!(resumed.message, "Tell me about Central Conflict?");

    let prompt = h.client.last_prompt();
    assert!(prompt.contains("- Core Theme: High fantasy with ancient ruins"));
    assert!(prompt.contains(ANSWERS[2]));
}

#[tokio::test]
async fn test_resume_in_review_rerenders_summary() {
    let h = Harness::new();
    h.answer_all("fay", "Aethoria").await;

    let calls_before = h.client.call_count();
    let resumed = h.service.resume("fay").await.unwrap();
    assert_eq!(h.client.call_count(), calls_before);
    assert_eq!(resumed.phase, InterviewPhase::Review);
    assert!(resumed.message.contains("World Name: Aethoria"));
}

// ============================================================================
// Editing
// ============================================================================

#[tokio::test]
async fn test_edit_is_pure_overwrite() {
    let h = Harness::new();
    h.answer_all("gus", "Aethoria").await;

    let reply = h
        .service
        .process("gus", "change climate to Tropical and humid")
        .await
        .unwrap();
    assert_eq!(reply.phase, InterviewPhase::Review);
    assert!(reply.message.contains("Climate: Tropical and humid"));

    assert_eq!(h.answer("gus", 10).as_deref(), Some("Tropical and humid"));
    for (index, expected) in ANSWERS.iter().enumerate() {
        if index != 10 {
            assert_eq!(h.answer("gus", index).as_deref(), Some(*expected));
        }
    }
    assert_eq!(h.answer("gus", world_name_index()).as_deref(), Some("Aethoria"));
}

#[tokio::test]
async fn test_edit_unknown_topic_lists_valid_topics() {
    let h = Harness::new();
    h.answer_all("hal", "Aethoria").await;

    let reply = h.service.edit("hal", "Weather", "stormy").await.unwrap();
    assert!(reply.message.contains("no topic called \"Weather\""));
    assert!(reply.message.contains("Core Theme"));
    assert!(reply.message.contains("World Name"));
    assert_eq!(reply.phase, InterviewPhase::Review);
    assert_eq!(h.answer("hal", 10).as_deref(), Some(ANSWERS[10]));
}

#[tokio::test]
async fn test_answer_that_reads_like_an_edit_explains_how_to_rephrase() {
    let h = Harness::new();
    h.service.start("ida").await.unwrap();
    for answer in &ANSWERS[..3] {
        h.service.process("ida", answer).await.unwrap();
    }

    let reply = h
        .service
        .process("ida", "Change comes slowly to the valleys")
        .await
        .unwrap();
    assert!(reply.message.contains("no topic called \"comes slowly\""));
    assert!(reply.message.contains("rephrase"));
    assert!(reply.message.contains("Back to where we were. Central Conflict"));
    assert_eq!(reply.phase, InterviewPhase::InProgress { index: 3 });
    assert_eq!(h.answer("ida", 3), None);

    let reply = h
        .service
        .process("ida", "Slow change creeping into the valleys")
        .await
        .unwrap();
    assert_eq!(reply.phase, InterviewPhase::InProgress { index: 4 });
    assert_eq!(
        h.answer("ida", 3).as_deref(),
        Some("Slow change creeping into the valleys")
    );
}

#[tokio::test]
async fn test_editing_world_name_is_revalidated() {
    let h = Harness::new();
    h.answer_all("ivy", "Aethoria").await;

    let reply = h
        .service
        .process("ivy", "change World Name to World@#$")
        .await
        .unwrap();
    assert!(reply.message.contains("not valid"));
    assert_eq!(h.answer("ivy", world_name_index()).as_deref(), Some("Aethoria"));

    let reply = h
        .service
        .edit("ivy", "world name", "  Lyr's Reach ")
        .await
        .unwrap();
    assert!(reply.message.starts_with("Updated World Name."));
    assert_eq!(
        h.answer("ivy", world_name_index()).as_deref(),
        Some("Lyr's Reach")
    );
}

// ============================================================================
// Name resolution
// ============================================================================

#[tokio::test]
async fn test_invalid_world_name_is_rejected() {
    let h = Harness::new();
    h.answer_until_name("jan").await;

    let reply = h.service.process("jan", "World@#$").await.unwrap();
    assert!(reply.message.contains("not valid"));
    assert_eq!(
        reply.phase,
        InterviewPhase::InProgress {
            index: world_name_index()
        }
    );
    assert!(h.answer("jan", world_name_index()).is_none());
}

#[tokio::test]
async fn test_shared_world_conflict_offers_suggestions() {
    let h = Harness::new();
    h.answer_all("kim", "Shared World").await;
    h.service.process("kim", "confirm").await.unwrap();

    h.answer_until_name("lee").await;
    let reply = h.service.process("lee", "shared WORLD").await.unwrap();
    assert!(reply.message.contains("already taken"));
    assert!(reply.message.contains("Shared Realm"));
    assert_eq!(
        reply.phase,
        InterviewPhase::InProgress {
            index: world_name_index()
        }
    );

    let reply = h.service.process("lee", "Shared Realm").await.unwrap();
    assert_eq!(reply.phase, InterviewPhase::Review);
}

#[tokio::test]
async fn test_conflict_suggestions_fall_back_when_model_fails() {
    let h = Harness::new();
    h.answer_all("max", "Shared World").await;
    h.service.process("max", "create").await.unwrap();

    h.client.set_suggestions(Err(LlmError::NetworkError {
        message: "timeout".to_string(),
    }));
    h.answer_until_name("ned").await;
    let reply = h.service.process("ned", "Shared World").await.unwrap();
    assert!(reply.message.contains("already taken"));
    assert!(reply.message.contains("New Shared World"));
}

#[tokio::test]
async fn test_name_taken_before_confirmation_stays_in_review() {
    let h = Harness::new();
    h.answer_all("oli", "Twin Peaks").await;
    h.answer_all("pat", "Twin Peaks").await;

    h.service.process("oli", "yes").await.unwrap();

    let reply = h.service.process("pat", "yes").await.unwrap();
    assert_eq!(reply.phase, InterviewPhase::Review);
    assert!(reply.message.contains("already taken"));
    assert!(reply.world_id.is_none());
    assert!(h.service.configuration("pat").is_err());
}

// ============================================================================
// Review and finalization failures
// ============================================================================

#[tokio::test]
async fn test_unrecognized_review_input_shows_hint() {
    let h = Harness::new();
    h.answer_all("quinn", "Aethoria").await;

    let reply = h.service.process("quinn", "hmm, not sure").await.unwrap();
    assert_eq!(reply.phase, InterviewPhase::Review);
    assert!(reply.message.contains("change <topic> to <value>"));
    assert!(reply.message.contains("World Name: Aethoria"));
}

#[tokio::test]
async fn test_extraction_parse_failure_changes_nothing() {
    let h = Harness::new();
    h.answer_all("rae", "Aethoria").await;
    h.client.set_extraction("Sorry, I can't do that.");

    let err = h.service.process("rae", "yes").await.unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
    assert!(err.is_upstream());

    let interview = h.repository.get_interview("rae").unwrap().unwrap();
    assert_eq!(interview.status, InterviewStatus::InProgress);
    assert!(h
        .repository
        .get_configuration_by_interview_id(&interview.id)
        .unwrap()
        .is_none());
    assert_eq!(h.generator.calls.load(std::sync::atomic::Ordering::SeqCst), 0);

    // A later attempt succeeds
    h.client.set_extraction(extraction_json("Aethoria"));
    let done = h.service.complete("rae").await.unwrap();
    assert_eq!(done.phase, InterviewPhase::Completed);
}

#[tokio::test]
async fn test_invalid_configuration_is_reported_distinctly() {
    let h = Harness::new();
    h.answer_all("sam", "Aethoria").await;
    h.client.set_extraction(
        r#"{"theme": "High fantasy", "tech_level": "magitech", "planet_size": "medium", "sentient_species": []}"#,
    );

    let err = h.service.process("sam", "yes").await.unwrap_err();
    match err {
        AppError::ConfigurationInvalid(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().any(|e| e.contains("magitech")));
            assert!(errors.iter().any(|e| e.contains("species")));
        }
        other => panic!("expected ConfigurationInvalid, got {:?}", other),
    }

    let reply = h.service.resume("sam").await.unwrap();
    assert_eq!(reply.phase, InterviewPhase::Review);
}

#[tokio::test]
async fn test_upstream_failure_does_not_advance() {
    let h = Harness::new();
    h.service.start("tess").await.unwrap();
    h.service.process("tess", ANSWERS[0]).await.unwrap();

    h.client.set_failing(true);
    let err = h.service.process("tess", ANSWERS[1]).await.unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));

    let interview = h.repository.get_interview("tess").unwrap().unwrap();
    assert_eq!(interview.current_question_index, 1);
    assert!(h.answer("tess", 1).is_none());

    h.client.set_failing(false);
    let reply = h.service.process("tess", ANSWERS[1]).await.unwrap();
    assert_eq!(reply.phase, InterviewPhase::InProgress { index: 2 });
}

#[tokio::test]
async fn test_failed_first_question_leaves_interview_not_started() {
    let h = Harness::new();
    h.client.set_failing(true);
    assert!(h.service.start("uma").await.is_err());

    let interview = h.repository.get_interview("uma").unwrap().unwrap();
    assert_eq!(interview.status, InterviewStatus::NotStarted);

    h.client.set_failing(false);
    let reply = h.service.start("uma").await.unwrap();
    assert_eq!(reply.interview.id, interview.id);
    assert_eq!(reply.interview.status, InterviewStatus::InProgress);
}

#[tokio::test]
async fn test_complete_requires_review() {
    let h = Harness::new();
    h.service.start("vic").await.unwrap();
    let err = h.service.complete("vic").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

// ============================================================================
// Not found
// ============================================================================

#[tokio::test]
async fn test_operations_without_interview_are_not_found() {
    let h = Harness::new();
    assert!(matches!(
        h.service.process("nobody", "hi").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        h.service.resume("nobody").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        h.service.edit("nobody", "Tone", "grim").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        h.service.complete("nobody").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        h.service.configuration("nobody").unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_completed_interview_is_no_longer_active() {
    let h = Harness::new();
    h.answer_all("wes", "Aethoria").await;
    h.service.process("wes", "yes").await.unwrap();

    assert!(matches!(
        h.service.process("wes", "change Tone to grim").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        h.service.resume("wes").await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

// ============================================================================
// Derivation
// ============================================================================

#[tokio::test]
async fn test_identical_answers_derive_identical_parameters() {
    let h = Harness::new();
    h.answer_all("xan", "First World").await;
    h.service.process("xan", "yes").await.unwrap();
    h.answer_all("yara", "Second World").await;
    h.service.process("yara", "yes").await.unwrap();

    let a = h.service.configuration("xan").unwrap();
    let b = h.service.configuration("yara").unwrap();
    assert_eq!(a.biome_weights, b.biome_weights);
    assert_eq!(a.resource_distribution, b.resource_distribution);
    assert_eq!(a.species_start_attributes, b.species_start_attributes);
    assert_eq!(a.world_name, "First World");
    assert_eq!(b.world_name, "Second World");
}
