//! Interview Service
//!
//! The world-creation state machine. Every operation loads the user's
//! interview, acts on its derived [`InterviewPhase`], and persists only after
//! any model call it depends on has succeeded.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};
use worldforge_llm::{LlmError, TextGenerator};

use crate::models::interview::{Interview, InterviewPhase, InterviewStatus};
use crate::models::world::{World, WorldConfiguration};
use crate::services::world::WorldCreationTrigger;
use crate::utils::error::{AppError, AppResult};

use super::catalog::{find_topic, is_world_name, topic_at, topic_count, world_name_index, TOPICS};
use super::extraction::ExtractionService;
use super::naming::{NameCheck, NameResolver};
use super::prompt::{build_question_prompt, build_review_hint, build_review_summary, QuestionContext};
use super::state::{answers_by_index, InterviewRepository};
use super::validation::validate_configuration;

/// What every interview operation hands back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct InterviewReply {
    pub interview: Interview,
    pub phase: InterviewPhase,
    /// Natural-language text to show the user
    pub message: String,
    /// Set once confirmation has created a world
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_id: Option<String>,
}

impl InterviewReply {
    fn new(interview: Interview, message: impl Into<String>) -> Self {
        Self {
            phase: interview.phase(topic_count()),
            interview,
            message: message.into(),
            world_id: None,
        }
    }
}

fn change_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)^\s*change\s+(.+?)\s+to\s+(.+)$").unwrap())
}

fn confirm_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(yes|confirm|create|looks good)[.!]*$").unwrap())
}

/// Split `change <topic> to <value>` at the first " to ".
pub fn parse_change_command(text: &str) -> Option<(String, String)> {
    let caps = change_regex().captures(text)?;
    let topic = caps.get(1)?.as_str().trim().to_string();
    let value = caps.get(2)?.as_str().trim().to_string();
    Some((topic, value))
}

/// Whether `text` confirms the Review summary
pub fn is_confirmation(text: &str) -> bool {
    confirm_regex().is_match(text.trim())
}

fn topic_list() -> String {
    TOPICS.iter().map(|t| t.name).collect::<Vec<_>>().join(", ")
}

/// Result of an edit attempt
enum EditOutcome {
    Saved { topic: &'static str },
    /// The command named no catalog topic; carries the user-facing message
    UnknownTopic(String),
    Rejected(String),
}

/// Orchestrates interviews for all users
#[derive(Clone)]
pub struct InterviewService {
    repository: Arc<dyn InterviewRepository>,
    client: Arc<dyn TextGenerator>,
    extraction: ExtractionService,
    names: NameResolver,
    worlds: WorldCreationTrigger,
}

impl InterviewService {
    pub fn new(
        repository: Arc<dyn InterviewRepository>,
        client: Arc<dyn TextGenerator>,
        worlds: WorldCreationTrigger,
    ) -> Self {
        Self {
            extraction: ExtractionService::new(client.clone()),
            names: NameResolver::new(repository.clone(), client.clone()),
            repository,
            client,
            worlds,
        }
    }

    /// Start an interview, or pick up the user's unfinished one.
    pub async fn start(&self, user_id: &str) -> AppResult<InterviewReply> {
        if let Some(existing) = self.repository.get_interview(user_id)? {
            if !existing.is_completed() {
                info!(user_id = %user_id, interview_id = %existing.id, "Reusing active interview");
                return self.render_current(existing).await;
            }
        }

        let interview = self.repository.create_interview(user_id)?;
        info!(user_id = %user_id, interview_id = %interview.id, "Started interview");
        self.render_current(interview).await
    }

    /// Regenerate the current question, or re-render the summary in Review.
    pub async fn resume(&self, user_id: &str) -> AppResult<InterviewReply> {
        let interview = self.active_interview(user_id)?;
        debug!(interview_id = %interview.id, "Resuming interview");
        self.render_current(interview).await
    }

    /// Handle one free-text message from the user.
    pub async fn process(&self, user_id: &str, text: &str) -> AppResult<InterviewReply> {
        let interview = self.active_interview(user_id)?;

        match interview.phase(topic_count()) {
            InterviewPhase::InProgress { index } => {
                if let Some((topic, value)) = parse_change_command(text) {
                    return self.edit_in_place(interview, &topic, &value).await;
                }
                self.answer(interview, index, text).await
            }
            InterviewPhase::Review => {
                if is_confirmation(text) {
                    return self.finalize(interview).await;
                }
                if let Some((topic, value)) = parse_change_command(text) {
                    return self.edit_in_place(interview, &topic, &value).await;
                }
                let answers = self.answers(&interview.id)?;
                Ok(InterviewReply::new(interview, build_review_hint(&answers)))
            }
            InterviewPhase::Completed => Err(AppError::not_found(format!(
                "No active interview for user {}",
                user_id
            ))),
        }
    }

    /// Overwrite the answer to `topic`, in any phase.
    pub async fn edit(&self, user_id: &str, topic: &str, value: &str) -> AppResult<InterviewReply> {
        let interview = self.active_interview(user_id)?;
        self.edit_in_place(interview, topic, value).await
    }

    /// Confirm the Review summary without typing a confirmation phrase.
    pub async fn complete(&self, user_id: &str) -> AppResult<InterviewReply> {
        let interview = self.active_interview(user_id)?;
        match interview.phase(topic_count()) {
            InterviewPhase::Review => self.finalize(interview).await,
            InterviewPhase::InProgress { index } => Err(AppError::validation(format!(
                "Interview is still on topic {} of {}; answer every topic before completing",
                index + 1,
                topic_count()
            ))),
            InterviewPhase::Completed => Err(AppError::not_found(format!(
                "No active interview for user {}",
                user_id
            ))),
        }
    }

    /// Re-run generation for a world whose first generation failed.
    pub async fn regenerate(&self, world_id: &str) -> AppResult<World> {
        let config = self
            .repository
            .get_configuration_by_world_id(world_id)?
            .ok_or_else(|| AppError::not_found(format!("No configuration for world {}", world_id)))?;
        self.worlds.regenerate(world_id, &config).await
    }

    /// The user's most recent world configuration
    pub fn configuration(&self, user_id: &str) -> AppResult<WorldConfiguration> {
        self.repository
            .get_configuration_by_user_id(user_id)?
            .ok_or_else(|| AppError::not_found(format!("No world configuration for user {}", user_id)))
    }

    fn active_interview(&self, user_id: &str) -> AppResult<Interview> {
        self.repository
            .get_interview(user_id)?
            .filter(|interview| !interview.is_completed())
            .ok_or_else(|| AppError::not_found(format!("No active interview for user {}", user_id)))
    }

    fn reload(&self, interview: &Interview) -> AppResult<Interview> {
        self.repository
            .get_interview(&interview.user_id)?
            .filter(|latest| latest.id == interview.id)
            .ok_or_else(|| AppError::not_found(format!("Interview {}", interview.id)))
    }

    fn answers(&self, interview_id: &str) -> AppResult<BTreeMap<usize, String>> {
        Ok(answers_by_index(&self.repository.get_answers(interview_id)?))
    }

    async fn ask(
        &self,
        answers: &BTreeMap<usize, String>,
        index: usize,
        last_answer: Option<&str>,
    ) -> AppResult<String> {
        let next_topic = topic_at(index)
            .ok_or_else(|| AppError::internal(format!("No topic at index {}", index)))?;
        let prompt = build_question_prompt(&QuestionContext {
            answers,
            next_topic,
            next_index: index,
            last_answer,
        });

        debug!(index, topic = next_topic.name, "Requesting next question");
        let question = self.client.generate(&prompt).await?;
        let question = question.trim();
        if question.is_empty() {
            return Err(LlmError::EmptyResponse.into());
        }
        Ok(question.to_string())
    }

    async fn render_current(&self, interview: Interview) -> AppResult<InterviewReply> {
        match interview.phase(topic_count()) {
            InterviewPhase::InProgress { index } => {
                let answers = self.answers(&interview.id)?;
                let last = index
                    .checked_sub(1)
                    .and_then(|prev| answers.get(&prev))
                    .map(String::as_str);
                let question = self.ask(&answers, index, last).await?;

                let interview = if interview.status == InterviewStatus::NotStarted {
                    self.repository
                        .update_interview_status(&interview.id, InterviewStatus::InProgress)?;
                    self.reload(&interview)?
                } else {
                    interview
                };
                Ok(InterviewReply::new(interview, question))
            }
            InterviewPhase::Review => {
                let answers = self.answers(&interview.id)?;
                Ok(InterviewReply::new(interview, build_review_summary(&answers)))
            }
            InterviewPhase::Completed => Err(AppError::not_found(format!(
                "No active interview for user {}",
                interview.user_id
            ))),
        }
    }

    async fn answer(&self, interview: Interview, index: usize, text: &str) -> AppResult<InterviewReply> {
        let topic = topic_at(index)
            .ok_or_else(|| AppError::internal(format!("No topic at index {}", index)))?;
        let mut answers = self.answers(&interview.id)?;

        let mut answer = text.trim().to_string();
        if answer.is_empty() {
            let message = format!(
                "I didn't get an answer there. {}: {}",
                topic.name, topic.description
            );
            return Ok(InterviewReply::new(interview, message));
        }

        if is_world_name(topic) {
            match self.names.resolve(&answer, &interview.id, &answers).await? {
                NameCheck::Accepted(name) => answer = name,
                rejected => {
                    let message = rejected.rejection_message().unwrap_or_default();
                    return Ok(InterviewReply::new(interview, message));
                }
            }
        }

        answers.insert(index, answer.clone());
        let next_index = index + 1;

        // Ask before writing so a failed call leaves the interview untouched
        let message = if next_index < topic_count() {
            self.ask(&answers, next_index, Some(&answer)).await?
        } else {
            build_review_summary(&answers)
        };

        self.repository.save_answer(&interview.id, index, &answer)?;
        self.repository.update_question_index(&interview.id, next_index)?;
        if interview.status != InterviewStatus::InProgress {
            self.repository
                .update_interview_status(&interview.id, InterviewStatus::InProgress)?;
        }

        info!(
            interview_id = %interview.id,
            index = next_index,
            topic = topic.name,
            "Answer recorded"
        );
        Ok(InterviewReply::new(self.reload(&interview)?, message))
    }

    async fn apply_edit(
        &self,
        interview: &Interview,
        topic_name: &str,
        value: &str,
    ) -> AppResult<EditOutcome> {
        let Some((index, topic)) = find_topic(topic_name) else {
            return Ok(EditOutcome::UnknownTopic(format!(
                "There is no topic called \"{}\". Valid topics are: {}.",
                topic_name.trim(),
                topic_list()
            )));
        };

        let mut value = value.trim().to_string();
        if value.is_empty() {
            return Ok(EditOutcome::Rejected(format!(
                "Please give a new value for {}.",
                topic.name
            )));
        }

        if is_world_name(topic) {
            let answers = self.answers(&interview.id)?;
            match self.names.resolve(&value, &interview.id, &answers).await? {
                NameCheck::Accepted(name) => value = name,
                rejected => {
                    return Ok(EditOutcome::Rejected(
                        rejected.rejection_message().unwrap_or_default(),
                    ))
                }
            }
        }

        self.repository.save_answer(&interview.id, index, &value)?;
        info!(interview_id = %interview.id, index, topic = topic.name, "Answer edited");
        Ok(EditOutcome::Saved { topic: topic.name })
    }

    async fn edit_in_place(
        &self,
        interview: Interview,
        topic_name: &str,
        value: &str,
    ) -> AppResult<InterviewReply> {
        let outcome = self.apply_edit(&interview, topic_name, value).await?;

        let unknown_topic = matches!(outcome, EditOutcome::UnknownTopic(_));
        let mut message = match outcome {
            EditOutcome::Saved { topic } => format!("Updated {}.", topic),
            EditOutcome::UnknownTopic(message) | EditOutcome::Rejected(message) => message,
        };

        match interview.phase(topic_count()) {
            InterviewPhase::InProgress { index } => {
                // Nothing was saved; the reply may have been an answer that
                // happens to read like an edit command
                if unknown_topic {
                    message.push_str(
                        " If you meant that as your answer, rephrase it so it doesn't start with \
                         \"change ... to\".",
                    );
                }
                if let Some(current) = topic_at(index) {
                    message.push_str(&format!(
                        "\n\nBack to where we were. {}: {}",
                        current.name, current.description
                    ));
                }
            }
            InterviewPhase::Review => {
                let answers = self.answers(&interview.id)?;
                message.push_str("\n\n");
                message.push_str(&build_review_summary(&answers));
            }
            InterviewPhase::Completed => {}
        }

        Ok(InterviewReply::new(interview, message))
    }

    async fn finalize(&self, interview: Interview) -> AppResult<InterviewReply> {
        let answers = self.answers(&interview.id)?;
        let requested = answers
            .get(&world_name_index())
            .cloned()
            .unwrap_or_default();

        if let rejected @ (NameCheck::Invalid(_) | NameCheck::Taken { .. }) =
            self.names.resolve(&requested, &interview.id, &answers).await?
        {
            let message = format!(
                "{}\n\nUse \"change World Name to <name>\" and confirm again.",
                rejected.rejection_message().unwrap_or_default()
            );
            return Ok(InterviewReply::new(interview, message));
        }

        let mut config = self.extraction.extract(&interview, &answers).await?;
        validate_configuration(&config)?;

        // A previous attempt may have stored the configuration already
        let previous = self
            .repository
            .get_configuration_by_interview_id(&interview.id)?;
        if let Some(previous) = &previous {
            config.id = previous.id.clone();
            config.created_at = previous.created_at.clone();
            config.world_id = previous.world_id.clone();
        }
        self.repository.save_configuration(&config)?;

        let existing_world = match &config.world_id {
            Some(world_id) => self.worlds.get_world(world_id)?,
            None => None,
        };
        let world = match existing_world {
            Some(world) => world,
            None => self.worlds.create_world(&config).await?,
        };

        config.world_id = Some(world.id.clone());
        self.repository.save_configuration(&config)?;
        self.repository
            .update_interview_status(&interview.id, InterviewStatus::Completed)?;

        info!(
            interview_id = %interview.id,
            world_id = %world.id,
            world_name = %config.world_name,
            generated = world.is_generated(),
            "Interview completed"
        );

        let mut message = format!("Your world \"{}\" has been created!", config.world_name);
        if !world.is_generated() {
            message.push_str(" Terrain generation is not available right now; it can be regenerated later.");
        }

        let mut reply = InterviewReply::new(self.reload(&interview)?, message);
        reply.world_id = Some(world.id);
        Ok(reply)
    }
}

impl std::fmt::Debug for InterviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterviewService").finish()
    }
}
