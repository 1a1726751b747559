//! Interview Models
//!
//! The persisted interview aggregate and its answers.

use serde::{Deserialize, Serialize};

/// Persisted lifecycle status of an interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl InterviewStatus {
    /// Get the string form for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parse from the database string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Where an interview stands in the conversation.
///
/// Derived from `(status, current_question_index)` by [`Interview::phase`] and
/// nowhere else; callers match on this instead of comparing indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum InterviewPhase {
    /// Answering topic `index` of the catalog
    InProgress { index: usize },
    /// Every topic answered, waiting for confirmation
    Review,
    /// Confirmed; a world configuration exists
    Completed,
}

/// One user's world-creation interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    pub user_id: String,
    pub status: InterviewStatus,
    /// Next topic to answer, in `[0, N]`
    pub current_question_index: usize,
    /// Created timestamp (ISO-8601)
    pub created_at: String,
    /// Last updated timestamp (ISO-8601)
    pub updated_at: String,
}

impl Interview {
    /// Phase for a catalog of `topic_count` topics
    pub fn phase(&self, topic_count: usize) -> InterviewPhase {
        match self.status {
            InterviewStatus::Completed => InterviewPhase::Completed,
            _ if self.current_question_index >= topic_count => InterviewPhase::Review,
            _ => InterviewPhase::InProgress {
                index: self.current_question_index,
            },
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == InterviewStatus::Completed
    }
}

/// A stored answer, keyed by `(interview_id, question_index)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub interview_id: String,
    pub question_index: usize,
    pub answer_text: String,
    pub created_at: String,
}
