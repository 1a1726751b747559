//! World Name Resolution
//!
//! Format checks, case-insensitive uniqueness, and alternative suggestions for
//! the World Name topic.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use worldforge_llm::TextGenerator;

use crate::utils::error::AppResult;

use super::prompt::build_name_suggestion_prompt;
use super::state::InterviewRepository;

/// Longest accepted world name, in characters
pub const MAX_WORLD_NAME_LEN: usize = 100;

const SUGGESTION_COUNT: usize = 3;

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9 '\-]+$").expect("valid regex"))
}

/// Check the format of a proposed world name.
///
/// Returns the trimmed name, or a user-facing message explaining the problem.
pub fn validate_format(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("An empty world name is not valid. Please give your world a name.".to_string());
    }
    if trimmed.chars().count() > MAX_WORLD_NAME_LEN {
        return Err(format!(
            "That world name is not valid: it must be at most {} characters long.",
            MAX_WORLD_NAME_LEN
        ));
    }
    if !name_regex().is_match(trimmed) {
        return Err(format!(
            "\"{}\" is not valid as a world name. Use only letters, digits, spaces, hyphens, and apostrophes.",
            trimmed
        ));
    }
    Ok(trimmed.to_string())
}

/// Outcome of resolving a proposed name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCheck {
    /// Well-formed and free; carries the trimmed name
    Accepted(String),
    /// Malformed; carries the user-facing message
    Invalid(String),
    /// Already used by another configuration
    Taken {
        name: String,
        suggestions: Vec<String>,
    },
}

impl NameCheck {
    /// User-facing explanation for a rejected name
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            Self::Accepted(_) => None,
            Self::Invalid(message) => Some(message.clone()),
            Self::Taken { name, suggestions } => Some(format!(
                "The world name \"{}\" is already taken. How about one of these: {}?",
                name,
                suggestions.join(", ")
            )),
        }
    }
}

/// A leading list marker: `1.`, `2)`, `-`, `*` or `•`, followed by whitespace
fn list_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+").expect("valid regex"))
}

/// Parse a model response into candidate names, one per line, tolerating
/// bullets, numbering, and quotes.
pub fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            list_marker_regex()
                .replace(line, "")
                .trim()
                .trim_matches(|c| matches!(c, '"' | '`'))
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Deterministic alternatives for `name`, used when the model cannot help.
pub fn fallback_suggestions(name: &str) -> Vec<String> {
    let base: String = name.trim().chars().take(MAX_WORLD_NAME_LEN - 8).collect();
    let base = base.trim();
    vec![
        format!("New {}", base),
        format!("{} Prime", base),
        format!("{} Reborn", base),
        format!("{} Beyond", base),
        format!("Greater {}", base),
        format!("{} II", base),
    ]
}

/// Resolves World Name answers against the stored configurations
#[derive(Clone)]
pub struct NameResolver {
    repository: Arc<dyn InterviewRepository>,
    client: Arc<dyn TextGenerator>,
}

impl NameResolver {
    pub fn new(repository: Arc<dyn InterviewRepository>, client: Arc<dyn TextGenerator>) -> Self {
        Self { repository, client }
    }

    /// Check format and uniqueness of `name` for `interview_id`.
    ///
    /// A name already held by this interview's own configuration does not
    /// count as taken.
    pub async fn resolve(
        &self,
        name: &str,
        interview_id: &str,
        answers: &BTreeMap<usize, String>,
    ) -> AppResult<NameCheck> {
        let name = match validate_format(name) {
            Ok(name) => name,
            Err(message) => return Ok(NameCheck::Invalid(message)),
        };

        if !self.repository.is_world_name_taken(&name, Some(interview_id))? {
            return Ok(NameCheck::Accepted(name));
        }

        tracing::info!(interview_id = %interview_id, world_name = %name, "World name already taken");
        let suggestions = self.suggest(&name, interview_id, answers).await?;
        Ok(NameCheck::Taken { name, suggestions })
    }

    async fn suggest(
        &self,
        name: &str,
        interview_id: &str,
        answers: &BTreeMap<usize, String>,
    ) -> AppResult<Vec<String>> {
        let prompt = build_name_suggestion_prompt(name, answers);
        let candidates = match self.client.generate(&prompt).await {
            Ok(text) => parse_suggestions(&text),
            Err(e) => {
                tracing::warn!("Name suggestion request failed, using fallbacks: {}", e);
                Vec::new()
            }
        };

        let mut suggestions = self.usable(candidates, name, interview_id, Vec::new())?;
        if suggestions.len() < SUGGESTION_COUNT {
            suggestions = self.usable(fallback_suggestions(name), name, interview_id, suggestions)?;
        }
        Ok(suggestions)
    }

    /// Append well-formed, free, distinct candidates to `accepted` until it
    /// holds enough suggestions.
    fn usable(
        &self,
        candidates: Vec<String>,
        taken: &str,
        interview_id: &str,
        mut accepted: Vec<String>,
    ) -> AppResult<Vec<String>> {
        for candidate in candidates {
            if accepted.len() >= SUGGESTION_COUNT {
                break;
            }
            let Ok(candidate) = validate_format(&candidate) else {
                continue;
            };
            let duplicate = candidate.eq_ignore_ascii_case(taken)
                || accepted.iter().any(|a| a.eq_ignore_ascii_case(&candidate));
            if duplicate {
                continue;
            }
            if self
                .repository
                .is_world_name_taken(&candidate, Some(interview_id))?
            {
                continue;
            }
            accepted.push(candidate);
        }
        Ok(accepted)
    }
}

impl std::fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameResolver").finish()
    }
}
