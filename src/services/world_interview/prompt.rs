//! Prompt Builder
//!
//! Pure rendering of every text the interview sends to the model or shows the
//! user. Nothing here performs I/O or fails.

use std::collections::BTreeMap;

use crate::models::world::{PlanetSize, TechLevel};

use super::catalog::{topic_at, Topic, TOPICS};

/// Everything needed to ask the next question
#[derive(Debug, Clone, Copy)]
pub struct QuestionContext<'a> {
    /// Answers so far, keyed by topic index
    pub answers: &'a BTreeMap<usize, String>,
    /// Topic to ask about next
    pub next_topic: &'a Topic,
    /// Index of `next_topic`
    pub next_index: usize,
    /// The answer the user just gave, if any
    pub last_answer: Option<&'a str>,
}

/// Render the prompt that asks the model for the next interview question.
pub fn build_question_prompt(ctx: &QuestionContext<'_>) -> String {
    let total = TOPICS.len();
    // Edits can store answers past the current topic; only earlier ones count
    let answered = ctx.answers.keys().filter(|i| **i < ctx.next_index).count();
    let mut prompt = String::from(
        "You are a friendly world-building guide interviewing a user to design a new world.\n\n",
    );

    prompt.push_str(&format!(
        "Progress: {} of {} topics answered. Now on topic {} of {}.\n\n",
        answered,
        total,
        ctx.next_index + 1,
        total
    ));

    if ctx.answers.is_empty() {
        prompt.push_str("No answers yet. This is the first question.\n\n");
    } else {
        prompt.push_str("Answers so far:\n");
        push_answer_lines(&mut prompt, ctx.answers);
        prompt.push('\n');
    }

    if let Some(last) = ctx.last_answer {
        prompt.push_str(&format!("The user's most recent answer: \"{}\"\n\n", last.trim()));
    }

    prompt.push_str(&format!(
        "Next topic:\n- Category: {}\n- Name: {}\n- Description: {}\n\n",
        ctx.next_topic.category.label(),
        ctx.next_topic.name,
        ctx.next_topic.description
    ));

    prompt.push_str(
        "Ask the user one question about the next topic. Keep it to 1-2 sentences. \
         If the most recent answer was vague or very short, briefly acknowledge it and invite \
         more detail before moving on. Respond with only the question text.",
    );

    prompt
}

/// Render the Review summary shown once every topic is answered.
pub fn build_review_summary(answers: &BTreeMap<usize, String>) -> String {
    let mut summary = String::from("Here is everything you've told me about your world:\n\n");
    for (index, topic) in TOPICS.iter().enumerate() {
        let answer = answers
            .get(&index)
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .unwrap_or("(no answer)");
        summary.push_str(&format!("{}. {}: {}\n", index + 1, topic.name, answer));
    }
    summary.push_str(
        "\nReply \"yes\" to create this world, or \"change <topic> to <value>\" to edit an answer.",
    );
    summary
}

/// Review summary preceded by a usage hint, for replies that were neither a
/// confirmation nor an edit.
pub fn build_review_hint(answers: &BTreeMap<usize, String>) -> String {
    format!(
        "I didn't catch that. Reply \"yes\", \"confirm\", \"create\", or \"looks good\" to \
         create your world, or use \"change <topic> to <value>\" to edit an answer.\n\n{}",
        build_review_summary(answers)
    )
}

/// Render the prompt asking the model for one JSON configuration object.
pub fn build_extraction_prompt(answers: &BTreeMap<usize, String>) -> String {
    let tech_levels: Vec<&str> = TechLevel::ALL.iter().map(|t| t.as_str()).collect();
    let planet_sizes: Vec<&str> = PlanetSize::ALL.iter().map(|s| s.as_str()).collect();

    let mut prompt = String::from(
        "Convert the following world-building interview into a structured configuration.\n\n\
         Interview answers:\n",
    );
    push_answer_lines(&mut prompt, answers);

    prompt.push_str(&format!(
        r#"
Return exactly one JSON object with these fields and nothing else:
{{
  "world_name": "string",
  "theme": "string (required)",
  "tone": "string",
  "magic_system": "string",
  "central_conflict": "string",
  "story_branch": "string",
  "tech_level": "one of: {tech}",
  "power_sources": "string",
  "transportation": "string",
  "communication": "string",
  "planet_size": "one of: {sizes}",
  "climate": "string",
  "landmasses": "string",
  "oceans": "string",
  "landmarks": "string",
  "natural_resources": "string",
  "sentient_species": ["string", "... at least one"],
  "societies": "string",
  "government": "string",
  "religion": "string",
  "economy": "string",
  "history": "string"
}}

Use the user's own words where possible. Do not wrap the JSON in prose or explanations."#,
        tech = tech_levels.join(", "),
        sizes = planet_sizes.join(", "),
    ));

    prompt
}

/// Render the prompt asking for alternatives to a taken world name.
pub fn build_name_suggestion_prompt(taken: &str, answers: &BTreeMap<usize, String>) -> String {
    let mut prompt = format!(
        "A user designing a world wants to call it \"{}\", but that name is already taken.\n\n",
        taken
    );
    if !answers.is_empty() {
        prompt.push_str("What we know about the world:\n");
        push_answer_lines(&mut prompt, answers);
        prompt.push('\n');
    }
    prompt.push_str(
        "Suggest exactly three alternative world names in the same spirit. Each name may use \
         only letters, digits, spaces, hyphens, and apostrophes, and be at most 100 characters. \
         Put one name per line with no numbering, quotes, or commentary.",
    );
    prompt
}

fn push_answer_lines(out: &mut String, answers: &BTreeMap<usize, String>) {
    for (index, answer) in answers {
        if let Some(topic) = topic_at(*index) {
            out.push_str(&format!("- {}: {}\n", topic.name, answer.trim()));
        }
    }
}
