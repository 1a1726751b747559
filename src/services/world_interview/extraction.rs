//! Configuration Extraction
//!
//! Turns the finished interview into a [`WorldConfiguration`] with one model
//! call, then fills in the derived generation parameters.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use worldforge_llm::TextGenerator;

use crate::models::interview::Interview;
use crate::models::world::WorldConfiguration;
use crate::utils::error::{AppError, AppResult};

use super::catalog::world_name_index;
use super::derivation::apply_derivations;
use super::prompt::build_extraction_prompt;

/// Raw shape the model is asked to return
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExtractedFields {
    world_name: Option<String>,
    theme: Option<String>,
    tone: Option<String>,
    magic_system: Option<String>,
    central_conflict: Option<String>,
    story_branch: Option<String>,
    tech_level: Option<String>,
    power_sources: Option<String>,
    transportation: Option<String>,
    communication: Option<String>,
    planet_size: Option<String>,
    climate: Option<String>,
    landmasses: Option<String>,
    oceans: Option<String>,
    landmarks: Option<String>,
    natural_resources: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    sentient_species: Vec<String>,
    societies: Option<String>,
    government: Option<String>,
    religion: Option<String>,
    economy: Option<String>,
    history: Option<String>,
}

/// Accept `["Humans", "Elves"]`, `"Humans, Elves"`, or null.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<String>),
        One(String),
    }

    let parsed = Option::<OneOrMany>::deserialize(deserializer)?;
    let items = match parsed {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(joined)) => joined.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pull the JSON object out of a model response that may carry fences or
/// surrounding prose.
pub fn extract_json_from_response(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(start) = body.find("```") {
        let after_fence = &body[start + 3..];
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            body = content[..end].trim();
        }
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &body[start..=end],
        _ => body,
    }
}

/// Single-call structured extraction
#[derive(Clone)]
pub struct ExtractionService {
    client: Arc<dyn TextGenerator>,
}

impl ExtractionService {
    pub fn new(client: Arc<dyn TextGenerator>) -> Self {
        Self { client }
    }

    /// Build a configuration from the interview's answers.
    ///
    /// The stored World Name answer, which already passed name resolution,
    /// wins over whatever name the model reports. The result is not yet
    /// validated.
    pub async fn extract(
        &self,
        interview: &Interview,
        answers: &BTreeMap<usize, String>,
    ) -> AppResult<WorldConfiguration> {
        let prompt = build_extraction_prompt(answers);
        let response = self.client.generate(&prompt).await?;

        let json = extract_json_from_response(&response);
        let fields: ExtractedFields = serde_json::from_str(json).map_err(|e| {
            tracing::warn!(interview_id = %interview.id, "Extraction response was not valid JSON: {}", e);
            AppError::parse(format!("Could not parse world configuration: {}", e))
        })?;

        let world_name = answers
            .get(&world_name_index())
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| non_empty(fields.world_name))
            .unwrap_or_default();

        let mut config = WorldConfiguration {
            id: uuid::Uuid::new_v4().to_string(),
            interview_id: interview.id.clone(),
            user_id: interview.user_id.clone(),
            world_id: None,
            world_name,
            theme: non_empty(fields.theme).unwrap_or_default(),
            tech_level: non_empty(fields.tech_level)
                .map(|t| t.to_lowercase())
                .unwrap_or_default(),
            planet_size: non_empty(fields.planet_size)
                .map(|s| s.to_lowercase())
                .unwrap_or_default(),
            sentient_species: fields.sentient_species,
            tone: non_empty(fields.tone),
            magic_system: non_empty(fields.magic_system),
            central_conflict: non_empty(fields.central_conflict),
            story_branch: non_empty(fields.story_branch),
            power_sources: non_empty(fields.power_sources),
            transportation: non_empty(fields.transportation),
            communication: non_empty(fields.communication),
            climate: non_empty(fields.climate),
            landmasses: non_empty(fields.landmasses),
            oceans: non_empty(fields.oceans),
            landmarks: non_empty(fields.landmarks),
            natural_resources: non_empty(fields.natural_resources),
            societies: non_empty(fields.societies),
            government: non_empty(fields.government),
            religion: non_empty(fields.religion),
            economy: non_empty(fields.economy),
            history: non_empty(fields.history),
            biome_weights: BTreeMap::new(),
            resource_distribution: BTreeMap::new(),
            species_start_attributes: BTreeMap::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        apply_derivations(&mut config);

        tracing::debug!(
            interview_id = %interview.id,
            world_name = %config.world_name,
            "Extracted world configuration"
        );
        Ok(config)
    }
}

impl std::fmt::Debug for ExtractionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionService").finish()
    }
}
