//! World Models
//!
//! The structured output of a completed interview and the world aggregate it
//! produces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Technology levels the generator knows how to seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechLevel {
    Primitive,
    Medieval,
    Renaissance,
    Industrial,
    Modern,
    Futuristic,
}

impl TechLevel {
    pub const ALL: [TechLevel; 6] = [
        TechLevel::Primitive,
        TechLevel::Medieval,
        TechLevel::Renaissance,
        TechLevel::Industrial,
        TechLevel::Modern,
        TechLevel::Futuristic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Medieval => "medieval",
            Self::Renaissance => "renaissance",
            Self::Industrial => "industrial",
            Self::Modern => "modern",
            Self::Futuristic => "futuristic",
        }
    }

    /// Parse a tech level, tolerating case and a few common synonyms.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "primitive" | "stone age" | "bronze age" | "tribal" => Some(Self::Primitive),
            "medieval" | "iron age" | "feudal" => Some(Self::Medieval),
            "renaissance" | "early modern" => Some(Self::Renaissance),
            "industrial" | "steampunk" | "victorian" => Some(Self::Industrial),
            "modern" | "contemporary" | "information age" => Some(Self::Modern),
            "futuristic" | "sci-fi" | "space age" | "advanced" => Some(Self::Futuristic),
            _ => None,
        }
    }
}

/// Planet sizes the generator supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetSize {
    Small,
    Medium,
    Large,
    Huge,
}

impl PlanetSize {
    pub const ALL: [PlanetSize; 4] = [
        PlanetSize::Small,
        PlanetSize::Medium,
        PlanetSize::Large,
        PlanetSize::Huge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Huge => "huge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" | "tiny" => Some(Self::Small),
            "medium" | "earth-like" | "earth sized" | "average" => Some(Self::Medium),
            "large" | "big" => Some(Self::Large),
            "huge" | "giant" | "massive" => Some(Self::Huge),
            _ => None,
        }
    }
}

/// Validated, structured output of a completed interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfiguration {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    /// Set once the world record exists
    #[serde(default)]
    pub world_id: Option<String>,

    // Required
    pub world_name: String,
    pub theme: String,
    pub tech_level: String,
    pub planet_size: String,
    pub sentient_species: Vec<String>,

    // Descriptive
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub magic_system: Option<String>,
    #[serde(default)]
    pub central_conflict: Option<String>,
    #[serde(default)]
    pub story_branch: Option<String>,
    #[serde(default)]
    pub power_sources: Option<String>,
    #[serde(default)]
    pub transportation: Option<String>,
    #[serde(default)]
    pub communication: Option<String>,
    #[serde(default)]
    pub climate: Option<String>,
    #[serde(default)]
    pub landmasses: Option<String>,
    #[serde(default)]
    pub oceans: Option<String>,
    #[serde(default)]
    pub landmarks: Option<String>,
    #[serde(default)]
    pub natural_resources: Option<String>,
    #[serde(default)]
    pub societies: Option<String>,
    #[serde(default)]
    pub government: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub economy: Option<String>,
    #[serde(default)]
    pub history: Option<String>,

    // Derived generation parameters
    pub biome_weights: BTreeMap<String, f64>,
    pub resource_distribution: BTreeMap<String, f64>,
    pub species_start_attributes: BTreeMap<String, BTreeMap<String, i32>>,

    /// Created timestamp (ISO-8601)
    pub created_at: String,
}

/// A world record, created on interview confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub id: String,
    pub name: String,
    pub shape: String,
    /// Radius in kilometres
    pub radius: f64,
    /// Free-form metadata; generation results are folded in here
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl World {
    /// Whether generation metadata has been folded in yet
    pub fn is_generated(&self) -> bool {
        self.metadata.contains_key("generation")
    }
}

/// Metadata reported by the procedural generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub seed: u64,
    pub generation_time_ms: u64,
    pub sea_level: f64,
    pub land_ratio: f64,
    pub width: u32,
    pub height: u32,
}

/// Artifact produced by the procedural generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedWorld {
    pub geography: serde_json::Value,
    pub weather: serde_json::Value,
    pub metadata: GenerationMetadata,
}
