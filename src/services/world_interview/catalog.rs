//! Topic Catalog
//!
//! The fixed, ordered list of topics every interview walks through. Order is
//! significant: answers are stored by topic index.

use serde::Serialize;

/// Broad grouping of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicCategory {
    Theme,
    TechLevel,
    Geography,
    Culture,
}

impl TopicCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Theme => "Theme",
            Self::TechLevel => "Tech Level",
            Self::Geography => "Geography",
            Self::Culture => "Culture",
        }
    }
}

/// One question slot in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub category: TopicCategory,
    /// Unique key, also what users type in `change <topic> to <value>`
    pub name: &'static str,
    pub description: &'static str,
}

const fn topic(category: TopicCategory, name: &'static str, description: &'static str) -> Topic {
    Topic {
        category,
        name,
        description,
    }
}

/// Name of the final topic; answers to it go through name resolution.
pub const WORLD_NAME_TOPIC: &str = "World Name";

/// The canonical topic order
pub static TOPICS: &[Topic] = &[
    topic(
        TopicCategory::Theme,
        "Core Theme",
        "The overarching genre and feel of the world, such as high fantasy, grimdark, or space opera.",
    ),
    topic(
        TopicCategory::Theme,
        "Tone",
        "The emotional register of the world: hopeful, bleak, whimsical, mysterious.",
    ),
    topic(
        TopicCategory::Theme,
        "Magic or Mystery",
        "Whether magic or other supernatural forces exist, and what they cost.",
    ),
    topic(
        TopicCategory::Theme,
        "Central Conflict",
        "The main tension that drives stories in this world.",
    ),
    topic(
        TopicCategory::Theme,
        "Branch",
        "A decision point: should the world's story lean toward conflict, discovery, or survival?",
    ),
    topic(
        TopicCategory::TechLevel,
        "Technology Level",
        "How advanced the dominant civilizations are: primitive, medieval, renaissance, industrial, modern, or futuristic.",
    ),
    topic(
        TopicCategory::TechLevel,
        "Power Sources",
        "What powers tools, cities, and war machines: muscle, wind, steam, mana, fusion.",
    ),
    topic(
        TopicCategory::TechLevel,
        "Transportation",
        "How people and goods move across the world.",
    ),
    topic(
        TopicCategory::TechLevel,
        "Communication",
        "How news and messages travel between settlements.",
    ),
    topic(
        TopicCategory::Geography,
        "Planet Size",
        "How big the world is: small, medium, large, or huge.",
    ),
    topic(
        TopicCategory::Geography,
        "Climate",
        "The dominant climate: tropical, arctic, desert, temperate, or a varied mix.",
    ),
    topic(
        TopicCategory::Geography,
        "Landmasses",
        "Continents, archipelagos, or a single supercontinent, and how they are arranged.",
    ),
    topic(
        TopicCategory::Geography,
        "Oceans",
        "How much of the world is water, and what lives in or beyond the seas.",
    ),
    topic(
        TopicCategory::Geography,
        "Notable Landmarks",
        "Mountains, rifts, ruins, or wonders that every inhabitant has heard of.",
    ),
    topic(
        TopicCategory::Geography,
        "Natural Resources",
        "What the land offers and what people fight over: ore, timber, crystals, water.",
    ),
    topic(
        TopicCategory::Culture,
        "Sentient Species",
        "The thinking peoples of the world, such as humans, elves, dwarves, orcs, or something new.",
    ),
    topic(
        TopicCategory::Culture,
        "Societies",
        "How the species organize themselves: nations, clans, city-states, hives.",
    ),
    topic(
        TopicCategory::Culture,
        "Government",
        "Who rules and how power is held or contested.",
    ),
    topic(
        TopicCategory::Culture,
        "Religion",
        "Gods, philosophies, and the institutions built around them.",
    ),
    topic(
        TopicCategory::Culture,
        "Economy",
        "What is traded, what counts as wealth, and who controls it.",
    ),
    topic(
        TopicCategory::Culture,
        "History",
        "The defining events of the past that still shape the present.",
    ),
    topic(
        TopicCategory::Culture,
        WORLD_NAME_TOPIC,
        "The name of the world. It must be unique and use only letters, digits, spaces, hyphens, and apostrophes.",
    ),
];

/// Number of topics in the catalog
pub fn topic_count() -> usize {
    TOPICS.len()
}

/// Topic at `index`, if in range
pub fn topic_at(index: usize) -> Option<&'static Topic> {
    TOPICS.get(index)
}

/// Find a topic by name, ignoring case and surrounding whitespace
pub fn find_topic(name: &str) -> Option<(usize, &'static Topic)> {
    let wanted = name.trim();
    TOPICS
        .iter()
        .enumerate()
        .find(|(_, t)| t.name.eq_ignore_ascii_case(wanted))
}

/// Index of the world name topic
pub fn world_name_index() -> usize {
    TOPICS.len() - 1
}

/// Whether `topic` is the world name topic
pub fn is_world_name(topic: &Topic) -> bool {
    topic.name == WORLD_NAME_TOPIC
}
