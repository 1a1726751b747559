//! Generation Parameter Derivation
//!
//! Deterministic mapping from descriptive answers to the numeric inputs of the
//! procedural generator. Same input, same output; maps are ordered so the
//! serialized form is stable too.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::world::{TechLevel, WorldConfiguration};

fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Whole-word climate keywords, checked in order: tropical, arctic, desert, temperate
fn climate_regexes() -> &'static [Regex; 4] {
    static RE: OnceLock<[Regex; 4]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"(?i)\b(?:tropical|jungles?|humid|rainforests?)\b").unwrap(),
            Regex::new(r"(?i)\b(?:arctic|frozen|ice|icy|polar|cold)\b").unwrap(),
            Regex::new(r"(?i)\b(?:deserts?|arid|dry)\b").unwrap(),
            Regex::new(r"(?i)\b(?:temperate|varied|mixed|diverse|mild)\b").unwrap(),
        ]
    })
}

/// Biome weights keyed by biome, chosen by keywords in the climate answer.
pub fn derive_biome_weights(climate: Option<&str>) -> BTreeMap<String, f64> {
    let climate = climate.unwrap_or_default();
    let [tropical, arctic, desert, temperate] = climate_regexes();

    if tropical.is_match(climate) {
        weights(&[
            ("desert", 0.05),
            ("forest", 0.15),
            ("grassland", 0.15),
            ("jungle", 0.4),
            ("ocean", 0.2),
            ("tundra", 0.05),
        ])
    } else if arctic.is_match(climate) {
        weights(&[
            ("desert", 0.05),
            ("forest", 0.15),
            ("grassland", 0.05),
            ("jungle", 0.0),
            ("ocean", 0.25),
            ("tundra", 0.5),
        ])
    } else if desert.is_match(climate) {
        weights(&[
            ("desert", 0.5),
            ("forest", 0.05),
            ("grassland", 0.2),
            ("jungle", 0.0),
            ("ocean", 0.2),
            ("tundra", 0.05),
        ])
    } else if temperate.is_match(climate) {
        weights(&[
            ("desert", 0.1),
            ("forest", 0.3),
            ("grassland", 0.25),
            ("jungle", 0.05),
            ("ocean", 0.25),
            ("tundra", 0.05),
        ])
    } else {
        weights(&[
            ("desert", 0.15),
            ("forest", 0.2),
            ("grassland", 0.2),
            ("jungle", 0.1),
            ("ocean", 0.25),
            ("tundra", 0.1),
        ])
    }
}

/// Resource abundance keyed by resource, chosen by tech level.
pub fn derive_resource_distribution(tech_level: &str) -> BTreeMap<String, f64> {
    match TechLevel::parse(tech_level) {
        Some(TechLevel::Primitive) => weights(&[
            ("food", 0.4),
            ("metal", 0.05),
            ("stone", 0.25),
            ("wood", 0.3),
        ]),
        Some(TechLevel::Medieval) => weights(&[
            ("food", 0.3),
            ("iron", 0.25),
            ("stone", 0.2),
            ("wood", 0.25),
        ]),
        Some(TechLevel::Renaissance) => weights(&[
            ("food", 0.25),
            ("iron", 0.2),
            ("silver", 0.15),
            ("stone", 0.15),
            ("wood", 0.25),
        ]),
        Some(TechLevel::Industrial) => weights(&[
            ("coal", 0.3),
            ("food", 0.2),
            ("iron", 0.3),
            ("oil", 0.1),
            ("wood", 0.1),
        ]),
        Some(TechLevel::Modern) => weights(&[
            ("copper", 0.15),
            ("food", 0.15),
            ("oil", 0.3),
            ("rare_earths", 0.2),
            ("uranium", 0.2),
        ]),
        Some(TechLevel::Futuristic) => weights(&[
            ("antimatter", 0.2),
            ("crystals", 0.25),
            ("food", 0.1),
            ("helium3", 0.2),
            ("rare_earths", 0.25),
        ]),
        None => weights(&[
            ("food", 0.25),
            ("metal", 0.25),
            ("stone", 0.25),
            ("wood", 0.25),
        ]),
    }
}

const ATTRIBUTES: [&str; 5] = ["agility", "charisma", "intelligence", "strength", "wisdom"];

fn profile(values: [i32; 5]) -> BTreeMap<String, i32> {
    ATTRIBUTES
        .iter()
        .zip(values)
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn species_profile(species: &str) -> BTreeMap<String, i32> {
    let lower = species.to_lowercase();
    // agility, charisma, intelligence, strength, wisdom
    if lower.contains("elf") || lower.contains("elv") {
        profile([14, 11, 12, 8, 12])
    } else if lower.contains("dwar") {
        profile([8, 9, 10, 14, 12])
    } else if lower.contains("orc") {
        profile([10, 8, 8, 16, 8])
    } else if lower.contains("human") {
        profile([10, 12, 11, 10, 10])
    } else {
        profile([10, 10, 10, 10, 10])
    }
}

/// Starting attributes for each named species.
pub fn derive_species_attributes(species: &[String]) -> BTreeMap<String, BTreeMap<String, i32>> {
    species
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| (s.to_string(), species_profile(s)))
        .collect()
}

/// Fill all derived fields of `config` from its descriptive fields.
pub fn apply_derivations(config: &mut WorldConfiguration) {
    config.biome_weights = derive_biome_weights(config.climate.as_deref());
    config.resource_distribution = derive_resource_distribution(&config.tech_level);
    config.species_start_attributes = derive_species_attributes(&config.sentient_species);
}
