//! Types for the Pokemon catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of moves kept per Pokemon.
pub const MAX_MOVES: usize = 20;

/// The six canonical base stats.
///
/// Every field is always present; stats missing from the source default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

/// A move a Pokemon can learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonMove {
    /// Title-cased move name ("Razor Wind").
    pub name: String,
    /// Title-cased learn method of the most recent version group ("Level Up").
    pub learn_method: Option<String>,
    /// Level the move is learned at, 0 when unknown.
    #[serde(default)]
    pub level_learned_at: u32,
}

/// Catalog fields of a Pokemon, as produced by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonData {
    /// National dex number, the stable identifier.
    pub number: u32,
    /// Unique lowercase name.
    pub name: String,
    /// Artwork URL.
    pub image: Option<String>,
    /// Type names in slot order.
    #[serde(default)]
    pub types: Vec<String>,
    /// Weight in decigrams.
    #[serde(default)]
    pub weight: u32,
    /// Height in decimeters.
    #[serde(default)]
    pub height: u32,
    /// Normalized English flavor text.
    pub description: Option<String>,
    /// Species color name.
    pub color: Option<String>,
    #[serde(default)]
    pub base_stats: BaseStats,
    /// Up to [`MAX_MOVES`] moves, unique by name.
    #[serde(default)]
    pub moves: Vec<PokemonMove>,
}

/// A persisted catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    #[serde(flatten)]
    pub data: PokemonData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List view of a Pokemon. Detail fields are withheld to keep pages small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub name: String,
    pub number: u32,
    pub image: Option<String>,
}

impl From<&PokemonData> for PokemonSummary {
    fn from(data: &PokemonData) -> Self {
        Self {
            name: data.name.clone(),
            number: data.number,
            image: data.image.clone(),
        }
    }
}

/// One page of a filtered, sorted listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonPage {
    pub items: Vec<PokemonSummary>,
    /// Number of matches before pagination.
    pub total_count: u64,
}

/// Neighbor reference used for prev/next navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub number: u32,
    pub name: String,
}

/// The entries with the immediately lower and higher numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub prev: Option<NavigationEntry>,
    pub next: Option<NavigationEntry>,
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> PokemonData {
        PokemonData {
            number: 1,
            name: "bulbasaur".to_string(),
            image: Some("https://img.example/1.png".to_string()),
            types: vec!["grass".to_string(), "poison".to_string()],
            weight: 69,
            height: 7,
            description: Some("A strange seed was planted on its back at birth.".to_string()),
            color: Some("green".to_string()),
            base_stats: BaseStats {
                hp: 45,
                attack: 49,
                defense: 49,
                special_attack: 65,
                special_defense: 65,
                speed: 45,
            },
            moves: vec![PokemonMove {
                name: "Tackle".to_string(),
                learn_method: Some("Level Up".to_string()),
                level_learned_at: 1,
            }],
        }
    }

    #[test]
    fn test_base_stats_always_has_six_keys() {
        let json = serde_json::to_value(BaseStats::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        for key in [
            "hp",
            "attack",
            "defense",
            "special_attack",
            "special_defense",
            "speed",
        ] {
            assert_eq!(obj[key], 0, "missing {}", key);
        }
    }

    #[test]
    fn test_base_stats_partial_json_defaults_to_zero() {
        let stats: BaseStats = serde_json::from_str(r#"{"hp": 10}"#).unwrap();
        assert_eq!(stats.hp, 10);
        assert_eq!(stats.speed, 0);
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = PokemonRecord {
            data: bulbasaur(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "bulbasaur");
        assert_eq!(json["number"], 1);
        assert_eq!(json["base_stats"]["special_attack"], 65);
        assert_eq!(json["moves"][0]["learn_method"], "Level Up");
        assert!(json.get("data").is_none());
        assert!(json.get("updated_at").is_some());
    }

    #[test]
    fn test_summary_keeps_only_list_fields() {
        let summary = PokemonSummary::from(&bulbasaur());
        let json = serde_json::to_value(&summary).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(json["image"], "https://img.example/1.png");
    }

    #[test]
    fn test_navigation_serializes_nulls() {
        let nav = Navigation {
            prev: None,
            next: Some(NavigationEntry {
                number: 2,
                name: "ivysaur".to_string(),
            }),
        };
        let json = serde_json::to_value(&nav).unwrap();
        assert!(json["prev"].is_null());
        assert_eq!(json["next"]["number"], 2);
    }
}
