//! Raw PokeAPI payloads.
//!
//! Only `id` and `name` are required; every other field tolerates absence so
//! a sparse record still transforms into a catalog entry.

use serde::{Deserialize, Serialize};

/// A `{name, url}` reference as PokeAPI nests them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl NamedResource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: None,
        }
    }
}

/// `pokemon/{id}` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonPayload {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Option<Vec<TypeSlot>>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub stats: Option<Vec<StatEntry>>,
    #[serde(default)]
    pub moves: Option<Vec<MoveEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtworkSprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: Option<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatEntry {
    #[serde(default)]
    pub base_stat: Option<u32>,
    #[serde(default)]
    pub stat: Option<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move", default)]
    pub move_ref: Option<NamedResource>,
    #[serde(default)]
    pub version_group_details: Option<Vec<VersionGroupDetail>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionGroupDetail {
    #[serde(default)]
    pub level_learned_at: Option<u32>,
    #[serde(default)]
    pub move_learn_method: Option<NamedResource>,
}

/// `pokemon-species/{id}` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesPayload {
    #[serde(default)]
    pub flavor_text_entries: Option<Vec<FlavorTextEntry>>,
    #[serde(default)]
    pub color: Option<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorTextEntry {
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub language: Option<NamedResource>,
}

/// `pokemon?limit=...` payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IndexPayload {
    pub results: Vec<NamedResource>,
}

/// One species in the full index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub number: u32,
    pub name: String,
}

impl IndexPayload {
    /// Numbers come from the trailing id of each resource URL, falling back
    /// to the 1-based position when the URL has none.
    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.results
            .into_iter()
            .enumerate()
            .map(|(index, resource)| IndexEntry {
                number: resource
                    .url
                    .as_deref()
                    .and_then(trailing_id)
                    .unwrap_or(index as u32 + 1),
                name: resource.name,
            })
            .collect()
    }
}

fn trailing_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}
