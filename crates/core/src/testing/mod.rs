//! Testing utilities and mock implementations.
//!
//! This module provides a mock PokeAPI source and payload fixtures so the
//! sync pipeline and both catalog services can be tested without network
//! access.
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_core::testing::{MockPokemonSource, fixtures};
//!
//! let source = MockPokemonSource::new();
//! source.add_pokemon(fixtures::pokemon_payload(25, "pikachu")).await;
//! source.add_species(25, fixtures::species_payload(&[("en", "Mouse.")], Some("yellow"))).await;
//!
//! // Use in CatalogSync or LiveApiService...
//! ```

mod mock_pokemon_source;

pub use mock_pokemon_source::{MockFailure, MockPokemonSource, RecordedRequest};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{BaseStats, PokemonData};
    use crate::pokeapi::{
        ArtworkSprites, FlavorTextEntry, MoveEntry, NamedResource, OtherSprites, PokemonPayload,
        SpeciesPayload, Sprites, StatEntry, TypeSlot, VersionGroupDetail,
    };

    /// Sprites with the given artwork and default front sprite.
    pub fn sprites(artwork: Option<&str>, front_default: Option<&str>) -> Sprites {
        Sprites {
            front_default: front_default.map(str::to_string),
            other: Some(OtherSprites {
                official_artwork: Some(ArtworkSprites {
                    front_default: artwork.map(str::to_string),
                }),
            }),
        }
    }

    /// A move entry with version group details as `(learn_method, level)` pairs.
    pub fn move_entry(name: &str, details: &[(&str, u32)]) -> MoveEntry {
        MoveEntry {
            move_ref: Some(NamedResource::new(name)),
            version_group_details: Some(
                details
                    .iter()
                    .map(|(method, level)| VersionGroupDetail {
                        level_learned_at: Some(*level),
                        move_learn_method: Some(NamedResource::new(method)),
                    })
                    .collect(),
            ),
        }
    }

    /// A primary payload shaped like Bulbasaur's, with the given number and name.
    pub fn pokemon_payload(number: u32, name: &str) -> PokemonPayload {
        let stats = [
            ("hp", 45),
            ("attack", 49),
            ("defense", 49),
            ("special-attack", 65),
            ("special-defense", 65),
            ("speed", 45),
        ];

        PokemonPayload {
            id: number,
            name: name.to_string(),
            sprites: sprites(
                Some(&format!("https://img.example/artwork/{}.png", number)),
                Some(&format!("https://img.example/sprites/{}.png", number)),
            ),
            types: Some(
                ["grass", "poison"]
                    .iter()
                    .enumerate()
                    .map(|(i, t)| TypeSlot {
                        slot: Some(i as u32 + 1),
                        kind: Some(NamedResource::new(t)),
                    })
                    .collect(),
            ),
            weight: Some(69),
            height: Some(7),
            stats: Some(
                stats
                    .iter()
                    .map(|(stat, base)| StatEntry {
                        base_stat: Some(*base),
                        stat: Some(NamedResource::new(stat)),
                    })
                    .collect(),
            ),
            moves: Some(vec![
                move_entry("razor-wind", &[("egg", 0)]),
                move_entry("swords-dance", &[("machine", 0)]),
                move_entry("vine-whip", &[("level-up", 3)]),
            ]),
        }
    }

    /// A species payload with `(language, flavor_text)` entries and a color.
    pub fn species_payload(entries: &[(&str, &str)], color: Option<&str>) -> SpeciesPayload {
        SpeciesPayload {
            flavor_text_entries: Some(
                entries
                    .iter()
                    .map(|(lang, text)| FlavorTextEntry {
                        flavor_text: Some(text.to_string()),
                        language: Some(NamedResource::new(lang)),
                    })
                    .collect(),
            ),
            color: color.map(NamedResource::new),
        }
    }

    /// A catalog record with reasonable defaults.
    pub fn pokemon_data(number: u32, name: &str) -> PokemonData {
        PokemonData {
            number,
            name: name.to_string(),
            image: Some(format!("https://img.example/artwork/{}.png", number)),
            types: vec!["normal".to_string()],
            weight: 100,
            height: 10,
            description: Some(format!("The {} Pokemon.", name)),
            color: Some("brown".to_string()),
            base_stats: BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                special_attack: 50,
                special_defense: 50,
                speed: 50,
            },
            moves: Vec::new(),
        }
    }
}
