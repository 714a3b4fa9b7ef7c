//! Field derivation from raw PokeAPI payloads into catalog records.

use crate::catalog::{BaseStats, PokemonData, PokemonMove, MAX_MOVES};

use super::types::{FlavorTextEntry, MoveEntry, PokemonPayload, SpeciesPayload, Sprites};

/// Where an image URL can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// `sprites.other["official-artwork"].front_default`
    OfficialArtwork,
    /// `sprites.front_default`
    FrontDefault,
}

impl ImageSource {
    pub fn extract<'a>(&self, sprites: &'a Sprites) -> Option<&'a str> {
        match self {
            ImageSource::OfficialArtwork => sprites
                .other
                .as_ref()?
                .official_artwork
                .as_ref()?
                .front_default
                .as_deref(),
            ImageSource::FrontDefault => sprites.front_default.as_deref(),
        }
    }
}

/// Image sources in order of preference.
pub const IMAGE_SOURCES: [ImageSource; 2] = [ImageSource::OfficialArtwork, ImageSource::FrontDefault];

/// Flavor text languages in order of preference.
pub const DESCRIPTION_LANGUAGES: &[&str] = &["en"];

/// Build a catalog record from a primary payload and an optional species payload.
pub fn build_pokemon(pokemon: &PokemonPayload, species: Option<&SpeciesPayload>) -> PokemonData {
    PokemonData {
        number: pokemon.id,
        name: pokemon.name.clone(),
        image: extract_image(&pokemon.sprites),
        types: extract_types(pokemon),
        weight: pokemon.weight.unwrap_or(0),
        height: pokemon.height.unwrap_or(0),
        description: species.and_then(extract_description),
        color: species
            .and_then(|s| s.color.as_ref())
            .map(|c| c.name.clone()),
        base_stats: extract_base_stats(pokemon),
        moves: extract_moves(pokemon),
    }
}

/// First present image in [`IMAGE_SOURCES`] order.
pub fn extract_image(sprites: &Sprites) -> Option<String> {
    IMAGE_SOURCES
        .iter()
        .find_map(|source| source.extract(sprites))
        .map(str::to_string)
}

/// Type names in source order; empty when the field is absent.
pub fn extract_types(pokemon: &PokemonPayload) -> Vec<String> {
    pokemon
        .types
        .iter()
        .flatten()
        .filter_map(|slot| slot.kind.as_ref().map(|t| t.name.clone()))
        .collect()
}

/// Look up each canonical stat by its PokeAPI name, 0 when missing.
pub fn extract_base_stats(pokemon: &PokemonPayload) -> BaseStats {
    let stat = |name: &str| -> u32 {
        pokemon
            .stats
            .iter()
            .flatten()
            .find(|s| s.stat.as_ref().is_some_and(|r| r.name == name))
            .and_then(|s| s.base_stat)
            .unwrap_or(0)
    };

    BaseStats {
        hp: stat("hp"),
        attack: stat("attack"),
        defense: stat("defense"),
        special_attack: stat("special-attack"),
        special_defense: stat("special-defense"),
        speed: stat("speed"),
    }
}

/// First flavor text in a preferred language, whitespace collapsed.
pub fn extract_description(species: &SpeciesPayload) -> Option<String> {
    let entries = species.flavor_text_entries.as_deref()?;

    let entry: &FlavorTextEntry = DESCRIPTION_LANGUAGES.iter().find_map(|lang| {
        entries
            .iter()
            .find(|e| e.language.as_ref().is_some_and(|l| l.name == *lang))
    })?;

    entry
        .flavor_text
        .as_deref()
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Moves in source order, unique by title-cased name, at most [`MAX_MOVES`].
///
/// Learn method and level come from the most recent version group.
pub fn extract_moves(pokemon: &PokemonPayload) -> Vec<PokemonMove> {
    let mut moves: Vec<PokemonMove> = Vec::new();

    for entry in pokemon.moves.iter().flatten() {
        if moves.len() == MAX_MOVES {
            break;
        }

        let Some(pokemon_move) = build_move(entry) else {
            continue;
        };

        if !moves.iter().any(|m| m.name == pokemon_move.name) {
            moves.push(pokemon_move);
        }
    }

    moves
}

fn build_move(entry: &MoveEntry) -> Option<PokemonMove> {
    let name = titleize(&entry.move_ref.as_ref()?.name);
    let latest = entry
        .version_group_details
        .as_deref()
        .and_then(|details| details.last());

    Some(PokemonMove {
        name,
        learn_method: latest
            .and_then(|d| d.move_learn_method.as_ref())
            .map(|m| titleize(&m.name)),
        level_learned_at: latest.and_then(|d| d.level_learned_at).unwrap_or(0),
    })
}

/// "razor-wind" -> "Razor Wind"
pub fn titleize(slug: &str) -> String {
    slug.replace('-', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
