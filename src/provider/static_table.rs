//! Static lookup table.
//!
//! A small in-memory set of Pokémon grouped into featured categories
//! ("legendary", "popular", "starters"). It implements the same provider
//! trait as the live client, so it can stand in for PokeAPI entirely
//! (offline mode, tests) and it backs the featured listings.

use async_trait::async_trait;

use super::{normalize_query, PokemonProvider};
use crate::types::{PokedexError, Pokemon, Result, Stat, StatName};

const PROVIDER_NAME: &str = "static";

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Official artwork URL for a national dex id.
pub fn artwork_url(id: u32) -> String {
    format!("{ARTWORK_BASE}/{id}.png")
}

/// One row of the table: a Pokémon and the featured category it is listed under.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub category: String,
    pub pokemon: Pokemon,
}

#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    rows: Vec<TableRow>,
}

#[allow(clippy::too_many_arguments)]
fn row(
    category: &str,
    id: u32,
    name: &str,
    types: &[&str],
    stats: [u32; 6],
    height: u32,
    weight: u32,
    abilities: &[&str],
) -> TableRow {
    TableRow {
        category: category.to_string(),
        pokemon: Pokemon {
            id,
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            stats: StatName::ALL
                .iter()
                .zip(stats)
                .map(|(&n, v)| Stat::new(n, v))
                .collect(),
            height,
            weight,
            abilities: abilities.iter().map(|a| a.to_string()).collect(),
            image: Some(artwork_url(id)),
        },
    }
}

impl StaticTable {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// The built-in featured set.
    pub fn builtin() -> Self {
        Self::new(vec![
            row("legendary", 144, "articuno", &["ice", "flying"], [90, 85, 100, 95, 125, 85], 17, 554, &["pressure"]),
            row("legendary", 145, "zapdos", &["electric", "flying"], [90, 90, 85, 125, 90, 100], 16, 526, &["pressure"]),
            row("popular", 25, "pikachu", &["electric"], [35, 55, 40, 50, 50, 90], 4, 60, &["static"]),
            row("popular", 6, "charizard", &["fire", "flying"], [78, 84, 78, 109, 85, 100], 17, 905, &["blaze"]),
            row("starters", 1, "bulbasaur", &["grass", "poison"], [45, 49, 49, 65, 65, 45], 7, 69, &["overgrow"]),
        ])
    }

    /// All Pokémon listed under a category, in table order.
    /// Unknown categories yield an empty list.
    pub fn category(&self, category: &str) -> Vec<Pokemon> {
        self.rows
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.pokemon.clone())
            .collect()
    }

    /// Distinct category names, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for r in &self.rows {
            if !names.contains(&r.category.as_str()) {
                names.push(&r.category);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn by_id(&self, id: u32) -> Option<&Pokemon> {
        self.rows.iter().map(|r| &r.pokemon).find(|p| p.id == id)
    }
}

#[async_trait]
impl PokemonProvider for StaticTable {
    async fn get(&self, id: u32) -> Result<Pokemon> {
        self.by_id(id)
            .cloned()
            .ok_or_else(|| PokedexError::not_found(id.to_string()))
    }

    async fn find(&self, query: &str) -> Result<Pokemon> {
        let query = normalize_query(query);
        let found = match query.parse::<u32>() {
            Ok(id) => self.by_id(id),
            Err(_) => self.rows.iter().map(|r| &r.pokemon).find(|p| p.name == query),
        };
        found.cloned().ok_or_else(|| PokedexError::not_found(query))
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}
