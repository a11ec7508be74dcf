//! Pokémon data providers.
//!
//! Defines the `PokemonProvider` trait and its two implementations:
//! the live PokeAPI client (retry + cache) and a static lookup table with
//! the same output shape.

pub mod collections;
pub mod pokeapi;
pub mod static_table;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::types::{Pokemon, Result};

/// Abstraction over Pokémon data sources.
///
/// Every implementation normalizes into [`Pokemon`]; callers never see
/// provider-specific shapes.
#[async_trait]
pub trait PokemonProvider: Send + Sync {
    /// Fetch a Pokémon by national dex id.
    async fn get(&self, id: u32) -> Result<Pokemon>;

    /// Look up a Pokémon by name or numeric id, as typed by a user.
    async fn find(&self, query: &str) -> Result<Pokemon>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Fetch several Pokémon concurrently.
///
/// All-or-nothing: the first failure fails the whole batch and no
/// partial list is returned. Output order follows `ids`.
pub async fn fetch_many(provider: &dyn PokemonProvider, ids: &[u32]) -> Result<Vec<Pokemon>> {
    try_join_all(ids.iter().map(|&id| provider.get(id))).await
}

/// Normalize a user-typed search term: trimmed, lower-case.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}
