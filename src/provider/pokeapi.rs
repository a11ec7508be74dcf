//! PokeAPI integration.
//!
//! Fetches `/pokemon/{id-or-name}` through the retrying fetch layer and
//! strictly parses the payload into [`Pokemon`]. Results are cached by id
//! for the lifetime of the client.
//!
//! API docs: https://pokeapi.co/docs/v2
//! Base URL: https://pokeapi.co/api/v2
//! Auth: None required.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{normalize_query, PokemonProvider};
use crate::fetch::cache::EntityCache;
use crate::fetch::{fetch_with_retry, HttpTransport, RetryPolicy, Transport};
use crate::types::{FetchFailure, PokedexError, Pokemon, Result, Stat, StatName};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Largest base stat the games can represent (one byte).
pub const MAX_BASE_STAT: u32 = 255;
const PROVIDER_NAME: &str = "pokeapi";

// ---------------------------------------------------------------------------
// API response types (PokeAPI JSON → Rust)
// ---------------------------------------------------------------------------

/// The subset of `/pokemon/{id}` we rely on. Missing required fields are a
/// parse error, never a partially-filled record.
#[derive(Debug, Deserialize)]
struct ApiPokemon {
    id: u32,
    name: String,
    types: Vec<ApiTypeSlot>,
    stats: Vec<ApiStat>,
    height: u32,
    weight: u32,
    abilities: Vec<ApiAbilitySlot>,
    #[serde(default)]
    sprites: Option<ApiSprites>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiTypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct ApiStat {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct ApiAbilitySlot {
    ability: NamedResource,
}

#[derive(Debug, Deserialize)]
struct ApiSprites {
    #[serde(default)]
    other: Option<ApiOtherSprites>,
}

#[derive(Debug, Deserialize)]
struct ApiOtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<ApiArtwork>,
}

#[derive(Debug, Deserialize)]
struct ApiArtwork {
    #[serde(default)]
    front_default: Option<String>,
}

impl ApiPokemon {
    fn into_pokemon(self) -> Pokemon {
        let stats = self
            .stats
            .into_iter()
            .filter_map(|s| match StatName::from_api_name(&s.stat.name) {
                Some(name) => Some(Stat::new(name, s.base_stat)),
                None => {
                    debug!(stat = %s.stat.name, id = self.id, "Ignoring unrecognized stat");
                    None
                }
            })
            .collect();

        let image = self
            .sprites
            .and_then(|s| s.other)
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default);

        Pokemon {
            id: self.id,
            name: self.name,
            types: self.types.into_iter().map(|t| t.kind.name).collect(),
            stats,
            height: self.height,
            weight: self.weight,
            abilities: self.abilities.into_iter().map(|a| a.ability.name).collect(),
            image,
        }
    }
}

/// Parse a raw `/pokemon/{query}` payload into a [`Pokemon`].
pub fn parse_pokemon(query: &str, payload: Value) -> Result<Pokemon> {
    let api: ApiPokemon = serde_json::from_value(payload).map_err(|e| PokedexError::Parse {
        query: query.to_string(),
        message: e.to_string(),
    })?;

    if api.id == 0 {
        return Err(PokedexError::Parse {
            query: query.to_string(),
            message: "id must be positive".to_string(),
        });
    }

    if let Some(s) = api.stats.iter().find(|s| s.base_stat > MAX_BASE_STAT) {
        return Err(PokedexError::Parse {
            query: query.to_string(),
            message: format!(
                "base stat {} = {} exceeds {MAX_BASE_STAT}",
                s.stat.name, s.base_stat
            ),
        });
    }

    Ok(api.into_pokemon())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct PokeApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    policy: RetryPolicy,
    cache: EntityCache,
}

impl PokeApiClient {
    /// Create a client backed by reqwest.
    pub fn new(
        base_url: Option<String>,
        policy: RetryPolicy,
        timeout: Duration,
        cache: EntityCache,
    ) -> anyhow::Result<Self> {
        let transport = Arc::new(HttpTransport::new(timeout)?);
        Ok(Self::with_transport(
            transport,
            base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            policy,
            cache,
        ))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        policy: RetryPolicy,
        cache: EntityCache,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, max_attempts = policy.max_attempts, "PokeAPI client ready");
        Self {
            transport,
            base_url,
            policy,
            cache,
        }
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    fn pokemon_url(&self, key: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, urlencoding::encode(key))
    }

    /// Fetch by id, consulting the cache before any network call.
    ///
    /// Id 0 is rejected before the cache or network is touched. A 404 on
    /// every attempt means the id does not exist. On failure the cache is
    /// left untouched so a later call retries the network path.
    pub async fn fetch_entity_cached(&self, id: u32) -> Result<Pokemon> {
        let key = id.to_string();
        if id == 0 {
            return Err(PokedexError::not_found(key));
        }

        if let Some(hit) = self.cache.get(id).await {
            return Ok(hit);
        }

        let payload = fetch_with_retry(&*self.transport, &self.pokemon_url(&key), self.policy)
            .await
            .map_err(|e| not_found_on_404(e, &key))?;
        let pokemon = parse_pokemon(&key, payload)?;

        if pokemon.id != id {
            return Err(PokedexError::Parse {
                query: key,
                message: format!("requested id {id}, payload carries id {}", pokemon.id),
            });
        }

        self.cache.insert(pokemon.clone()).await;
        debug!(
            id,
            name = %pokemon.name,
            cache_hits = self.cache.hits(),
            cache_misses = self.cache.misses(),
            "Fetched and cached"
        );
        Ok(pokemon)
    }

    /// Search by name. One attempt only: an interactive search should not
    /// stall on backoff, and a 404 means the name does not exist.
    async fn search_by_name(&self, name: &str) -> Result<Pokemon> {
        if let Some(hit) = self.cache.find_by_name(name).await {
            return Ok(hit);
        }

        let payload = fetch_with_retry(&*self.transport, &self.pokemon_url(name), RetryPolicy::once())
            .await
            .map_err(|e| not_found_on_404(e, name))?;
        let pokemon = parse_pokemon(name, payload)?;

        self.cache.insert(pokemon.clone()).await;
        debug!(
            name,
            id = pokemon.id,
            cache_hits = self.cache.hits(),
            cache_misses = self.cache.misses(),
            "Fetched by name and cached"
        );
        Ok(pokemon)
    }
}

/// A retrieval that ended on a 404 means the Pokémon does not exist.
fn not_found_on_404(err: PokedexError, query: &str) -> PokedexError {
    match err {
        PokedexError::Retrieval {
            cause: FetchFailure::Status(404),
            ..
        } => PokedexError::not_found(query),
        other => other,
    }
}

#[async_trait]
impl PokemonProvider for PokeApiClient {
    async fn get(&self, id: u32) -> Result<Pokemon> {
        self.fetch_entity_cached(id).await
    }

    async fn find(&self, query: &str) -> Result<Pokemon> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Err(PokedexError::not_found(query));
        }

        match query.parse::<u32>() {
            Ok(0) => Err(PokedexError::not_found(query)),
            Ok(id) => self.fetch_entity_cached(id).await,
            Err(_) => self.search_by_name(&query).await,
        }
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
