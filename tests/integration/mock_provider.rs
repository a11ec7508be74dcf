//! Mock provider for integration testing.
//!
//! A deterministic `PokemonProvider` that serves a known roster from
//! memory, counts calls, and can be told to fail for specific ids.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use pokedex::provider::PokemonProvider;
use pokedex::types::{FetchFailure, PokedexError, Pokemon, Result, Stat, StatName};

pub struct MockProvider {
    roster: Vec<Pokemon>,
    calls: AtomicUsize,
    /// Ids that fail with a retrieval error.
    failing: Mutex<HashSet<u32>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_roster(Self::default_roster())
    }

    pub fn with_roster(roster: Vec<Pokemon>) -> Self {
        Self {
            roster,
            calls: AtomicUsize::new(0),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Make every subsequent lookup of `id` fail as if the network were down.
    pub fn fail_id(&self, id: u32) {
        self.failing.lock().unwrap().insert(id);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn mon(id: u32, name: &str, stats: [u32; 6]) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            types: vec!["normal".to_string()],
            stats: StatName::ALL
                .iter()
                .zip(stats)
                .map(|(&n, v)| Stat::new(n, v))
                .collect(),
            height: 10,
            weight: 100,
            abilities: vec![],
            image: None,
        }
    }

    fn default_roster() -> Vec<Pokemon> {
        vec![
            Self::mon(1, "bulbasaur", [45, 49, 49, 65, 65, 45]),
            Self::mon(4, "charmander", [39, 52, 43, 60, 50, 65]),
            Self::mon(7, "squirtle", [44, 48, 65, 50, 64, 43]),
            Self::mon(25, "pikachu", [35, 55, 40, 50, 50, 90]),
            Self::mon(133, "eevee", [55, 55, 50, 45, 65, 55]),
            Self::mon(143, "snorlax", [160, 110, 65, 65, 110, 30]),
        ]
    }
}

#[async_trait]
impl PokemonProvider for MockProvider {
    async fn get(&self, id: u32) -> Result<Pokemon> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(&id) {
            return Err(PokedexError::Retrieval {
                url: format!("mock://pokemon/{id}"),
                attempts: 3,
                cause: FetchFailure::Status(503),
            });
        }

        self.roster
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PokedexError::NotFound {
                query: id.to_string(),
            })
    }

    async fn find(&self, query: &str) -> Result<Pokemon> {
        let query = query.trim().to_lowercase();
        match query.parse::<u32>() {
            Ok(id) => self.get(id).await,
            Err(_) => {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.roster
                    .iter()
                    .find(|p| p.name == query)
                    .cloned()
                    .ok_or(PokedexError::NotFound { query })
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
