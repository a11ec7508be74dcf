//! In-memory Pokémon cache keyed by national dex id.
//!
//! Owned by the provider client and shared across concurrent requests.
//! By default entries never expire; an optional TTL can be configured,
//! in which case stale entries read as misses and are dropped lazily.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::Pokemon;

struct CacheEntry {
    pokemon: Pokemon,
    inserted_at: DateTime<Utc>,
}

pub struct EntityCache {
    entries: RwLock<HashMap<u32, CacheEntry>>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityCache {
    /// A cache whose entries live for the whole process.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new()
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => now - entry.inserted_at < ttl,
            None => true,
        }
    }

    /// Look up a Pokémon by id.
    pub async fn get(&self, id: u32) -> Option<Pokemon> {
        let entries = self.entries.read().await;
        let found = entries
            .get(&id)
            .filter(|e| self.is_fresh(e, Utc::now()))
            .map(|e| e.pokemon.clone());

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(id, "Cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Look up a cached Pokémon by its (lower-case) name.
    pub async fn find_by_name(&self, name: &str) -> Option<Pokemon> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        let found = entries
            .values()
            .find(|e| e.pokemon.name == name && self.is_fresh(e, now))
            .map(|e| e.pokemon.clone());

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(name, "Cache hit by name");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Insert or replace. Concurrent inserts for the same id: last write wins.
    pub async fn insert(&self, pokemon: Pokemon) {
        let mut entries = self.entries.write().await;
        entries.insert(
            pokemon.id,
            CacheEntry {
                pokemon,
                inserted_at: Utc::now(),
            },
        );
    }

    /// Remove expired entries. Returns how many were dropped.
    pub async fn evict_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| self.is_fresh(e, now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
