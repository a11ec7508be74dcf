//! Shared types for the Pokédex service.
//!
//! These types form the data model used across all modules. Providers
//! normalize into [`Pokemon`]; the comparison engine, groups and search
//! history only ever see this shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// The six recognized base stats, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatName {
    /// Canonical attribute order used by every comparison.
    pub const ALL: [StatName; 6] = [
        StatName::Hp,
        StatName::Attack,
        StatName::Defense,
        StatName::SpecialAttack,
        StatName::SpecialDefense,
        StatName::Speed,
    ];

    /// Provider-facing name (`"special-attack"` etc.).
    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Hp => "hp",
            StatName::Attack => "attack",
            StatName::Defense => "defense",
            StatName::SpecialAttack => "special-attack",
            StatName::SpecialDefense => "special-defense",
            StatName::Speed => "speed",
        }
    }

    /// Map a provider stat name onto a recognized stat.
    /// Unrecognized names yield `None`.
    pub fn from_api_name(name: &str) -> Option<Self> {
        StatName::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named base stat value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: StatName,
    pub value: u32,
}

impl Stat {
    pub fn new(name: StatName, value: u32) -> Self {
        Self { name, value }
    }
}

// ---------------------------------------------------------------------------
// Pokémon
// ---------------------------------------------------------------------------

/// A normalized Pokémon record.
///
/// Built once from a provider payload or a static table row and never
/// mutated afterwards; groups and history hold clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Type tags in provider slot order ("grass", "poison").
    pub types: Vec<String>,
    pub stats: Vec<Stat>,
    /// Decimetres, as reported by the provider.
    pub height: u32,
    /// Hectograms, as reported by the provider.
    pub weight: u32,
    pub abilities: Vec<String>,
    /// Official artwork URL, when the provider has one.
    #[serde(default)]
    pub image: Option<String>,
}

impl Pokemon {
    /// Value of a stat, or 0 when the record does not carry it.
    pub fn stat(&self, name: StatName) -> u32 {
        self.stats
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value)
            .unwrap_or(0)
    }

    /// Sum of all six base stats (missing stats count as 0, saturating).
    pub fn base_stat_total(&self) -> u32 {
        StatName::ALL
            .iter()
            .map(|&s| self.stat(s))
            .fold(0, u32::saturating_add)
    }

    /// Helper to build a test Pokémon with the given stat line.
    #[cfg(test)]
    pub fn sample(id: u32, name: &str, stats: [u32; 6]) -> Self {
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
            abilities: vec!["run-away".to_string()],
            image: None,
        }
    }
}

impl fmt::Display for Pokemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} [{}] (BST {})",
            self.id,
            self.name,
            self.types.join("/"),
            self.base_stat_total(),
        )
    }
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

/// One remembered search: what was found, when, and by which client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub pokemon: Pokemon,
    pub timestamp: DateTime<Utc>,
    /// Opaque client identifier, e.g. the caller's IP or a session id.
    pub client_id: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a single retrieval attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP error status: {0}")]
    Status(u16),

    #[error("response is not JSON (content-type: {})", .0.as_deref().unwrap_or("none"))]
    NotJson(Option<String>),

    #[error("invalid JSON body: {0}")]
    Decode(String),
}

/// Domain-specific error types for the Pokédex.
#[derive(Debug, thiserror::Error)]
pub enum PokedexError {
    #[error("Retrieval failed for {url} after {attempts} attempt(s): {cause}")]
    Retrieval {
        url: String,
        attempts: u32,
        cause: FetchFailure,
    },

    #[error("Pokémon not found: {query}")]
    NotFound { query: String },

    #[error("Unexpected provider payload for {query}: {message}")]
    Parse { query: String, message: String },
}

impl PokedexError {
    /// Whether this error means "no such Pokémon" rather than "provider
    /// unavailable". Payload shape mismatches count as not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PokedexError::NotFound { .. } | PokedexError::Parse { .. })
    }

    pub(crate) fn not_found(query: impl Into<String>) -> Self {
        PokedexError::NotFound { query: query.into() }
    }
}

pub type Result<T> = std::result::Result<T, PokedexError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_order_is_canonical() {
        let names: Vec<&str> = StatName::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["hp", "attack", "defense", "special-attack", "special-defense", "speed"]
        );
    }

    #[test]
    fn test_stat_from_api_name() {
        assert_eq!(StatName::from_api_name("special-defense"), Some(StatName::SpecialDefense));
        assert_eq!(StatName::from_api_name("hp"), Some(StatName::Hp));
        assert_eq!(StatName::from_api_name("special"), None);
        assert_eq!(StatName::from_api_name("HP"), None);
    }

    #[test]
    fn test_stat_serializes_kebab_case() {
        let json = serde_json::to_string(&Stat::new(StatName::SpecialAttack, 65)).unwrap();
        assert_eq!(json, r#"{"name":"special-attack","value":65}"#);
    }

    #[test]
    fn test_missing_stat_is_zero() {
        let mut p = Pokemon::sample(1, "bulbasaur", [45, 49, 49, 65, 65, 45]);
        p.stats.retain(|s| s.name != StatName::Speed);
        assert_eq!(p.stat(StatName::Speed), 0);
        assert_eq!(p.stat(StatName::Hp), 45);
        assert_eq!(p.base_stat_total(), 45 + 49 + 49 + 65 + 65);
    }

    #[test]
    fn test_base_stat_total_saturates() {
        let p = Pokemon::sample(1, "huge", [u32::MAX, 1, 0, 0, 0, 0]);
        assert_eq!(p.base_stat_total(), u32::MAX);
        assert!(p.to_string().contains(&u32::MAX.to_string()));
    }

    #[test]
    fn test_pokemon_display() {
        let mut p = Pokemon::sample(25, "pikachu", [35, 55, 40, 50, 50, 90]);
        p.types = vec!["electric".into()];
        assert_eq!(format!("{p}"), "#25 pikachu [electric] (BST 320)");
    }

    #[test]
    fn test_pokemon_json_roundtrip_without_image() {
        let json = r#"{
            "id": 7, "name": "squirtle", "types": ["water"],
            "stats": [{"name": "hp", "value": 44}],
            "height": 5, "weight": 90, "abilities": ["torrent"]
        }"#;
        let p: Pokemon = serde_json::from_str(json).unwrap();
        assert_eq!(p.image, None);
        assert_eq!(p.stat(StatName::Hp), 44);
        assert_eq!(p.stat(StatName::Attack), 0);
    }

    #[test]
    fn test_error_classification() {
        assert!(PokedexError::not_found("missingno").is_not_found());
        assert!(PokedexError::Parse { query: "1".into(), message: "bad".into() }.is_not_found());
        let retrieval = PokedexError::Retrieval {
            url: "http://x".into(),
            attempts: 3,
            cause: FetchFailure::Status(503),
        };
        assert!(!retrieval.is_not_found());
        assert!(retrieval.to_string().contains("after 3 attempt(s)"));
        assert!(retrieval.to_string().contains("503"));
    }

    #[test]
    fn test_not_json_message() {
        assert_eq!(
            FetchFailure::NotJson(None).to_string(),
            "response is not JSON (content-type: none)"
        );
        assert_eq!(
            FetchFailure::NotJson(Some("text/html".into())).to_string(),
            "response is not JSON (content-type: text/html)"
        );
    }
}
