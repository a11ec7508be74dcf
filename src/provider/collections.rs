//! Themed Pokémon collections.
//!
//! Each collection is a fixed list of dex ids fetched concurrently through
//! a provider. A collection loads all-or-nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use super::{fetch_many, PokemonProvider};
use crate::types::{Pokemon, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Legendary,
    Mythical,
    Gigantamax,
    NewGeneration,
    Regional,
    TopRated,
    UltraBeasts,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Legendary,
        Collection::Mythical,
        Collection::Gigantamax,
        Collection::NewGeneration,
        Collection::Regional,
        Collection::TopRated,
        Collection::UltraBeasts,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Collection::Legendary => "legendary",
            Collection::Mythical => "mythical",
            Collection::Gigantamax => "gigantamax",
            Collection::NewGeneration => "new-generation",
            Collection::Regional => "regional",
            Collection::TopRated => "top-rated",
            Collection::UltraBeasts => "ultra-beasts",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Collection::ALL.into_iter().find(|c| c.slug() == slug)
    }

    /// National dex ids in display order.
    pub fn ids(&self) -> &'static [u32] {
        match self {
            Collection::Legendary => &[144, 145, 146, 150],
            Collection::Mythical => &[151, 251, 386, 492, 493, 494, 495, 496, 497, 498, 499],
            Collection::Gigantamax => &[6, 9, 12, 15, 18, 21, 23, 27, 28, 29, 30],
            Collection::NewGeneration => &[721, 722, 723, 724, 725, 726, 727, 728, 861, 862, 863],
            Collection::Regional => &[38, 110, 222, 223, 224, 225, 226, 227, 228, 229, 230],
            Collection::TopRated => &[445, 248, 373, 448, 449, 450, 451, 452, 453, 454, 455],
            Collection::UltraBeasts => &[793, 794, 795, 796, 797, 798, 799, 800, 801, 802, 803],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Load every member of a collection, in order.
pub async fn fetch_collection(
    provider: &dyn PokemonProvider,
    collection: Collection,
) -> Result<Vec<Pokemon>> {
    let ids = collection.ids();
    info!(collection = %collection, count = ids.len(), provider = provider.name(), "Loading collection");
    fetch_many(provider, ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::static_table::StaticTable;

    #[test]
    fn test_slug_roundtrip() {
        for c in Collection::ALL {
            assert_eq!(Collection::from_slug(c.slug()), Some(c));
        }
        assert_eq!(Collection::from_slug("popular"), None);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&Collection::UltraBeasts).unwrap();
        assert_eq!(json, r#""ultra-beasts""#);
    }

    #[test]
    fn test_ids_are_unique_per_collection() {
        for c in Collection::ALL {
            let mut ids = c.ids().to_vec();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), c.ids().len(), "{c} has duplicate ids");
        }
    }

    #[tokio::test]
    async fn test_partial_availability_fails_whole_collection() {
        // The static table has 144 and 145 but not 146 or 150.
        let table = StaticTable::builtin();
        let err = fetch_collection(&table, Collection::Legendary).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
