//! Pokédex service entry point.
//!
//! Loads configuration, initialises structured logging, builds the
//! configured provider, restores search history from disk and serves
//! the JSON API until ctrl-c.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use pokedex::api::{self, ApiState};
use pokedex::config::{AppConfig, ProviderConfig, ProviderKind};
use pokedex::fetch::cache::EntityCache;
use pokedex::history::SearchHistory;
use pokedex::provider::pokeapi::PokeApiClient;
use pokedex::provider::static_table::StaticTable;
use pokedex::provider::PokemonProvider;

const BANNER: &str = r#"
 ___       _            _
| _ \ ___ | |__ ___  __| | ___ __ __
|  _// _ \| / // -_)/ _` |/ -_)\ \ /
|_|  \___/|_\_\\___|\__,_|\___|/_\_\

  Stat comparison & search service
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("POKEDEX_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        config = %config_path,
        provider = ?cfg.provider.kind,
        port = cfg.server.port,
        "Pokédex starting up"
    );

    let provider = build_provider(&cfg.provider)?;
    info!(provider = provider.name(), "Provider ready");

    let history = SearchHistory::open(cfg.history.path.clone(), cfg.history.max_items);
    info!(entries = history.len(), path = %cfg.history.path, "Search history ready");

    let state = Arc::new(ApiState::new(
        provider,
        StaticTable::builtin(),
        history,
        cfg.groups.max_group_size,
    ));

    api::serve(state, cfg.server.port).await?;

    info!("Pokédex shut down cleanly.");
    Ok(())
}

/// Build the provider selected in `[provider]`.
fn build_provider(cfg: &ProviderConfig) -> Result<Arc<dyn PokemonProvider>> {
    let provider: Arc<dyn PokemonProvider> = match cfg.kind {
        ProviderKind::PokeApi => {
            let cache = match cfg.cache_ttl() {
                Some(ttl) => EntityCache::with_ttl(ttl),
                None => EntityCache::new(),
            };
            Arc::new(PokeApiClient::new(
                Some(cfg.base_url.clone()),
                cfg.retry_policy(),
                cfg.timeout(),
                cache,
            )?)
        }
        ProviderKind::Static => Arc::new(StaticTable::builtin()),
    };
    Ok(provider)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pokedex=info"));

    let json_logging = std::env::var("POKEDEX_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
