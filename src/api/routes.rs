//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ApiState>`.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, warn};

use crate::compare::{compare, Comparison};
use crate::groups::Group;
use crate::history::SearchHistory;
use crate::provider::collections::{fetch_collection, Collection};
use crate::provider::static_table::StaticTable;
use crate::provider::{fetch_many, PokemonProvider};
use crate::types::{HistoryEntry, PokedexError, Pokemon};

/// Header carrying the caller's opaque client id.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub provider: Arc<dyn PokemonProvider>,
    /// Featured listings ("popular", "starters", ...).
    pub featured: StaticTable,
    pub history: RwLock<SearchHistory>,
    /// Serializes history file writes so they land in mutation order.
    persist_lock: Mutex<()>,
    pub max_group_size: usize,
}

impl ApiState {
    pub fn new(
        provider: Arc<dyn PokemonProvider>,
        featured: StaticTable,
        history: SearchHistory,
        max_group_size: usize,
    ) -> Self {
        Self {
            provider,
            featured,
            history: RwLock::new(history),
            persist_lock: Mutex::new(()),
            max_group_size,
        }
    }
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Maps domain errors onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub PokedexError);

impl From<PokedexError> for ApiError {
    fn from(e: PokedexError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_GATEWAY
        };
        if status == StatusCode::BAD_GATEWAY {
            warn!(error = %self.0, "Provider request failed");
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub group_a: Vec<u32>,
    #[serde(default)]
    pub group_b: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    pub group_a: Group,
    pub group_b: Group,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub client: Option<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/pokemon/:id
pub async fn get_pokemon(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Pokemon>, ApiError> {
    let pokemon = state.provider.get(id).await?;
    Ok(Json(pokemon))
}

/// GET /api/search/:query
///
/// Successful searches are recorded in the history under the caller's
/// `x-client-id`, or a fresh id when the header is absent.
pub async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Pokemon>, ApiError> {
    let pokemon = state.provider.find(&query).await?;

    let client_id = headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // The file write runs on the blocking pool after the history lock is
    // released; the persist lock keeps writes in mutation order.
    let (pending, _persist) = {
        let mut history = state.history.write().await;
        history.remember(pokemon.clone(), &client_id);
        let order = state.persist_lock.lock().await;
        (history.pending_write(), order)
    };
    if let Some(job) = pending {
        if let Err(e) = tokio::task::spawn_blocking(move || job.run()).await {
            error!(error = %e, "History write task failed");
        }
    }
    debug!(query = %query, id = pokemon.id, client = %client_id, "Search recorded");

    Ok(Json(pokemon))
}

/// GET /api/collections/:name
///
/// Themed collections load through the provider, all-or-nothing;
/// featured categories come from the static table.
pub async fn get_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Pokemon>>, ApiError> {
    if let Some(collection) = Collection::from_slug(&name) {
        let list = fetch_collection(state.provider.as_ref(), collection).await?;
        return Ok(Json(list));
    }

    let featured = state.featured.category(&name);
    if featured.is_empty() {
        return Err(PokedexError::NotFound { query: name }.into());
    }
    Ok(Json(featured))
}

/// First occurrence of each id, in request order, at most `cap` of them.
fn bounded_ids(ids: &[u32], cap: usize) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::with_capacity(cap.min(ids.len()));
    for &id in ids {
        if out.len() >= cap {
            break;
        }
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// POST /api/compare
///
/// De-duplicates and caps both id lists before anything is fetched, then
/// resolves them concurrently and compares the resulting groups.
pub async fn compare_groups(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    let ids_a = bounded_ids(&req.group_a, state.max_group_size);
    let ids_b = bounded_ids(&req.group_b, state.max_group_size);

    let provider = state.provider.as_ref();
    let (a, b) = futures::try_join!(fetch_many(provider, &ids_a), fetch_many(provider, &ids_b))?;

    let mut group_a = Group::with_capacity(state.max_group_size);
    let mut group_b = Group::with_capacity(state.max_group_size);
    for p in a {
        group_a.add(p);
    }
    for p in b {
        group_b.add(p);
    }

    let comparison = compare(group_a.members(), group_b.members());
    Ok(Json(CompareResponse {
        group_a,
        group_b,
        comparison,
    }))
}

/// GET /api/history
pub async fn get_history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Json<Vec<HistoryEntry>> {
    let history = state.history.read().await;
    let entries = match q.client.as_deref() {
        Some(client) => history.for_client(client).into_iter().cloned().collect(),
        None => history.entries().to_vec(),
    };
    Json(entries)
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
