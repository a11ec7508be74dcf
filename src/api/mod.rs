//! JSON API: Axum web server over the provider, groups and history.
//!
//! CORS is open so a browser front-end on another origin can call it.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use routes::{ApiState, AppState};

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/pokemon/:id", get(routes::get_pokemon))
        .route("/api/search/:query", get(routes::search))
        .route("/api/collections/:name", get(routes::get_collection))
        .route("/api/compare", post(routes::compare_groups))
        .route("/api/history", get(routes::get_history))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Serve the API until ctrl-c.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API port {port}"))?;
    info!(port, "API server listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("API server error")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{SearchHistory, MAX_HISTORY_ITEMS};
    use crate::provider::static_table::StaticTable;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        Arc::new(ApiState::new(
            Arc::new(StaticTable::builtin()),
            StaticTable::builtin(),
            SearchHistory::in_memory(MAX_HISTORY_ITEMS),
            10,
        ))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pokemon_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/pokemon/25").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["name"], "pikachu");
        assert_eq!(json["stats"][0]["name"], "hp");
        assert_eq!(json["stats"][0]["value"], 35);
    }

    #[tokio::test]
    async fn test_pokemon_not_found() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/pokemon/9999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("9999"));
    }

    #[tokio::test]
    async fn test_search_then_history() {
        let state = test_state();
        let resp = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/search/charizard")
                    .header(routes::CLIENT_ID_HEADER, "red")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/history?client=red")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["pokemon"]["id"], 6);
        assert_eq!(entries[0]["client_id"], "red");
    }

    #[tokio::test]
    async fn test_compare_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/compare")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"group_a":[25],"group_b":[6]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["comparison"]["grand_total_a"], 320);
        assert_eq!(json["comparison"]["grand_total_b"], 534);
        assert_eq!(json["comparison"]["winner"], "group_b");
        assert_eq!(json["comparison"]["results"].as_array().unwrap().len(), 6);
        assert_eq!(json["group_a"]["members"][0]["name"], "pikachu");
    }

    #[tokio::test]
    async fn test_collection_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/collections/legendary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // The themed legendary collection includes ids the static table lacks.
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/collections/popular")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
