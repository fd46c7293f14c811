use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::Server;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::app::recommend_use_case::RecommendUseCase;
use crate::config::SearchConfig;
use crate::search::OpenSearchClient;

#[derive(Clone)]
pub struct AppState {
    pub recommend: Arc<RecommendUseCase>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "catalog-graph-search",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": message }))).into_response()
}

fn count_param(params: &HashMap<String, String>, name: &str) -> Result<usize, Response> {
    let raw = params
        .get(name)
        .ok_or_else(|| bad_request(format!("missing query parameter '{}'", name)))?;
    raw.trim()
        .parse::<usize>()
        .map_err(|_| bad_request(format!("query parameter '{}' must be a non-negative integer, got '{}'", name, raw)))
}

/// `GET /opensearch-lambda?q=&numMovies=&numRecs=`
async fn recommendations(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(query) = params.get("q") else {
        return bad_request("missing query parameter 'q'".to_string());
    };
    let num_movies = match count_param(&params, "numMovies") {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    let num_recs = match count_param(&params, "numRecs") {
        Ok(n) => n,
        Err(resp) => return resp,
    };

    match state.recommend.get_movies(query, num_movies, num_recs).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!("Recommendation query failed: {}", e);
            (StatusCode::BAD_GATEWAY, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// Create the HTTP server with all routes
pub fn create_server(recommend: Arc<RecommendUseCase>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/opensearch-lambda", get(recommendations))
        .with_state(AppState { recommend })
        .layer(ServiceBuilder::new().layer(cors))
}

/// Serve the similarity-search API until the process is stopped
pub async fn start_server(recommend: Arc<RecommendUseCase>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_server(recommend);

    info!("Search API listening on http://{}", addr);
    println!("🚀 Search API running on http://{addr}");
    println!("💚 Health check: http://{addr}/health");
    println!("🔎 Similarity:   http://{addr}/opensearch-lambda?q=matrix&numMovies=3&numRecs=5");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}

/// Recommendation service backed by the configured search engine
pub async fn build_recommender(config: &SearchConfig) -> crate::error::Result<Arc<RecommendUseCase>> {
    let client = OpenSearchClient::new(config).await?;
    Ok(Arc::new(RecommendUseCase::new(
        Arc::new(client),
        config.knn_index.clone(),
        config.text_index.clone(),
    )))
}
