//! HTTP surface: the recommendations endpoint and the health check.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use pipeline::RecommendationResponse;
use serde::Serialize;

use crate::auth::Caller;
use crate::error::RecommendationError;
use crate::orchestrator::RecommendationOrchestrator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RecommendationOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: RecommendationOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Raw query pairs of the recommendations endpoint.
///
/// Kept as pairs so that repeated or malformed parameters reach the limit
/// policy instead of rejecting the request.
type QueryPairs = Vec<(String, String)>;

/// First `limit` value in the query string, if any
fn limit_param(query: &Option<Query<QueryPairs>>) -> Option<&str> {
    query
        .as_ref()?
        .iter()
        .find(|(key, _)| key == "limit")
        .map(|(_, value)| value.as_str())
}

/// GET /api/recommendations?limit=N
pub async fn get_recommendations(
    State(state): State<AppState>,
    caller: Caller,
    query: Option<Query<QueryPairs>>,
) -> Result<Json<RecommendationResponse>, RecommendationError> {
    let response = state
        .orchestrator
        .handle(&caller, limit_param(&query))
        .await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
}

/// GET /health, no identity required
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "course-recs".to_string(),
    })
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/recommendations", get(get_recommendations))
        .route("/health", get(health_check))
        .with_state(state)
}
