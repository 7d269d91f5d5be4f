//! Request-level errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::CatalogError;
use scorer::ScorerError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Students only.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Why a recommendation request failed
#[derive(Error, Debug)]
pub enum RecommendationError {
    /// The caller is not a student
    #[error("Access denied. Students only.")]
    Forbidden { role: String },

    #[error(transparent)]
    Scorer(#[from] ScorerError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl RecommendationError {
    pub fn status(&self) -> StatusCode {
        match self {
            RecommendationError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RecommendationError::Scorer(ScorerError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            RecommendationError::Scorer(_) | RecommendationError::Catalog(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RecommendationError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RecommendationError::Forbidden { role } => {
                warn!("Denied recommendations to role '{}'", role);
                json!({ "message": ACCESS_DENIED_MESSAGE })
            }
            other => {
                error!("Recommendation request failed: {}", other);
                json!({ "message": SERVER_ERROR_MESSAGE, "error": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
