//! Caller identity.
//!
//! Authentication happens upstream. The gateway forwards the verified
//! identity as `X-User-Id` and `X-User-Role` headers, which are trusted
//! as-is here.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::StudentId;
use serde_json::json;
use tracing::debug;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

const STUDENT_ROLE: &str = "student";

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: StudentId,
    pub role: String,
}

impl Caller {
    pub fn new(id: StudentId, role: impl Into<String>) -> Self {
        Self {
            id,
            role: role.into(),
        }
    }

    pub fn is_student(&self) -> bool {
        self.role == STUDENT_ROLE
    }
}

/// Why a request carried no usable identity
#[derive(Debug)]
pub enum AuthRejection {
    MissingHeader(&'static str),
    InvalidUserId(String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AuthRejection::MissingHeader(name) => format!("Missing {} header", name),
            AuthRejection::InvalidUserId(raw) => format!("Invalid user id: {}", raw),
        };
        debug!("Rejecting unauthenticated request: {}", message);

        (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &'static str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or(AuthRejection::MissingHeader(name))
        };

        let raw_id = header(USER_ID_HEADER)?;
        let role = header(USER_ROLE_HEADER)?;

        let id = raw_id
            .parse::<StudentId>()
            .ok()
            .filter(|&id| id > 0)
            .ok_or_else(|| AuthRejection::InvalidUserId(raw_id.to_string()))?;

        Ok(Caller::new(id, role))
    }
}
