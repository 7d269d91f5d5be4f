//! Integration tests for the HTTP API
//!
//! Tests cover:
//! - Successful, enriched recommendations
//! - Identity headers (401) and role check (403)
//! - Scorer failures surfacing as 500/504 with their detail
//! - Limit fallback for unusable values
//! - Pass-through of scorer notices
//! - Health endpoint

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog::{CatalogIndex, Course, Instructor};
use scorer::{Scorer, ScorerError};
use serde_json::{json, Value};
use server::{build_router, AppState, LimitPolicy, RecommendationOrchestrator};
use tower::util::ServiceExt; // for `oneshot` method

/// Scorer double that replays canned output and records its calls
struct ScriptedScorer {
    result: fn() -> Result<String, ScorerError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(u32, usize)>>,
}

impl ScriptedScorer {
    fn new(result: fn() -> Result<String, ScorerError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Scorer for ScriptedScorer {
    async fn invoke(&self, student_id: u32, limit: usize) -> Result<String, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((student_id, limit));
        (self.result)()
    }
}

fn two_recommendations() -> Result<String, ScorerError> {
    Ok("1. Intro to Go (ID: 42, Score: 0.91\n   Reason: matches your interests\n   Description: A gentle start\n2. Advanced Go (ID: 43, Score: 0.80\n".to_string())
}

fn test_catalog() -> Arc<CatalogIndex> {
    let mut index = CatalogIndex::new();
    index.insert_instructor(Instructor {
        id: 10,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    });
    index.insert_course(Course {
        id: 43,
        title: "Advanced Go".to_string(),
        description: Some("Concurrency and generics".to_string()),
        instructor_id: Some(10),
        department_id: None,
        thumbnail_url: None,
    });
    Arc::new(index)
}

/// Test helper: Create app around the given scorer
fn setup_app(scorer: Arc<ScriptedScorer>) -> axum::Router {
    let orchestrator =
        RecommendationOrchestrator::new(scorer, test_catalog(), LimitPolicy::default());
    build_router(AppState::new(orchestrator))
}

fn request(uri: &str, identity: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some((id, role)) = identity {
        builder = builder.header("X-User-Id", id).header("X-User-Role", role);
    }
    builder.body(Body::empty()).unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Recommendations
// =============================================================================

#[tokio::test]
async fn test_student_receives_enriched_recommendations() {
    let scorer = ScriptedScorer::new(two_recommendations);
    let app = setup_app(scorer.clone());

    let response = app
        .oneshot(request("/api/recommendations?limit=2", Some(("9", "student"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*scorer.last_request.lock().unwrap(), Some((9, 2)));

    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!([
            {
                "course_id": 42,
                "title": "Intro to Go",
                "score": 0.91,
                "reason": "matches your interests",
                "description": "A gentle start",
                "courseDetails": {
                    "title": "Intro to Go",
                    "description": "A gentle start",
                    "instructor": "Unknown"
                }
            },
            {
                "course_id": 43,
                "title": "Advanced Go",
                "score": 0.80,
                "courseDetails": {
                    "id": 43,
                    "title": "Advanced Go",
                    "description": "Concurrency and generics",
                    "instructor": "Ada Lovelace"
                }
            }
        ])
    );
}

#[tokio::test]
async fn test_unusable_limit_falls_back_to_default() {
    let scorer = ScriptedScorer::new(two_recommendations);

    for uri in [
        "/api/recommendations",
        "/api/recommendations?limit=abc",
        "/api/recommendations?limit=0",
    ] {
        let response = setup_app(scorer.clone())
            .oneshot(request(uri, Some(("9", "student"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*scorer.last_request.lock().unwrap(), Some((9, 3)), "{}", uri);
    }
}

#[tokio::test]
async fn test_repeated_limit_uses_first_value() {
    let scorer = ScriptedScorer::new(two_recommendations);
    let response = setup_app(scorer.clone())
        .oneshot(request(
            "/api/recommendations?limit=2&limit=5",
            Some(("9", "student")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*scorer.last_request.lock().unwrap(), Some((9, 2)));
}

#[tokio::test]
async fn test_empty_scorer_output_is_empty_array() {
    let scorer = ScriptedScorer::new(|| Ok(String::new()));
    let response = setup_app(scorer)
        .oneshot(request("/api/recommendations", Some(("9", "student"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await, json!([]));
}

#[tokio::test]
async fn test_scorer_notice_passes_through() {
    let scorer = ScriptedScorer::new(|| {
        Ok("RECOMMENDATION_START_JSON\n[{\"error\": \"Student 9 is not in the training data\"}]\nRECOMMENDATION_END_JSON\n".to_string())
    });
    let response = setup_app(scorer)
        .oneshot(request("/api/recommendations", Some(("9", "student"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        extract_json(response.into_body()).await,
        json!([{"error": "Student 9 is not in the training data"}])
    );
}

// =============================================================================
// Identity and role
// =============================================================================

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let scorer = ScriptedScorer::new(two_recommendations);
    let response = setup_app(scorer.clone())
        .oneshot(request("/api/recommendations", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = extract_json(response.into_body()).await;
    assert!(body["message"].is_string());
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_student_is_forbidden() {
    let scorer = ScriptedScorer::new(two_recommendations);
    let response = setup_app(scorer.clone())
        .oneshot(request("/api/recommendations", Some(("4", "instructor"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        extract_json(response.into_body()).await,
        json!({"message": "Access denied. Students only."})
    );
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Scorer failures
// =============================================================================

#[tokio::test]
async fn test_scorer_exit_is_server_error_with_stderr() {
    let scorer = ScriptedScorer::new(|| {
        Err(ScorerError::NonZeroExit {
            code: Some(1),
            stderr: "FileNotFoundError: recommendation_model.pkl\n".to_string(),
        })
    });
    let response = setup_app(scorer)
        .oneshot(request("/api/recommendations", Some(("9", "student"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Server error");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("FileNotFoundError: recommendation_model.pkl"));
}

#[tokio::test]
async fn test_scorer_timeout_is_gateway_timeout() {
    let scorer = ScriptedScorer::new(|| {
        Err(ScorerError::Timeout {
            after: Duration::from_secs(30),
        })
    });
    let response = setup_app(scorer)
        .oneshot(request("/api/recommendations", Some(("9", "student"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["message"], "Server error");
    assert!(body["error"].is_string());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_scorer_end_to_end() {
    use scorer::{ProcessScorer, ScorerConfig};

    let config = ScorerConfig {
        program: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            "echo \"1. Advanced Go (ID: 43, Score: 0.5\"; echo \"   Reason: student $1 asked for $2\""
                .to_string(),
            "scorer".to_string(),
        ],
        trailing_args: vec![],
        ..ScorerConfig::default()
    };
    let orchestrator = RecommendationOrchestrator::new(
        Arc::new(ProcessScorer::new(config)),
        test_catalog(),
        LimitPolicy::default(),
    );
    let app = build_router(AppState::new(orchestrator));

    let response = app
        .oneshot(request("/api/recommendations?limit=5", Some(("9", "student"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["reason"], "student 9 asked for 5");
    assert_eq!(body[0]["courseDetails"]["instructor"], "Ada Lovelace");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_identity_required() {
    let scorer = ScriptedScorer::new(two_recommendations);
    let response = setup_app(scorer)
        .oneshot(request("/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        extract_json(response.into_body()).await,
        json!({"status": "ok", "module": "course-recs"})
    );
}
