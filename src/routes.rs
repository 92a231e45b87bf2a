//! API route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::report;
use crate::storage::RaceRepository;
use crate::types::{DriverResponse, ErrorResponse, HealthResponse, ReportResponse};

/// Application state shared across handlers.
///
/// The mutex is what makes the repository's create-or-fetch atomic when the
/// server runs handlers on multiple threads; everything below it is
/// single-threaded by design.
pub struct AppState {
    pub repo: Mutex<RaceRepository>,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => Self::not_found(msg),
            other => Self::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Build the API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/report", get(full_report))
        .route("/api/v1/report/drivers", get(drivers_report))
        .route("/api/v1/report/drivers/:code", get(driver_detail))
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full report: every racer, fastest lap first.
pub async fn full_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReportResponse>, ApiError> {
    let repo = lock_repo(&state)?;
    Ok(Json(report::all_racers_report(&repo)?))
}

/// Driver listing, same shape as the full report.
pub async fn drivers_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReportResponse>, ApiError> {
    let repo = lock_repo(&state)?;
    Ok(Json(report::all_racers_report(&repo)?))
}

/// Single driver lookup by abbreviation code.
pub async fn driver_detail(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<DriverResponse>, ApiError> {
    let repo = lock_repo(&state)?;
    Ok(Json(report::driver_detail(&repo, &code)?))
}

fn lock_repo(state: &AppState) -> Result<std::sync::MutexGuard<'_, RaceRepository>, ApiError> {
    state
        .repo
        .lock()
        .map_err(|_| ApiError::internal("storage lock poisoned"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::util::ServiceExt; // for `oneshot`

    fn testdata(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join(name)
    }

    /// Ingest the fixture race into a fresh in-memory repository
    fn ingested_app() -> Router {
        let repo = RaceRepository::in_memory().unwrap();
        ingest::ingest_racers(&repo, &testdata("abbreviations.txt")).unwrap();
        let race = ingest::ingest_race(&repo, &testdata("race_data.txt")).unwrap();
        ingest::ingest_lap_times(
            &repo,
            &testdata("start.log"),
            &testdata("end.log"),
            &testdata("abbreviations.txt"),
            &race,
        )
        .unwrap();

        build_router(Arc::new(AppState {
            repo: Mutex::new(repo),
        }))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_report_endpoint() {
        let app = ingested_app();

        let response = app.oneshot(get_request("/api/v1/report")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );

        let body = json_body(response).await;
        let racers = body["racers"].as_array().unwrap();
        // Round-trip: one report entry per distinct abbreviation ingested
        assert_eq!(racers.len(), 20);
        // Fastest lap leads the ranking
        assert_eq!(racers[0]["code"], "SVF");
        assert_eq!(racers[0]["best_lap"], "1:04.415");
    }

    #[tokio::test]
    async fn test_drivers_endpoint() {
        let app = ingested_app();

        let response = app
            .oneshot(get_request("/api/v1/report/drivers"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body.get("racers").is_some());
        assert_eq!(body["racers"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_driver_detail_found() {
        let app = ingested_app();

        let response = app
            .oneshot(get_request("/api/v1/report/drivers/RAI"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["racer"]["code"], "RAI");
        assert_eq!(body["racer"]["name"], "Kimi Raikkonen");
        assert_eq!(body["racer"]["laps"], 1);
    }

    #[tokio::test]
    async fn test_driver_detail_not_found() {
        let app = ingested_app();

        let response = app
            .oneshot(get_request("/api/v1/report/drivers/R"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );

        let body = json_body(response).await;
        assert!(body.get("error").is_some());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = ingested_app();

        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
    }
}
