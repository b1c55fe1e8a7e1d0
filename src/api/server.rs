//! HTTP surface
//!
//! Thin routing layer over the intake; no audit logic lives here. One
//! endpoint accepts audit requests and acknowledges immediately, one
//! reports configuration presence for operational visibility, one is a
//! plain health check.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::config::Config;
use crate::error::AuditError;
use crate::orchestrator::Intake;

#[derive(Clone)]
pub struct AppState {
    intake: Arc<Intake>,
}

/// Build the service router
pub fn router(intake: Arc<Intake>) -> Router {
    Router::new()
        .route("/audit", post(audit))
        .route("/config/status", get(config_status))
        .route("/health", get(health))
        .with_state(AppState { intake })
}

/// Bind and serve until shutdown
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    let intake = Arc::new(Intake::new(config)?);
    let app = router(intake);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("🌐 listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// POST /audit — validate, spawn the audit task, acknowledge
async fn audit(State(state): State<AppState>, Json(raw): Json<Value>) -> Response {
    match state.intake.accept(&raw) {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /config/status — boolean presence of each required credential
async fn config_status(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(state.intake.config().status())).into_response()
}

/// GET /health
async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "healthy" }))).into_response()
}

fn error_response(error: &AuditError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "success": false, "error": error.to_string() })),
    )
        .into_response()
}
