use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use pokeref_agents::SkillRouter;
use pokeref_clients::{PokeApiClient, SkillConfig, SlackWebhook};
use pokeref_core::{SkillError, SkillEvent};
use pokeref_observability::{AppMetrics, MetricsSnapshot};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const MAX_EVENT_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub router: SkillRouter<PokeApiClient, SlackWebhook>,
    pub metrics: Arc<AppMetrics>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    slack_forwarding: bool,
    application_gate: bool,
}

pub fn build_app() -> Result<Router> {
    let config = SkillConfig::from_env().context("failed to load skill configuration")?;
    build_app_with_config(&config)
}

pub fn build_app_with_config(config: &SkillConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let router = SkillRouter::from_config(config, metrics.clone())
        .context("failed to initialize outbound clients")?;

    Ok(build_router(ApiState { router, metrics }))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/skill", post(skill))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_EVENT_BYTES))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            slack_forwarding: state.router.forwarding_configured(),
            application_gate: state.router.gate().is_enforced(),
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn skill(State(state): State<ApiState>, Json(event): Json<SkillEvent>) -> Response {
    match state.router.route_event(&event).await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(None) => (StatusCode::OK, Json(serde_json::json!({}))).into_response(),
        Err(err) => {
            let status = match &err {
                SkillError::InvalidApplicationId { .. } => StatusCode::FORBIDDEN,
                SkillError::UnrecognizedIntent(_) | SkillError::UnsupportedRequest => {
                    StatusCode::BAD_REQUEST
                }
            };
            (
                status,
                Json(serde_json::json!({
                    "error": err.code(),
                    "message": err.to_string()
                })),
            )
                .into_response()
        }
    }
}
