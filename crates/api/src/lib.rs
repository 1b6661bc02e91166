mod config;
mod error;

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tourgid_agents::GuideAgent;
use tourgid_core::{Catalog, Coordinates, RouteRequest, VoiceQueryInput};
use tourgid_gateway::{CompletionBackend, CompletionClient};
use tourgid_observability::{AppMetrics, MetricsSnapshot};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::ApiError;

pub const SERVICE_VERSION: &str = "1.0.0";

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<GuideAgent<CompletionBackend>>,
    pub metrics: Arc<AppMetrics>,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(catalog: Catalog, backend: CompletionBackend) -> Self {
        let metrics = AppMetrics::shared();
        let agent = GuideAgent::new(Arc::new(catalog), backend, metrics.clone());

        Self {
            agent: Arc::new(agent),
            metrics,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: String,
    version: &'static str,
    backend: &'static str,
    completion_client: &'static str,
    uptime_seconds: u64,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Deserialize)]
struct VoiceRequest {
    query: String,
    #[serde(default)]
    user_location: Option<Coordinates>,
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

pub async fn build_app() -> Result<Router> {
    build_app_with(&ApiConfig::from_env()).await
}

pub async fn build_app_with(config: &ApiConfig) -> Result<Router> {
    let catalog = config.load_catalog()?;
    let backend = config.completion_backend()?;
    tracing::info!(attractions = catalog.len(), "catalog loaded");

    Ok(build_router(ApiState::new(catalog, backend)))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/favicon.ico", get(favicon))
        .route("/attractions", get(attractions))
        .route("/attractions/:id", get(attraction_by_id))
        .route("/ai/process-voice", post(process_voice))
        .route("/ai/generate-route", post(generate_route))
        .fallback(endpoint_not_found)
        .layer(CatchPanicLayer::custom(internal_fault))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "TourGid AI Backend is running!",
        "version": SERVICE_VERSION,
        "endpoints": {
            "health": "/health",
            "ai_voice": "/ai/process-voice",
            "attractions": "/attractions",
            "routes": "/ai/generate-route"
        },
        "status": "active",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "OK",
        message: "TourGid Backend is healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: SERVICE_VERSION,
        backend: "axum",
        completion_client: state.agent.gateway().client().name(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn attractions(State(state): State<ApiState>) -> impl IntoResponse {
    let data = state.agent.attractions();
    Json(serde_json::json!({
        "success": true,
        "data": data,
        "count": data.len(),
    }))
}

async fn attraction_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .agent
        .catalog()
        .find_by_id(&id)
        .ok_or_else(|| ApiError::NotFound("Attraction not found".to_string()))?;
    Ok(Envelope::ok(record.clone()))
}

async fn process_voice(
    State(state): State<ApiState>,
    payload: Result<Json<VoiceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    tracing::info!(query = %request.query, "processing voice query");

    let reply = state
        .agent
        .process_voice_query(VoiceQueryInput {
            query: request.query,
            user_location: request.user_location,
        })
        .await?;
    Ok(Envelope::ok(reply))
}

async fn generate_route(
    State(state): State<ApiState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let reply = state.agent.generate_route(request)?;
    Ok(Envelope::ok(reply))
}

async fn endpoint_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": "Endpoint not found",
        })),
    )
}

fn internal_fault(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|value| value.to_string()))
        .unwrap_or_else(|| "unexpected internal fault".to_string());
    ApiError::Internal(anyhow::anyhow!(detail)).into_response()
}

fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
