//! HTTP front end: a thin caller of [`RecipeService`].

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppConfig, ServerConfig};
use crate::model::{GenerationRequest, Inspiration};
use crate::{GenerateError, RecipeService};

const APP_NAME: &str = "Matcha Recipe Generator";

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    service: Option<Arc<RecipeService>>,
    permits: Arc<Semaphore>,
    request_timeout: Duration,
}

impl AppState {
    /// `service` is `None` when no model could be loaded; generation
    /// requests then answer 503.
    pub fn new(service: Option<RecipeService>, config: &ServerConfig) -> Self {
        Self {
            service: service.map(Arc::new),
            permits: Arc::new(Semaphore::new(config.max_concurrent_generations.max(1))),
            request_timeout: Duration::from_secs(config.request_timeout),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default = "default_request_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub inspiration: Inspiration,
    #[serde(default = "default_request_max_length")]
    pub max_length: u32,
}

fn default_request_temperature() -> f32 {
    0.8
}

fn default_request_max_length() -> u32 {
    512
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub recipe: String,
    pub temperature: f32,
    pub inspiration: Inspiration,
}

/// Error body shape: `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "app": APP_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "generate": "POST /generate",
            "health": "GET /health"
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "model_loaded": state.service.is_some()
    }))
}

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    let request = GenerationRequest::new(body.inspiration.clone(), body.temperature, body.max_length)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let service = state
        .service
        .clone()
        .ok_or_else(|| ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Model not loaded"))?;

    let work = async {
        let _permit = state.permits.acquire().await.map_err(|_| {
            ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down")
        })?;

        service.try_generate(&request).await.map_err(|e| {
            error!("Generation error: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
    };

    let recipe = tokio::time::timeout(state.request_timeout, work)
        .await
        .map_err(|_| {
            warn!("Generation timed out after {:?}", state.request_timeout);
            ApiError::new(StatusCode::GATEWAY_TIMEOUT, "Generation timed out")
        })??;

    Ok(Json(GenerateResponse {
        recipe,
        temperature: body.temperature,
        inspiration: body.inspiration,
    }))
}

/// Configure CORS from a comma-separated origin list, "*" meaning any.
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/generate", post(generate))
        .route("/health", get(health))
        .layer(setup_cors(config))
        .with_state(state)
}

/// Load the model (if configured) and serve until the process is stopped.
///
/// A model that fails to load is not fatal: the server starts and reports
/// `model_loaded: false`.
pub async fn serve(config: AppConfig) -> Result<(), GenerateError> {
    let service = if config.model.endpoint.is_some() {
        match RecipeService::builder().config(config.clone()).build() {
            Ok(service) => {
                info!("Model loaded successfully");
                Some(service)
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                None
            }
        }
    } else {
        warn!("No model endpoint configured; generation is disabled");
        None
    };

    let state = AppState::new(service, &config.server);
    let app = router(state, &config.server);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
