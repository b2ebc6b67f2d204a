//! HTTP surface: form page, prediction endpoint, health and vocabulary.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use salescast_core::{
    CategoricalFeature, CategoryEncoder, PredictError, PredictionPipeline, RawRecord,
    SalesModel,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::page;

pub struct AppState {
    pub pipeline: PredictionPipeline,
    pub model_hash: Option<String>,
    pub start_time: Instant,
    pub req_count: AtomicUsize,
}

impl AppState {
    pub fn new(model: Arc<dyn SalesModel>) -> Self {
        Self {
            model_hash: model.fingerprint(),
            pipeline: PredictionPipeline::new(model),
            start_time: Instant::now(),
            req_count: AtomicUsize::new(0),
        }
    }

    fn record_request(&self) {
        self.req_count.fetch_add(1, Ordering::Relaxed);
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
struct PredictResponse {
    success: bool,
    prediction: f64,
    formatted_prediction: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorDetails {
    List(Vec<String>),
    Message(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    details: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    model_hash: Option<String>,
    uptime_secs: u64,
    requests_total: u64,
}

#[derive(Debug, Serialize)]
struct VocabularyEntry {
    values: &'static [&'static str],
    codes: BTreeMap<&'static str, u32>,
}

#[derive(Debug)]
enum ApiError {
    Validation(Vec<String>),
    Unexpected(String),
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Validation(details) => ApiError::Validation(details),
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "Validation Error",
                ErrorDetails::List(details),
            ),
            ApiError::Unexpected(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
                ErrorDetails::Message(message),
            ),
        };
        let payload = Json(ErrorResponse {
            success: false,
            error,
            details,
        });
        (status, payload).into_response()
    }
}

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let app = build_router(Arc::new(state));
    let listener = bind_listener(addr).await?;
    info!("SalesCast listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind HTTP listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind HTTP listener on {addr}"))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .route("/api/vocabulary", get(handle_vocabulary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_index() -> Html<String> {
    Html(page::render_form())
}

async fn handle_predict(
    State(state): State<SharedState>,
    form: std::result::Result<Form<RawRecord>, FormRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    state.record_request();

    let raw = match form {
        Ok(Form(raw)) => raw,
        Err(rejection) => {
            debug!("Unreadable form body, treating as empty: {}", rejection);
            RawRecord::new()
        }
    };

    match state.pipeline.predict(&raw) {
        Ok(result) => Ok(Json(PredictResponse {
            success: true,
            prediction: result.prediction,
            formatted_prediction: result.formatted_prediction,
        })),
        Err(PredictError::Validation(details)) => {
            debug!(errors = details.len(), "Rejected prediction request");
            Err(ApiError::Validation(details))
        }
        Err(err) => {
            error!("Error during prediction: {}", err);
            Err(err.into())
        }
    }
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "salescast-web",
        version: env!("CARGO_PKG_VERSION"),
        model_hash: state.model_hash.clone(),
        uptime_secs: state.uptime_seconds(),
        requests_total: state.req_count.load(Ordering::Relaxed) as u64,
    })
}

async fn handle_vocabulary() -> Json<BTreeMap<&'static str, VocabularyEntry>> {
    let encoder = CategoryEncoder::global();
    let vocabulary = CategoricalFeature::ALL
        .into_iter()
        .map(|feature| {
            let codes = feature
                .values()
                .iter()
                .filter_map(|value| encoder.encode(feature, value).ok().map(|code| (*value, code)))
                .collect();
            (
                feature.name(),
                VocabularyEntry {
                    values: feature.values(),
                    codes,
                },
            )
        })
        .collect();
    Json(vocabulary)
}
