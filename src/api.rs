//! HTTP API for the ROI Engine.
//!
//! This module exposes a minimal REST API around the engine using the
//! [`axum`](https://crates.io/crates/axum) framework.  Clients submit
//! input records and receive results, display figures, sector
//! defaults or a report model as JSON.  The configuration table is
//! loaded once at startup and shared read-only across requests.

use crate::config::{load_config_from_file, CalculatorConfig};
use crate::engine::{apply_roi_cap, calculate, calculate_batch, compare_sectors};
use crate::models::{CalculationResult, FieldKey, Mode, RoiInput, Sector};
use crate::report::RoiReport;
use crate::validation::field_errors;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Application state shared across requests.
pub struct AppState {
    pub config: CalculatorConfig,
}

/// Load the configuration table from `config_path`, or use the
/// built-in table when no path is given.
pub fn load_state(config_path: Option<PathBuf>) -> Result<Arc<AppState>> {
    let config = match config_path {
        Some(path) => {
            let config = load_config_from_file(&path)?;
            info!(path = %path.display(), "using configuration table from file");
            config
        }
        None => CalculatorConfig::builtin(),
    };
    Ok(Arc::new(AppState { config }))
}

/// Build the API router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/calculate", post(calculate_handler))
        .route("/api/calculate/batch", post(batch_handler))
        .route("/api/config", get(config_handler))
        .route("/api/sectors/:sector/defaults", get(sector_defaults_handler))
        .route("/api/compare", get(compare_handler))
        .route("/api/report", post(report_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub input: RoiInput,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub result: CalculationResult,
    /// ROI after the display cap for the requested mode.
    pub display_roi_pct: f64,
    pub field_errors: BTreeMap<FieldKey, String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub users: f64,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub client_name: String,
    #[serde(default)]
    pub mode: Mode,
    pub input: RoiInput,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(serde_json::json!({"error": message.into()}));
    (status, body).into_response()
}

/// Handler for POST /api/calculate
async fn calculate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> impl IntoResponse {
    let config = &app_state.config;
    let result = calculate(&request.input, config);
    let response = CalculateResponse {
        display_roi_pct: apply_roi_cap(result.roi_pct, request.mode, config),
        field_errors: field_errors(&result.violations),
        result,
    };
    Json(response)
}

/// Handler for POST /api/calculate/batch
async fn batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<RoiInput>>,
) -> Response {
    debug!(count = inputs.len(), "batch calculation");
    let joined =
        tokio::task::spawn_blocking(move || calculate_batch(&inputs, &app_state.config)).await;
    match joined {
        Ok(results) => Json(results).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

/// Handler for GET /api/config
async fn config_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(app_state.config.clone())
}

/// Handler for GET /api/sectors/:sector/defaults
async fn sector_defaults_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match Sector::from_name(&name).and_then(|s| app_state.config.sector_defaults(s)) {
        Some(defaults) => Json(defaults.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("unknown sector: {name}")),
    }
}

/// Handler for GET /api/compare?users=N
async fn compare_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> Response {
    let joined =
        tokio::task::spawn_blocking(move || compare_sectors(query.users, &app_state.config)).await;
    match joined {
        Ok(comparisons) => Json(comparisons).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

/// Handler for POST /api/report
async fn report_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ReportRequest>,
) -> Response {
    let config = &app_state.config;
    let result = calculate(&request.input, config);
    match RoiReport::build(&request.client_name, &request.input, &result, request.mode, config) {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            warn!(error = %err, "report rejected");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
    }
}

/// Launch the API server.  Builds the router from the given
/// configuration and binds to the supplied address.  Runs until the
/// server terminates.
pub async fn serve(addr: &str, config_path: Option<PathBuf>) -> Result<()> {
    let router = build_router(load_state(config_path)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
