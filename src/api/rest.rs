// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Public, unauthenticated endpoints:
//   GET  /api/v1/health
//   POST /api/v1/analyze   (also mounted at /analyze for older clients)
//
// CORS is permissive: the browser front-end is served from another origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analysis_report::AnalysisReport;
use crate::api::error::{ApiError, ApiResult};
use crate::app_state::AppState;
use crate::engine::evaluate;
use crate::types::Action;

/// Longest ticker accepted, e.g. `BRK-B`, `005930.KS`, `^GSPC`.
const MAX_SYMBOL_LEN: usize = 20;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .route("/analyze", post(analyze))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    providers: Vec<String>,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        providers: state
            .provider
            .provider_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Analyze
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    symbol: String,
    /// `BUY`/`SELL` (any case) or `매수`/`매도`; defaults to BUY.
    #[serde(default)]
    decision: Option<String>,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalysisReport>> {
    let symbol = normalize_symbol(&req.symbol)?;
    let decision = req
        .decision
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("BUY")
        .to_string();
    let action: Action = decision.parse()?;

    let lookback = state.config.server.lookback_days;
    let fetched = state.provider.fetch(&symbol, lookback).await?;

    let evaluation = evaluate(
        &fetched.series,
        action,
        &state.config.indicators,
        &state.config.scoring,
    )?;

    let report = AnalysisReport::new(&symbol, decision, &fetched, evaluation);

    info!(
        symbol = %report.symbol,
        action = %report.action,
        confidence = report.confidence,
        endorsed = report.endorsed,
        source = %report.source,
        ticker = %report.ticker,
        "analysis complete"
    );

    Ok(Json(report))
}

/// Trim, upper-case and check a ticker symbol.
fn normalize_symbol(raw: &str) -> ApiResult<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("symbol required".to_string()));
    }
    if symbol.len() > MAX_SYMBOL_LEN
        || !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_'))
    {
        return Err(ApiError::BadRequest(format!("invalid symbol '{symbol}'")));
    }
    Ok(symbol)
}
