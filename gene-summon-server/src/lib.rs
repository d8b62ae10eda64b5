//! Gene Summon HTTP API
//!
//! Thin transport over `gene-summon-core`: every request builds its own RNG
//! and reads the shared, immutable catalog.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use gene_summon_core::{
    CatalogListing, DrawnCard, RaceResult, RarityTier, SummonEngine, SummonError,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

// =============================================================================
// App State
// =============================================================================

pub struct AppState {
    pub engine: SummonEngine,
}

impl AppState {
    #[must_use]
    pub fn new(engine: SummonEngine) -> Arc<Self> {
        Arc::new(Self { engine })
    }
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// How a capsule tier turns into a card rarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummonMode {
    /// Draw from the capsule tier's own pool.
    #[default]
    Exact,
    /// Let the catalog's capsule odds pick the rarity first.
    CapsuleOdds,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonRequest {
    pub capsule_tier: Option<String>,
    #[serde(default)]
    pub mode: SummonMode,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("capsuleTier is required")]
    MissingTier,
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error(transparent)]
    Summon(#[from] SummonError),
}

impl ApiError {
    const fn kind(&self) -> &'static str {
        match self {
            Self::MissingTier => "missing_tier",
            Self::MalformedBody(_) => "malformed_body",
            Self::Summon(SummonError::UnknownTier(_)) => "unknown_tier",
            Self::Summon(SummonError::InvalidSample { .. }) => "invalid_sample",
            Self::Summon(_) => "pool_configuration",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::MissingTier | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Summon(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Summon(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("summon failed: {self}");
        } else {
            tracing::warn!("rejected request: {self}");
        }
        let body = ErrorResponse {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn root() -> &'static str {
    "🧬 Gene Summon API is running! Try /api/race, /summon or /cards"
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn race(State(state): State<Arc<AppState>>) -> Result<Json<RaceResult>, ApiError> {
    let result = state.engine.run_race(&mut rand::thread_rng())?;
    tracing::debug!(tier = %result.capsule_tier, "race finished");
    Ok(Json(result))
}

async fn summon(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DrawnCard>, ApiError> {
    let request = parse_summon_request(&body)?;
    let label = request
        .capsule_tier
        .as_deref()
        .filter(|label| !label.trim().is_empty())
        .ok_or(ApiError::MissingTier)?;
    let capsule = RarityTier::parse(label)?;
    let card = summon_card(&state.engine, capsule, request.mode)?;
    tracing::debug!(capsule = %capsule, rarity = %card.rarity, name = %card.name, "summoned");
    Ok(Json(card))
}

async fn summon_legacy(State(state): State<Arc<AppState>>) -> Result<Json<DrawnCard>, ApiError> {
    let card = state.engine.summon_any(&mut rand::thread_rng())?;
    Ok(Json(card))
}

async fn cards(State(state): State<Arc<AppState>>) -> Json<CatalogListing> {
    Json(state.engine.catalog().listing())
}

fn parse_summon_request(body: &[u8]) -> Result<SummonRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SummonRequest::default());
    }
    Ok(serde_json::from_slice(body)?)
}

fn summon_card(
    engine: &SummonEngine,
    capsule: RarityTier,
    mode: SummonMode,
) -> Result<DrawnCard, SummonError> {
    let mut rng = rand::thread_rng();
    match mode {
        SummonMode::Exact => engine.summon(capsule, &mut rng),
        SummonMode::CapsuleOdds => engine.summon_with_odds(capsule, &mut rng),
    }
}

// =============================================================================
// Router
// =============================================================================

/// Build the API router with permissive CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/race", get(race).post(race))
        .route("/api/summon", axum::routing::post(summon))
        .route("/summon", get(summon_legacy))
        .route("/cards", get(cards))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
