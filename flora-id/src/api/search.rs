//! Text search endpoints
//!
//! - `POST /api/search` - query → one record or a candidate list
//! - `POST /api/candidates/resolve` - selected candidate → full record

use crate::services::Resolution;
use crate::types::{PlantRecord, SpeciesCandidate};
use crate::{ApiResult, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request payload for a text search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Search result, tagged by `kind`
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResponse {
    Record { record: PlantRecord },
    Candidates { candidates: Vec<SpeciesCandidate> },
}

impl From<Resolution> for SearchResponse {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Record(record) => SearchResponse::Record { record },
            Resolution::Candidates(candidates) => SearchResponse::Candidates { candidates },
        }
    }
}

/// POST /api/search
///
/// **Request:** `{"query": "sunflower"}`
/// **Response:** `{"kind": "record", "record": {...}}` or
/// `{"kind": "candidates", "candidates": [...]}`
///
/// **Errors:**
/// - 400 Bad Request: empty query or malformed body
/// - 502 Bad Gateway: generation service failure
/// - 503 Service Unavailable: no complete record after all retries
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(payload) = payload?;
    let result = state.services.resolver.resolve_from_query(&payload.query).await;
    let resolution = state.track(result).await?;

    if let Resolution::Candidates(candidates) = &resolution {
        info!(query = %payload.query, candidates = candidates.len(), "Search returned candidates");
    }
    Ok(Json(resolution.into()))
}

/// POST /api/candidates/resolve
///
/// **Request:** a `SpeciesCandidate` as returned by `/api/search`
/// **Response:** the enriched `PlantRecord`
pub async fn resolve_candidate(
    State(state): State<AppState>,
    candidate: Result<Json<SpeciesCandidate>, JsonRejection>,
) -> ApiResult<Json<PlantRecord>> {
    let Json(candidate) = candidate?;
    let result = state.services.resolver.resolve_from_candidate(&candidate).await;
    Ok(Json(state.track(result).await?))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", post(search))
        .route("/api/candidates/resolve", post(resolve_candidate))
}
