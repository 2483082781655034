//! Random facts endpoint

use crate::types::Fact;
use crate::{ApiResult, AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

const DEFAULT_FACT_COUNT: usize = 5;
const MAX_FACT_COUNT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct FactsQuery {
    pub count: Option<usize>,
}

/// GET /api/facts?count=N
///
/// Returns up to `count` facts (default 5, capped at 20). Source failures
/// shrink the list rather than failing the request. A `count` that is not a
/// non-negative integer is a 400.
pub async fn random_facts(
    State(state): State<AppState>,
    query: Result<Query<FactsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Fact>>> {
    let Query(query) = query?;
    let count = query.count.unwrap_or(DEFAULT_FACT_COUNT).min(MAX_FACT_COUNT);
    Ok(Json(state.services.facts.random_facts(count).await))
}

/// Build facts routes
pub fn facts_routes() -> Router<AppState> {
    Router::new().route("/api/facts", get(random_facts))
}
