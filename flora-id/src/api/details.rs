//! Record handoff and details endpoints
//!
//! A client parks the selected record with `POST /api/handoff` and opens the
//! details view with the returned id.

use crate::types::{PlantDetails, PlantRecord};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct HandoffResponse {
    pub id: Uuid,
}

/// POST /api/handoff
///
/// **Request:** a `PlantRecord`
/// **Response:** `{"id": "<uuid>"}`
pub async fn handoff(
    State(state): State<AppState>,
    record: Result<Json<PlantRecord>, JsonRejection>,
) -> ApiResult<Json<HandoffResponse>> {
    let Json(record) = record?;
    if record.common_name.trim().is_empty() && record.scientific_name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Record needs a common or scientific name".to_string(),
        ));
    }
    let id = state.handoff.put(record).await;
    Ok(Json(HandoffResponse { id }))
}

/// GET /api/details/:id
///
/// Single read: the handoff entry is consumed.
///
/// **Errors:**
/// - 400 Bad Request: id is not a UUID
/// - 404 Not Found: unknown or expired id
pub async fn details(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<PlantDetails>> {
    let Path(id) = id?;
    let record = state
        .handoff
        .take(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Handoff {} not found or expired", id)))?;

    Ok(Json(state.services.details.details_for(record).await))
}

/// Build handoff/details routes
pub fn details_routes() -> Router<AppState> {
    Router::new()
        .route("/api/handoff", post(handoff))
        .route("/api/details/:id", get(details))
}
