//! Photo identification endpoint

use crate::services::PhotoOutcome;
use crate::{ApiResult, AppState};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    routing::post,
    Json, Router,
};

/// Largest accepted upload
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// POST /api/identify
///
/// **Request:** raw image bytes (any content type)
/// **Response:** `{"identification": {...}, "record": {...}}`, or
/// `{"identification": {...}, "error": "..."}` when the description failed
///
/// **Errors:**
/// - 400 Bad Request: empty body
/// - 404 Not Found: no identification for the photo
/// - 502 Bad Gateway: identification service failure
pub async fn identify(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<PhotoOutcome>> {
    let result = state.services.identification.identify_and_describe(&body).await;
    Ok(Json(state.track(result).await?))
}

/// Build identification routes
pub fn identify_routes() -> Router<AppState> {
    Router::new()
        .route("/api/identify", post(identify))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
}
