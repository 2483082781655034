//! flora-id library interface
//!
//! Plant identification and record resolution. Exposes the pipeline
//! services, the HTTP router and the types integration tests need.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod text;
pub mod types;
pub mod utils;

pub use crate::error::{ApiError, ApiResult, ResolveError};

use axum::Router;
use chrono::{DateTime, Utc};
use services::FloraServices;
use session::HandoffStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolution pipeline
    pub services: FloraServices,
    /// Record handoff to the details view
    pub handoff: HandoffStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Most recent upstream error, cleared by the next successful call
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(services: FloraServices) -> Self {
        Self::with_handoff(services, HandoffStore::default())
    }

    pub fn with_handoff(services: FloraServices, handoff: HandoffStore) -> Self {
        Self {
            services,
            handoff,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Convert a pipeline result for a handler, remembering upstream failures
    ///
    /// A success clears the remembered failure.
    pub async fn track<T>(&self, result: Result<T, ResolveError>) -> ApiResult<T> {
        match result {
            Ok(value) => {
                if self.last_error.read().await.is_some() {
                    tracing::info!("Upstream recovered");
                    *self.last_error.write().await = None;
                }
                Ok(value)
            }
            Err(err) => {
                if matches!(
                    err,
                    ResolveError::Service(_) | ResolveError::DetailsUnavailable { .. }
                ) {
                    tracing::warn!(error = %err, "Upstream failure");
                    *self.last_error.write().await = Some(err.to_string());
                }
                Err(err.into())
            }
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::identify_routes())
        .merge(api::facts_routes())
        .merge(api::details_routes())
        .merge(api::health_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
