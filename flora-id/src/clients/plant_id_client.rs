//! Plant.id photo identification client
//!
//! # API Reference
//! - Endpoint: `POST {base}/identify`, header `Api-Key`
//! - Request: `{"images": ["<base64>"], "plant_details": ["common_names"]}`
//! - Response: `{"suggestions": [{"plant_name", "plant_details": {"scientific_name"}, "probability"}]}`
//!
//! Suggestions are returned ranked, best first.

use crate::types::{PlantIdentifier, ServiceError, Suggestion};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("flora-id/", env!("CARGO_PKG_VERSION"));

/// Plant.id API client
pub struct PlantIdClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl PlantIdClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl PlantIdentifier for PlantIdClient {
    fn name(&self) -> &'static str {
        "Plant.id"
    }

    async fn identify(&self, image: &[u8]) -> Result<Vec<Suggestion>, ServiceError> {
        debug!(image_bytes = image.len(), "Submitting photo to Plant.id");

        let request = IdentifyRequest {
            images: vec![STANDARD.encode(image)],
            plant_details: vec!["common_names".to_string()],
        };

        let response = self
            .http_client
            .post(format!("{}/identify", self.base_url))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Network(format!("Plant.id request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, body });
        }

        let body: IdentifyResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(format!("Failed to parse Plant.id response: {}", e)))?;

        let suggestions: Vec<Suggestion> = body.suggestions.into_iter().map(Suggestion::from).collect();
        debug!(count = suggestions.len(), "Plant.id suggestions received");
        Ok(suggestions)
    }
}

// ============================================================================
// Plant.id API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct IdentifyRequest {
    images: Vec<String>,
    plant_details: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    suggestions: Vec<ApiSuggestion>,
}

#[derive(Debug, Deserialize)]
struct ApiSuggestion {
    plant_name: String,
    #[serde(default)]
    plant_details: Option<PlantDetails>,
    #[serde(default)]
    probability: f32,
}

#[derive(Debug, Deserialize)]
struct PlantDetails {
    #[serde(default)]
    scientific_name: Option<String>,
}

impl From<ApiSuggestion> for Suggestion {
    fn from(api: ApiSuggestion) -> Self {
        let scientific_name = api
            .plant_details
            .and_then(|d| d.scientific_name)
            .unwrap_or_else(|| api.plant_name.clone());

        Suggestion {
            name: api.plant_name,
            scientific_name,
            probability: api.probability,
        }
    }
}
