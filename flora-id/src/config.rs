//! Configuration resolution for flora-id
//!
//! API keys resolve with ENV → TOML priority; everything else comes from the
//! TOML bootstrap config. [`build_services`] turns a loaded config into the
//! wired service graph.

use crate::clients::{GeminiClient, PlantIdClient, WikipediaClient};
use crate::services::FloraServices;
use crate::utils::RetryPolicy;
use flora_common::config::{is_valid_key, TomlConfig};
use flora_common::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable for the generation service key
pub const GEMINI_API_KEY_ENV: &str = "FLORA_GEMINI_API_KEY";
/// Environment variable for the identification service key
pub const PLANT_ID_API_KEY_ENV: &str = "FLORA_PLANT_ID_API_KEY";

/// Resolve the generation service API key
///
/// **Priority:** ENV → TOML
pub fn resolve_gemini_api_key(toml_config: &TomlConfig) -> Result<String> {
    resolve_api_key(
        "Gemini",
        GEMINI_API_KEY_ENV,
        toml_config.gemini.api_key.as_deref(),
        "[gemini] api_key",
    )
}

/// Resolve the identification service API key
///
/// **Priority:** ENV → TOML
pub fn resolve_plant_id_api_key(toml_config: &TomlConfig) -> Result<String> {
    resolve_api_key(
        "Plant.id",
        PLANT_ID_API_KEY_ENV,
        toml_config.plant_id.api_key.as_deref(),
        "[plant_id] api_key",
    )
}

fn resolve_api_key(
    service: &str,
    env_var: &str,
    toml_key: Option<&str>,
    toml_field: &str,
) -> Result<String> {
    let env_key = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_key.filter(|k| is_valid_key(k));

    // Warn if multiple sources (potential misconfiguration)
    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} API key found in both environment and TOML. Using environment (highest priority).",
            service
        );
    }

    if let Some(key) = env_key {
        info!("{} API key loaded from environment variable", service);
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("{} API key loaded from TOML config", service);
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "{service} API key not configured. Please configure using one of:\n\
         1. Environment: {env_var}=your-key-here\n\
         2. TOML config: ~/.config/flora/flora-id.toml ({toml_field} = \"your-key\")"
    )))
}

/// Build the HTTP clients and service graph from configuration
pub fn build_services(config: &TomlConfig) -> Result<FloraServices> {
    let timeout = Duration::from_secs(config.http.timeout_secs.max(1));
    let client_error = |e: crate::types::ServiceError| Error::Config(format!("HTTP client setup failed: {}", e));

    let generator = GeminiClient::new(
        &config.gemini.base_url,
        &config.gemini.model,
        resolve_gemini_api_key(config)?,
        timeout,
    )
    .map_err(client_error)?;

    let identifier = PlantIdClient::new(
        &config.plant_id.base_url,
        resolve_plant_id_api_key(config)?,
        timeout,
    )
    .map_err(client_error)?;

    let encyclopedia = WikipediaClient::new(&config.wikipedia.base_url, timeout).map_err(client_error)?;

    let retry = RetryPolicy::from(&config.retry);
    info!(
        model = %config.gemini.model,
        timeout_secs = timeout.as_secs(),
        retry_attempts = retry.max_attempts,
        retry_backoff_ms = retry.backoff.as_millis(),
        "Services configured"
    );

    Ok(FloraServices::new(
        Arc::new(generator),
        Arc::new(identifier),
        Arc::new(encyclopedia),
        retry,
    ))
}
