//! Configuration loading and config file resolution
//!
//! Bootstrap settings live in a single TOML file. Every section is optional:
//! a missing file or missing keys fall back to built-in defaults so the
//! service can always start.
//!
//! # Config file priority
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`FLORA_CONFIG`)
//! 3. Per-user config directory (`<config_dir>/flora/<module>.toml`)
//! 4. No file (built-in defaults)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FLORA_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TomlConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Generative text service (Gemini)
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Photo identification service (Plant.id)
    #[serde(default)]
    pub plant_id: PlantIdConfig,

    /// Encyclopedia (Wikipedia)
    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Detail generation retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlantIdConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_plant_id_base_url")]
    pub base_url: String,
}

impl Default for PlantIdConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_plant_id_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_wikipedia_base_url")]
    pub base_url: String,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_wikipedia_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Per-request timeout for outbound calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts (not exponential)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_port() -> u16 {
    5731
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_plant_id_base_url() -> String {
    "https://api.plant.id/v2".to_string()
}

fn default_wikipedia_base_url() -> String {
    "https://en.wikipedia.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_ms() -> u64 {
    1000
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            logging: LoggingConfig::default(),
            gemini: GeminiConfig::default(),
            plant_id: PlantIdConfig::default(),
            wikipedia: WikipediaConfig::default(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Resolves which config file (if any) a module should read
pub struct ConfigPathResolver {
    module_name: String,
}

impl ConfigPathResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    /// Resolve config file path following the priority order above
    ///
    /// Returns `None` when no candidate exists.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        let user_config = self.default_path()?;
        if user_config.exists() {
            Some(user_config)
        } else {
            None
        }
    }

    /// `<config_dir>/flora/<module>.toml`
    pub fn default_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("flora").join(format!("{}.toml", self.module_name)))
    }
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config from an optional path, degrading to defaults
///
/// A missing file is not fatal: a warning is logged and defaults are used.
/// A file that exists but does not parse is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) if path.exists() => {
            let config = load_toml_config(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            info!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
