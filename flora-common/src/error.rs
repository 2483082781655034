//! Errors raised while bootstrapping a Flora service

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Config file exists but could not be read
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file was read but is not valid TOML for `TomlConfig`
    #[error("Malformed config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Settings are present but unusable (missing API key, client setup)
    #[error("Configuration error: {0}")]
    Config(String),
}
