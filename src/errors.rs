// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::projection::{PathError, PruneError};

#[derive(Error, Debug)]
pub enum DriftwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid {role} expression {expr:?}: {source}")]
    InvalidPath {
        role: &'static str,
        expr: String,
        source: PathError,
    },

    #[error("Invalid query expression {expr:?}: {message}")]
    InvalidQuery { expr: String, message: String },

    #[error("Projection error: {0}")]
    Prune(#[from] PruneError),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Malformed notification: {0}")]
    MalformedNotification(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DriftwatchError>;
