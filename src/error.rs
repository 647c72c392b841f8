//! Error types for the layercfg library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for layercfg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for layercfg
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    #[error("Config setting '{0}' does not exist")]
    ConfigNotFound(String),

    #[error("Invalid integer value '{raw}' for setting '{name}': {source}")]
    InvalidInteger {
        name: String,
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },

    // -------------------------------------------------------------------------
    // Cache Errors
    // -------------------------------------------------------------------------
    /// Available to [`CacheStore`](crate::CacheStore) implementations backed
    /// by external services. The in-process cache never produces it.
    #[error("Cache error: {0}")]
    Cache(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ConfigNotFound(_))
    }
}
