//! Core error types for healthhub-core.
//!
//! One umbrella error with per-domain sub-enums, built on thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::exercise::Joint;

/// Core error type for healthhub-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reminder store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Exercise detection errors
    #[error("Detection error: {0}")]
    Detect(#[from] DetectError),

    /// Content catalog errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Reminder-store-specific errors.
///
/// Reads never produce these: a missing or malformed reminders file is
/// treated as an empty store. Only writes can fail.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not resolve the data directory backing the store
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),

    /// Writing the collection back to disk failed
    #[error("Failed to write store at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be serialized
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Exercise-detection errors.
#[derive(Error, Debug)]
pub enum DetectError {
    /// A joint required by the active exercise is absent from the frame.
    /// The detector does no visibility filtering; callers guard their input.
    #[error("landmark '{0}' missing from frame")]
    MissingLandmark(Joint),
}

/// Content catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A catalog file is missing or unreadable
    #[error("Failed to load catalog file {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not resolve the data directory holding the config file
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown or malformed configuration key
    #[error("Invalid configuration key '{key}': {message}")]
    InvalidKey { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
