//! Error types for the imgsearch index pipeline.
//!
//! Errors are organized by stage so callers can tell a failed list fetch
//! apart from a failed classifier call or a missing index file, and react
//! with the right user-facing message.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for imgsearch operations.
#[derive(Error, Debug)]
pub enum ImgsearchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Candidate-list retrieval errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Classifier API errors
    #[error("Classify error: {0}")]
    Classify(#[from] ClassifyError),

    /// Index persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors retrieving the candidate image list.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The list URL could not be reached or the body not read
    #[error("Could not retrieve image list from {url}: {message}")]
    Transport { url: String, message: String },

    /// The list source answered with a non-success status
    #[error("Image list request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Errors from a single classifier call.
///
/// A response whose `concepts` field is absent is NOT an error; the client
/// returns an empty match list for that image instead.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The outbound request could not be constructed or serialized
    #[error("Failed to build classify request for {image}: {message}")]
    Request { image: String, message: String },

    /// Network failure or timeout during the call
    #[error("Classify request failed for {image}: {message}")]
    Transport { image: String, message: String },

    /// The API answered with a non-success status
    #[error("Classifier returned HTTP {status} for {image}: {body}")]
    Status {
        image: String,
        status: u16,
        body: String,
    },

    /// The response body was not the expected shape (undecodable JSON,
    /// or `outputs` missing/empty)
    #[error("Malformed classifier response for {image}: {message}")]
    Malformed { image: String, message: String },
}

/// Index persistence errors. `NotFound` is distinct from `Parse` so the
/// search command can tell "no index yet" apart from a corrupt file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No index file at the configured path
    #[error("No index found at {0}")]
    NotFound(PathBuf),

    /// Reading or writing the index file failed
    #[error("Index file IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The index file exists but is not well-formed JSON
    #[error("Failed to parse index file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Convenience type alias for imgsearch results.
pub type Result<T> = std::result::Result<T, ImgsearchError>;
