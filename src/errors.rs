/*!
 * Error types for the ftbq-localizer application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors raised while loading, merging or writing a catalog file
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Reading or writing the catalog file failed
    #[error("Catalog I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing catalog file is not a flat JSON object of strings
    #[error("Malformed catalog at {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the merged catalog failed
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while building the resource pack archive
#[derive(Error, Debug)]
pub enum PackagingError {
    /// A catalog to bundle could not be read, or the archive could not be written
    #[error("Packaging I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip writer rejected an entry
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The manifest could not be serialized
    #[error("Failed to serialize pack manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The chapter input directory does not exist
    #[error("Input directory not found: {0:?}")]
    InputDirectoryMissing(PathBuf),

    /// The configuration is incomplete or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from catalog persistence
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from resource pack packaging
    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
