//! Seatview: a venue seat-view photo harvester
//!
//! This crate crawls a venue's photo-sharing site, discovers the per-section
//! photo listings, extracts section/row/seat metadata from photo URLs, downloads
//! the images into a section/row tree and persists the metadata as JSON.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Seatview operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Browser fallback error: {0}")]
    Browser(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// Result type alias for Seatview operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_scrape, Coordinator};
pub use model::{PhotoRecord, RunResult, SectionRef};
pub use output::RunReport;
