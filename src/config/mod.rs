//! Configuration module for Seatview
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every table is optional, so an empty file yields a working configuration.
//!
//! # Example
//!
//! ```no_run
//! use seatview::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seatview.toml")).unwrap();
//! println!("Scraping venue: {}", config.site.venue);
//! ```

mod parser;
mod types;
mod validation;
mod venue;

// Re-export types
pub use types::{
    Config, DownloadConfig, FetcherConfig, OutputConfig, ScrapeConfig, SiteConfig,
    MAX_PAGES_CEILING,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
pub use venue::resolve_venue_name;
