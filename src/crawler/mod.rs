//! Crawler module for page fetching and photo harvesting
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with politeness delays, retry and a browser fallback
//! - Declarative site rules and the HTML extraction built on them
//! - Section discovery and listing pagination
//! - Concurrent, idempotent image downloads
//! - Overall run coordination

mod coordinator;
mod discovery;
mod downloader;
mod fetcher;
mod paginator;
mod parser;
mod politeness;
mod rules;

pub use coordinator::{enrich_photo, run_scrape, Coordinator};
pub use discovery::SectionDiscoverer;
pub use downloader::{
    DownloadError, DownloadManager, DownloadReport, HttpTransfer, ImageTransfer,
    DEFAULT_MAX_CONCURRENT_DOWNLOADS,
};
pub use fetcher::{build_http_client, BrowserLauncher, PageFetcher, PageSource, DEFAULT_USER_AGENT};
pub use paginator::{ListingPage, ListingPaginator};
pub use parser::{
    extract_photo_details, extract_photos, extract_sections, has_next_page, parse_listing,
    ParsedListing,
};
pub use politeness::Politeness;
pub use rules::{PhotoPath, Rewrite, SiteRules};
