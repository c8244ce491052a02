use crate::crawler::DEFAULT_MAX_CONCURRENT_DOWNLOADS;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Hard ceiling on listing pages fetched for a single section
pub const MAX_PAGES_CEILING: u32 = 50;

/// Main configuration structure for Seatview
///
/// Every table is optional; a missing table takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target site and venue
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root of the photo-sharing site, used to resolve relative links
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Venue name; aliases such as "msg" are resolved at load time
    #[serde(default = "default_venue")]
    pub venue: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            venue: default_venue(),
        }
    }
}

/// Page and image request behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Lower bound of the random politeness delay (milliseconds)
    #[serde(rename = "min-delay-ms", default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the random politeness delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Retries after the first attempt for transient failures
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Total timeout for one attempt (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Backoff unit; retry N waits `backoff-base-ms * 2^N`
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Replaces the default browser user agent
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

impl FetcherConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            backoff_base_ms: default_backoff_base_ms(),
            user_agent: None,
        }
    }
}

/// Crawl scope and scheduling
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Only scrape the first N discovered sections
    #[serde(rename = "max-sections", default)]
    pub max_sections: Option<usize>,

    /// Listing pages per section (never above 50)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Sections paginated at the same time
    #[serde(rename = "max-concurrent-sections", default = "default_concurrent_sections")]
    pub max_concurrent_sections: usize,

    /// Visit each photo page to pick up event, contributor and the full image
    #[serde(rename = "fetch-details", default)]
    pub fetch_details: bool,

    /// Collapse duplicate photo ids across listing pages
    #[serde(rename = "dedupe-photos", default)]
    pub dedupe_photos: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_sections: None,
            max_pages: default_max_pages(),
            max_concurrent_sections: default_concurrent_sections(),
            fetch_details: false,
            dedupe_photos: false,
        }
    }
}

/// Image download settings
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Simultaneous image transfers
    #[serde(rename = "max-concurrent", default = "default_concurrent_downloads")]
    pub max_concurrent: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_concurrent: default_concurrent_downloads(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for images and metadata files
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Flat metadata file name, relative to `directory`
    #[serde(rename = "metadata-file", default = "default_metadata_file")]
    pub metadata_file: String,

    /// Section/row summary file name, relative to `directory`
    #[serde(rename = "summary-file", default = "default_summary_file")]
    pub summary_file: String,
}

impl OutputConfig {
    pub fn metadata_path(&self) -> PathBuf {
        self.directory.join(&self.metadata_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.directory.join(&self.summary_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            metadata_file: default_metadata_file(),
            summary_file: default_summary_file(),
        }
    }
}

fn default_base_url() -> String {
    "https://aviewfrommyseat.com".to_string()
}

fn default_venue() -> String {
    "Madison+Square+Garden".to_string()
}

fn default_min_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    3000
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_max_pages() -> u32 {
    MAX_PAGES_CEILING
}

fn default_concurrent_sections() -> usize {
    2
}

fn default_concurrent_downloads() -> usize {
    DEFAULT_MAX_CONCURRENT_DOWNLOADS
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_metadata_file() -> String {
    "metadata.json".to_string()
}

fn default_summary_file() -> String {
    "summary_by_section.json".to_string()
}
