//! Crawler coordinator - whole-run orchestration
//!
//! This module drives one scrape from start to finish:
//! - Preparing the output directory
//! - Discovering the venue's sections
//! - Paginating sections with bounded concurrency
//! - Optional deduplication and detail enrichment
//! - Downloading images and persisting metadata
//!
//! Page and download failures only shrink the result. The run fails only
//! when the output directory or the metadata files cannot be written.

use crate::config::Config;
use crate::crawler::discovery::SectionDiscoverer;
use crate::crawler::downloader::{DownloadManager, DownloadReport, HttpTransfer, ImageTransfer};
use crate::crawler::fetcher::{BrowserLauncher, PageFetcher, PageSource};
use crate::crawler::paginator::ListingPaginator;
use crate::crawler::parser::extract_photo_details;
use crate::crawler::politeness::Politeness;
use crate::crawler::rules::SiteRules;
use crate::model::{PhotoRecord, RunResult, SectionRef};
use crate::output::{RunOutcome, RunReport};
use crate::storage::{prepare_output_dir, JsonStore, MetadataStore};
use crate::url::parse_base_url;
use crate::ScrapeError;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use url::Url;

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    base_url: Url,
    source: Arc<dyn PageSource>,
    downloader: DownloadManager,
    store: JsonStore,
    rules: &'static SiteRules,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP with no browser fallback
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - Bad base URL or HTTP client construction failed
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        Self::with_fallback(config, None)
    }

    /// Creates a coordinator whose fetcher switches to `launcher` after the first 403
    pub fn with_fallback(
        config: Config,
        launcher: Option<Arc<dyn BrowserLauncher>>,
    ) -> Result<Self, ScrapeError> {
        let mut fetcher = PageFetcher::from_config(&config.fetcher)?;
        if let Some(launcher) = launcher {
            fetcher = fetcher.with_fallback(launcher);
        }

        let transfer = HttpTransfer::new(
            fetcher.client().clone(),
            Politeness::from_config(&config.fetcher),
        );

        Self::with_sources(config, Arc::new(fetcher), Arc::new(transfer))
    }

    /// Creates a coordinator over caller-supplied page and image sources
    pub fn with_sources(
        config: Config,
        source: Arc<dyn PageSource>,
        transfer: Arc<dyn ImageTransfer>,
    ) -> Result<Self, ScrapeError> {
        let base_url = parse_base_url(&config.site.base_url)?;
        let downloader = DownloadManager::new(
            transfer,
            config.output.directory.clone(),
            config.download.max_concurrent,
        );
        let store = JsonStore::from_config(&config.output);

        Ok(Self {
            config: Arc::new(config),
            base_url,
            source,
            downloader,
            store,
            rules: SiteRules::standard(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the scrape
    ///
    /// Returns a [`RunOutcome::NoSections`] report, without downloading or
    /// writing metadata, when the venue index yields no sections.
    pub async fn run(&self) -> Result<RunReport, ScrapeError> {
        let venue = self.config.site.venue.as_str();

        prepare_output_dir(&self.config.output.directory)?;
        tracing::info!("Starting scrape for venue: {}", venue.replace('+', " "));

        let discoverer = SectionDiscoverer::new(self.source.as_ref(), &self.base_url, self.rules);
        let sections = discoverer.discover(venue).await?;

        if sections.is_empty() {
            tracing::error!("No sections found for {}", venue);
            return Ok(RunReport::no_sections(venue));
        }

        let mut to_scrape = sections.as_slice();
        if let Some(limit) = self.config.scrape.max_sections {
            if sections.len() > limit {
                tracing::info!("Limiting to first {} of {} sections", limit, sections.len());
                to_scrape = &sections[..limit];
            }
        }
        let sections_scraped = to_scrape.len();

        let photos = self.scrape_sections(to_scrape).await;
        let mut result = RunResult { sections, photos };

        if self.config.scrape.dedupe_photos {
            let removed = result.dedupe_photos();
            if removed > 0 {
                tracing::info!("Removed {} duplicate photos", removed);
            }
        }

        if self.config.scrape.fetch_details {
            result.photos = self.enrich_photos(result.photos).await;
        }

        tracing::info!("Total photos found: {}", result.photos.len());

        let downloads = if self.config.download.enabled {
            self.downloader.download_all(&result.photos).await
        } else {
            tracing::info!("Downloads disabled, saving metadata only");
            DownloadReport::default()
        };

        self.store.save(venue, &result.sections, &result.photos)?;

        let report = RunReport {
            venue: venue.to_string(),
            sections_found: result.sections.len(),
            sections_scraped,
            photos_found: result.photos.len(),
            photos_downloaded: downloads.downloaded,
            photos_skipped: downloads.skipped,
            downloads_failed: downloads.failed,
            metadata_path: Some(self.store.metadata_path().to_path_buf()),
            outcome: RunOutcome::Completed,
        };

        tracing::info!(
            "Scrape complete: {} sections, {} photos, {} downloaded",
            report.sections_scraped,
            report.photos_found,
            report.photos_downloaded
        );

        Ok(report)
    }

    /// Paginates every section, at most `max-concurrent-sections` at a time
    ///
    /// The result keeps section order regardless of completion order.
    async fn scrape_sections(&self, sections: &[SectionRef]) -> Vec<PhotoRecord> {
        let max_pages = self.config.scrape.max_pages;

        let per_section: Vec<Vec<PhotoRecord>> = stream::iter(sections)
            .map(|section| {
                ListingPaginator::new(self.source.as_ref(), section, &self.base_url, self.rules)
                    .with_max_pages(max_pages)
                    .collect_all()
            })
            .buffered(self.config.scrape.max_concurrent_sections.max(1))
            .collect()
            .await;

        per_section.into_iter().flatten().collect()
    }

    async fn enrich_photos(&self, photos: Vec<PhotoRecord>) -> Vec<PhotoRecord> {
        tracing::info!("Fetching details for {} photos", photos.len());

        stream::iter(photos)
            .map(|photo| enrich_photo(self.source.as_ref(), photo, &self.base_url, self.rules))
            .buffered(self.config.scrape.max_concurrent_sections.max(1))
            .collect()
            .await
    }
}

/// Visits a photo's own page and returns the record with its details filled in
///
/// When the page cannot be fetched the record comes back unchanged.
pub async fn enrich_photo(
    source: &dyn PageSource,
    photo: PhotoRecord,
    base_url: &Url,
    rules: &SiteRules,
) -> PhotoRecord {
    match source.fetch_html(&photo.page_url).await {
        Some(html) => extract_photo_details(&html, &photo, base_url, rules),
        None => {
            tracing::warn!("Could not fetch details for photo {}", photo.photo_id);
            photo
        }
    }
}

/// Builds a coordinator from `config` and runs it
pub async fn run_scrape(config: Config) -> Result<RunReport, ScrapeError> {
    Coordinator::new(config)?.run().await
}
