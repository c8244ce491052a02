//! Listing pagination for one section
//!
//! Pages are fetched strictly in ascending order because each page decides
//! whether the next one is requested.

use crate::config::MAX_PAGES_CEILING;
use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::parse_listing;
use crate::crawler::rules::SiteRules;
use crate::model::{PhotoRecord, SectionRef};
use crate::url::listing_page_url;
use url::Url;

/// Photos from one listing page
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub number: u32,
    pub photos: Vec<PhotoRecord>,
}

/// Walks a section's listing pages one at a time
///
/// Stops at the first page that cannot be fetched or holds no photos, after
/// a page without a "next" control, or once the page ceiling is reached.
pub struct ListingPaginator<'a> {
    source: &'a dyn PageSource,
    section: &'a SectionRef,
    base_url: &'a Url,
    rules: &'a SiteRules,
    max_pages: u32,
    next_page: u32,
    fetched: u32,
    finished: bool,
}

impl<'a> ListingPaginator<'a> {
    pub fn new(
        source: &'a dyn PageSource,
        section: &'a SectionRef,
        base_url: &'a Url,
        rules: &'a SiteRules,
    ) -> Self {
        Self {
            source,
            section,
            base_url,
            rules,
            max_pages: MAX_PAGES_CEILING,
            next_page: 1,
            fetched: 0,
            finished: false,
        }
    }

    /// Lowers the page limit; it can never exceed the hard ceiling
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.clamp(1, MAX_PAGES_CEILING);
        self
    }

    /// Number of pages requested so far
    pub fn pages_fetched(&self) -> u32 {
        self.fetched
    }

    /// Fetches and extracts the next page, or returns `None` when pagination is over
    pub async fn next_page(&mut self) -> Option<ListingPage> {
        if self.finished {
            return None;
        }

        if self.next_page > self.max_pages {
            tracing::warn!(
                "Reached page limit ({}) for section {}",
                self.max_pages,
                self.section.id
            );
            self.finished = true;
            return None;
        }

        let number = self.next_page;
        let url = listing_page_url(&self.section.url, number);
        self.fetched += 1;

        let Some(html) = self.source.fetch_html(url.as_str()).await else {
            tracing::warn!(
                "No content for section {} page {}, stopping",
                self.section.id,
                number
            );
            self.finished = true;
            return None;
        };

        let parsed = parse_listing(&html, &self.section.id, self.base_url, self.rules);

        if parsed.photos.is_empty() {
            tracing::debug!("Section {} page {} has no photos", self.section.id, number);
            self.finished = true;
            return None;
        }

        tracing::info!(
            "Section {}, page {}: found {} photos",
            self.section.id,
            number,
            parsed.photos.len()
        );

        if parsed.has_next {
            self.next_page += 1;
        } else {
            self.finished = true;
        }

        Some(ListingPage {
            number,
            photos: parsed.photos,
        })
    }

    /// Runs pagination to the end, concatenating pages in order
    ///
    /// Duplicate photo ids across pages are kept.
    pub async fn collect_all(mut self) -> Vec<PhotoRecord> {
        tracing::info!("Fetching photos for section {}", self.section.id);

        let mut photos = Vec::new();
        while let Some(page) = self.next_page().await {
            photos.extend(page.photos);
        }
        photos
    }
}
