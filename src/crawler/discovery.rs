//! Section discovery
//!
//! Fetches the venue's section index and turns its section links into
//! [`SectionRef`]s.

use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::extract_sections;
use crate::crawler::rules::SiteRules;
use crate::model::SectionRef;
use crate::url::section_index_url;
use crate::UrlResult;
use url::Url;

/// Discovers the sections of one venue
pub struct SectionDiscoverer<'a> {
    source: &'a dyn PageSource,
    base_url: &'a Url,
    rules: &'a SiteRules,
}

impl<'a> SectionDiscoverer<'a> {
    pub fn new(source: &'a dyn PageSource, base_url: &'a Url, rules: &'a SiteRules) -> Self {
        Self {
            source,
            base_url,
            rules,
        }
    }

    /// Returns the venue's distinct sections in first-seen order
    ///
    /// An unreachable index page or one without section links yields an empty
    /// list. Only a venue name that cannot form a URL is an error.
    pub async fn discover(&self, venue: &str) -> UrlResult<Vec<SectionRef>> {
        let index_url = section_index_url(self.base_url, venue)?;
        tracing::info!("Fetching sections from: {}", index_url);

        let Some(html) = self.source.fetch_html(index_url.as_str()).await else {
            tracing::error!("Failed to fetch sections page {}", index_url);
            return Ok(Vec::new());
        };

        let sections = extract_sections(&html, self.base_url, self.rules);
        tracing::info!("Found {} sections", sections.len());

        Ok(sections)
    }
}
