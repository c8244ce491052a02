//! Shared fixtures for the integration tests

use seatview::config::Config;
use seatview::crawler::{build_http_client, PageFetcher, Politeness};
use std::path::Path;
use wiremock::{Match, Request, ResponseTemplate};

pub const VENUE: &str = "Test+Arena";

/// Configuration pointed at a mock server, with no politeness delays
pub fn test_config(base_url: &str, output: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.venue = VENUE.to_string();
    config.fetcher.min_delay_ms = 0;
    config.fetcher.max_delay_ms = 0;
    config.fetcher.backoff_base_ms = 0;
    config.fetcher.max_retries = 2;
    config.fetcher.timeout_secs = 5;
    config.output.directory = output.to_path_buf();
    config
}

/// Fetcher without delays or backoff
pub fn fast_fetcher(max_retries: u32) -> PageFetcher {
    let client = build_http_client(&Config::default().fetcher).expect("client");
    PageFetcher::new(client, Politeness::none(), max_retries)
}

pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html")
}

pub fn section_path(section: &str) -> String {
    format!("/venue/{}/section-{}/", VENUE, section)
}

pub fn index_path() -> String {
    format!("/venue/{}/sections/", VENUE)
}

/// Section index linking the given sections
pub fn index_page(sections: &[&str]) -> String {
    let links: String = sections
        .iter()
        .map(|s| format!(r#"<li><a href="{}">Section {}</a></li>"#, section_path(s), s))
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", links)
}

/// Photo link wrapping a thumbnail, as on a listing page
pub fn photo_anchor(id: &str, section: &str, row: &str, seat: Option<&str>) -> String {
    let seat = seat.map(|s| format!("/seat-{}", s)).unwrap_or_default();
    format!(
        r#"<a href="/photo/{id}/view-from-{section}/section-{section}/row-{row}{seat}/"><img src="/images/{id}_thumb.jpg"></a>"#
    )
}

pub fn next_link() -> &'static str {
    r#"<div class="pagination"><a href="?page=next">Next »</a></div>"#
}

/// Matches on the `page` query parameter; `None` means no parameter
pub struct PageParam(pub Option<u32>);

impl Match for PageParam {
    fn matches(&self, request: &Request) -> bool {
        let page = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok());
        page == self.0
    }
}
