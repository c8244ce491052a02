//! URL handling module for Seatview
//!
//! This module builds the site's section and listing URLs, resolves hrefs
//! found in markup against the site root, and rewrites thumbnail image URLs
//! into their full-resolution form.

mod normalize;
mod resolve;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use normalize::{full_resolution_url, image_extension};
pub use resolve::{resolve_image_src, resolve_link};

/// Encodes a venue name as a single path segment
///
/// `+` in the input is treated as a word separator, so both
/// `"Madison Square Garden"` and `"Madison+Square+Garden"` encode the same way.
///
/// # Examples
///
/// ```
/// use seatview::url::venue_path_segment;
///
/// assert_eq!(venue_path_segment("Madison+Square+Garden"), "Madison+Square+Garden");
/// assert_eq!(venue_path_segment("Citi Field"), "Citi+Field");
/// ```
pub fn venue_path_segment(venue: &str) -> String {
    let spaced = venue.replace('+', " ");
    url::form_urlencoded::byte_serialize(spaced.as_bytes()).collect()
}

/// Parses the configured site root
pub fn parse_base_url(base: &str) -> UrlResult<Url> {
    let url = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(base.to_string()));
    }

    Ok(url)
}

/// Builds `{base}/venue/{venue}/sections/`
pub fn section_index_url(base: &Url, venue: &str) -> UrlResult<Url> {
    let path = format!("/venue/{}/sections/", venue_path_segment(venue));
    base.join(&path).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Returns the URL of listing page `page` for a section
///
/// Page 1 is the section URL itself; later pages add `?page=N`.
pub fn listing_page_url(section_url: &Url, page: u32) -> Url {
    let mut url = section_url.clone();
    if page > 1 {
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
    }
    url
}
