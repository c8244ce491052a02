use crate::crawler::Rewrite;
use url::Url;

/// Extension used when an image URL carries none
const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Rewrites a resolved thumbnail URL into its full-resolution form
///
/// Each rewrite is applied in order. This is best-effort string rewriting: a
/// URL that matches no rewrite is returned unchanged.
///
/// # Examples
///
/// ```
/// use seatview::crawler::SiteRules;
/// use seatview::url::full_resolution_url;
///
/// let rules = SiteRules::standard();
/// assert_eq!(
///     full_resolution_url("https://x/thumbs/img_thumb.jpg", &rules.full_resolution),
///     "https://x/photos/img.jpg"
/// );
/// ```
pub fn full_resolution_url(resolved: &str, rewrites: &[Rewrite]) -> String {
    rewrites
        .iter()
        .fold(resolved.to_string(), |url, rewrite| rewrite.apply(&url))
}

/// Returns the file extension of an image URL, including the dot
///
/// Only the last path segment is considered, so query strings and dotted
/// directory names do not leak into the extension. Falls back to `.jpg`.
pub fn image_extension(image_url: &str) -> String {
    let last_segment = match Url::parse(image_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => image_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    };

    match last_segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext)
        }
        _ => DEFAULT_IMAGE_EXTENSION.to_string(),
    }
}
