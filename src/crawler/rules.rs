//! Site pattern table
//!
//! All knowledge of the site's URL and markup conventions lives here. The
//! traversal code in `parser` only asks these rules questions, so a change in
//! the site's format should only touch this file.

use regex::Regex;
use std::sync::LazyLock;

/// A best-effort string rewrite applied to image URLs
#[derive(Debug)]
pub struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

impl Rewrite {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("static rewrite pattern"),
            replacement,
        }
    }

    /// Applies the rewrite to every match; input without a match is returned as-is
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement)
            .into_owned()
    }
}

/// Location fields carried by a photo page path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPath {
    pub photo_id: String,
    pub section: String,
    pub row: String,
    pub seat: Option<String>,
}

/// The complete rule set for one site
#[derive(Debug)]
pub struct SiteRules {
    /// `/venue/<venue>/section-<id>/`
    section_link: Regex,

    /// `/photo/<numeric-id>/<slug>/section-<s>/row-<r>[/seat-<k>]/`
    photo_link: Regex,

    /// Text of a "next page" control
    next_page: Regex,

    /// Class names marking a photo card
    photo_container: Regex,

    /// Element names that may act as photo cards
    pub container_tags: &'static [&'static str],

    /// Image attributes holding the source, in preference order
    pub image_source_attrs: &'static [&'static str],

    /// Thumbnail to full-resolution rewrites, applied in order
    pub full_resolution: Vec<Rewrite>,

    /// `id` of the main image on a photo detail page
    detail_image_id: Regex,

    /// `class` of the main image on a photo detail page
    detail_image_class: Regex,

    /// Substrings of an image src that suggest an uploaded photo
    pub detail_image_src_hints: &'static [&'static str],

    /// Label preceding the event name on a detail page
    event_label: Regex,

    /// Attribution line naming the contributor
    contributor: Regex,
}

static STANDARD: LazyLock<SiteRules> = LazyLock::new(SiteRules::build_standard);

impl SiteRules {
    /// Rules for the aviewfrommyseat.com layout
    pub fn standard() -> &'static SiteRules {
        &STANDARD
    }

    fn build_standard() -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("static site pattern");

        Self {
            section_link: re(r"/venue/[^/]+/section-([^/?#]+)/?"),
            photo_link: re(
                r"/photo/(\d+)/[^/]+/section-([^/?#]+)/row-([^/?#]+)(?:/seat-([^/?#]+))?/?",
            ),
            next_page: re(r"(?i)next|›|»|>>"),
            photo_container: re(r"(?i)photo|image|gallery"),
            container_tags: &["div", "article"],
            image_source_attrs: &["src", "data-src"],
            full_resolution: vec![
                Rewrite::new(r"(?i)_thumb\.(jpg|jpeg|png|gif)", ".$1"),
                Rewrite::new(r"(?i)-thumb\.(jpg|jpeg|png|gif)", ".$1"),
                Rewrite::new(r"/thumbs?/", "/photos/"),
                Rewrite::new(r"/small/", "/large/"),
                Rewrite::new(r"/medium/", "/large/"),
            ],
            detail_image_id: re(r"(?i)main|photo|image"),
            detail_image_class: re(r"(?i)main|photo|image|full"),
            detail_image_src_hints: &["photo", "upload"],
            event_label: re(r"(?i)Event:"),
            contributor: re(r"(?i)(?:Shared|Posted|Contributed) by\s+(\w+)"),
        }
    }

    /// Returns the section id if `href` points at a section listing
    pub fn match_section_path(&self, href: &str) -> Option<String> {
        self.section_link
            .captures(href)
            .map(|caps| caps[1].to_string())
    }

    /// Returns the location fields if `href` points at a photo page
    pub fn match_photo_path(&self, href: &str) -> Option<PhotoPath> {
        let caps = self.photo_link.captures(href)?;
        Some(PhotoPath {
            photo_id: caps[1].to_string(),
            section: caps[2].to_string(),
            row: caps[3].to_string(),
            seat: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    pub fn is_next_page_text(&self, text: &str) -> bool {
        self.next_page.is_match(text)
    }

    pub fn is_photo_container_class(&self, class: &str) -> bool {
        self.photo_container.is_match(class)
    }

    pub fn is_detail_image_id(&self, id: &str) -> bool {
        self.detail_image_id.is_match(id)
    }

    pub fn is_detail_image_class(&self, class: &str) -> bool {
        self.detail_image_class.is_match(class)
    }

    pub fn has_event_label(&self, text: &str) -> bool {
        self.event_label.is_match(text)
    }

    /// Strips the event label, leaving the event name
    pub fn strip_event_label(&self, text: &str) -> String {
        self.event_label.replace_all(text, "").trim().to_string()
    }

    pub fn has_contributor_line(&self, text: &str) -> bool {
        self.contributor.is_match(text)
    }

    pub fn match_contributor(&self, text: &str) -> Option<String> {
        self.contributor
            .captures(text)
            .map(|caps| caps[1].to_string())
    }
}
