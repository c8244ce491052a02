//! HTML parser for the site's section index, listing and photo pages
//!
//! This module walks parsed documents and asks [`SiteRules`] which links,
//! containers and images matter. Everything here is synchronous and never
//! fails: unexpected markup yields fewer records, not an error.

use crate::crawler::rules::{PhotoPath, SiteRules};
use crate::model::{PhotoRecord, SectionRef};
use crate::url::{full_resolution_url, resolve_image_src, resolve_link};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static ALL_ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));
static IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("static selector"));

/// One listing page, parsed once
#[derive(Debug, Clone, Default)]
pub struct ParsedListing {
    /// Photos on the page, unique by `photo_id`
    pub photos: Vec<PhotoRecord>,

    /// Whether the page links to a following page
    pub has_next: bool,
}

/// Extracts the distinct sections linked from a section index page
///
/// A link is a section if its href matches the section path rule. The name is
/// the link text, or the id when the text is empty. Sections are unique by id
/// and keep first-seen order.
pub fn extract_sections(html: &str, base_url: &Url, rules: &SiteRules) -> Vec<SectionRef> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut sections = Vec::new();

    for link in document.select(&ANCHORS) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(id) = rules.match_section_path(href) else {
            continue;
        };
        let Some(url) = resolve_link(href, base_url) else {
            continue;
        };

        if !seen.insert(id.clone()) {
            continue;
        }

        let text = collapsed_text(link);
        let name = if text.is_empty() { id.clone() } else { text };

        sections.push(SectionRef { id, name, url });
    }

    sections
}

/// Extracts photo records from one listing page
///
/// Two passes run over the same document:
///
/// 1. Every photo link that wraps an `<img>`.
/// 2. Every photo card (container tag with a matching class) holding both a
///    photo link and an `<img>`.
///
/// A `photo_id` is emitted once; the first pass wins.
///
/// # Example
///
/// ```
/// use seatview::crawler::{extract_photos, SiteRules};
/// use url::Url;
///
/// let html = r#"<a href="/photo/7/view/section-101/row-B/seat-4/">
///                 <img src="/thumbs/7_thumb.jpg"></a>"#;
/// let base = Url::parse("https://aviewfrommyseat.com").unwrap();
/// let photos = extract_photos(html, "101", &base, SiteRules::standard());
///
/// assert_eq!(photos.len(), 1);
/// assert_eq!(photos[0].seat.as_deref(), Some("4"));
/// assert_eq!(photos[0].image_url, "https://aviewfrommyseat.com/photos/7.jpg");
/// ```
pub fn extract_photos(
    html: &str,
    section_id: &str,
    base_url: &Url,
    rules: &SiteRules,
) -> Vec<PhotoRecord> {
    let document = Html::parse_document(html);
    photos_from_document(&document, section_id, base_url, rules)
}

/// Parses a listing page into its photos and next-page flag
pub fn parse_listing(
    html: &str,
    section_id: &str,
    base_url: &Url,
    rules: &SiteRules,
) -> ParsedListing {
    let document = Html::parse_document(html);

    ParsedListing {
        photos: photos_from_document(&document, section_id, base_url, rules),
        has_next: has_next_page(&document, rules),
    }
}

fn photos_from_document(
    document: &Html,
    section_id: &str,
    base_url: &Url,
    rules: &SiteRules,
) -> Vec<PhotoRecord> {
    let mut seen = HashSet::new();
    let mut photos = Vec::new();

    // Pass 1: photo links wrapping an image
    for link in document.select(&ANCHORS) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(path) = rules.match_photo_path(href) else {
            continue;
        };
        let Some(img) = link.select(&IMAGES).next() else {
            continue;
        };

        if let Some(record) = build_record(path, href, img, base_url, rules) {
            if seen.insert(record.photo_id.clone()) {
                photos.push(record);
            }
        }
    }

    let from_links = photos.len();

    // Pass 2: photo cards
    let Ok(containers) = Selector::parse(&rules.container_tags.join(", ")) else {
        return photos;
    };

    for container in document.select(&containers) {
        let class = container.value().attr("class").unwrap_or_default();
        if !rules.is_photo_container_class(class) {
            continue;
        }

        let Some(link) = container.select(&ANCHORS).next() else {
            continue;
        };
        let Some(img) = container.select(&IMAGES).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(path) = rules.match_photo_path(href) else {
            continue;
        };

        if seen.contains(&path.photo_id) {
            continue;
        }

        if let Some(record) = build_record(path, href, img, base_url, rules) {
            seen.insert(record.photo_id.clone());
            photos.push(record);
        }
    }

    tracing::trace!(
        "Section {}: {} photos from links, {} from containers",
        section_id,
        from_links,
        photos.len() - from_links
    );

    photos
}

/// Checks for a link whose text looks like a "next page" control
pub fn has_next_page(document: &Html, rules: &SiteRules) -> bool {
    document
        .select(&ALL_ANCHORS)
        .any(|link| rules.is_next_page_text(&collapsed_text(link)))
}

fn build_record(
    path: PhotoPath,
    href: &str,
    img: ElementRef<'_>,
    base_url: &Url,
    rules: &SiteRules,
) -> Option<PhotoRecord> {
    let image_url = resolve_img(img, base_url, rules)?;
    let page_url = resolve_link(href, base_url)?;

    Some(PhotoRecord {
        photo_id: path.photo_id,
        section: path.section,
        row: Some(path.row),
        seat: path.seat,
        image_url,
        page_url: page_url.into(),
        event: None,
        contributor: None,
    })
}

/// Resolves and normalizes an image's source, preferring `src` over lazy-load attributes
fn resolve_img(img: ElementRef<'_>, base_url: &Url, rules: &SiteRules) -> Option<String> {
    let src = rules
        .image_source_attrs
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty())?;

    let resolved = resolve_image_src(src, base_url)?;
    Some(full_resolution_url(&resolved, &rules.full_resolution))
}

/// Fills in details from a photo's own page
///
/// Picks a better image when the page has a main image, and reads the event
/// name and contributor. Fields not found on the page keep their old values.
pub fn extract_photo_details(
    html: &str,
    photo: &PhotoRecord,
    base_url: &Url,
    rules: &SiteRules,
) -> PhotoRecord {
    let document = Html::parse_document(html);
    let mut enriched = photo.clone();

    let main_image =
        find_main_image(&document, rules).and_then(|img| resolve_img(img, base_url, rules));
    if let Some(url) = main_image {
        enriched.image_url = url;
    }

    if let Some(event) = find_labelled_text(
        &document,
        |text| rules.has_event_label(text),
        |text| Some(rules.strip_event_label(text)).filter(|event| !event.is_empty()),
    ) {
        enriched.event = Some(event);
    }

    if let Some(contributor) = find_labelled_text(
        &document,
        |text| rules.has_contributor_line(text),
        |text| rules.match_contributor(text),
    ) {
        enriched.contributor = Some(contributor);
    }

    enriched
}

fn find_main_image<'a>(document: &'a Html, rules: &SiteRules) -> Option<ElementRef<'a>> {
    let by_attr = |attr: &str, matches: &dyn Fn(&str) -> bool| {
        document
            .select(&IMAGES)
            .find(|img| img.value().attr(attr).is_some_and(matches))
    };

    by_attr("id", &|id| rules.is_detail_image_id(id))
        .or_else(|| by_attr("class", &|class| rules.is_detail_image_class(class)))
        .or_else(|| {
            by_attr("src", &|src| {
                let src = src.to_lowercase();
                rules
                    .detail_image_src_hints
                    .iter()
                    .any(|hint| src.contains(hint))
            })
        })
}

/// Finds the first text node matching `is_label` and extracts a value from
/// the text of its enclosing element
///
/// A label is often wrapped on its own (`<b>Event:</b> Name`), so the
/// grandparent is tried when the parent yields nothing.
fn find_labelled_text(
    document: &Html,
    is_label: impl Fn(&str) -> bool,
    extract: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let node = document
        .root_element()
        .descendants()
        .find(|node| node.value().as_text().is_some_and(|text| is_label(text)))?;

    node.ancestors()
        .filter_map(ElementRef::wrap)
        .take(2)
        .find_map(|element| extract(&collapsed_text(element)))
}

/// Element text with whitespace runs collapsed to single spaces
fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
