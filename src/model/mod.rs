//! Records produced by a scrape run
//!
//! Records are created by the extraction stage and handed by value to the
//! next stage. Enrichment produces an updated copy rather than mutating a
//! shared record.

mod photo;

pub use photo::PhotoRecord;

use std::collections::HashSet;
use url::Url;

/// A seating section discovered on the venue's section index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    pub id: String,
    pub name: String,
    pub url: Url,
}

/// Everything a run collected, in discovery order
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Every discovered section, scraped or not
    pub sections: Vec<SectionRef>,
    pub photos: Vec<PhotoRecord>,
}

impl RunResult {
    /// Drops later records whose `photo_id` was already seen
    ///
    /// Returns the number of records removed.
    pub fn dedupe_photos(&mut self) -> usize {
        let before = self.photos.len();
        let mut seen = HashSet::new();
        self.photos.retain(|photo| seen.insert(photo.photo_id.clone()));
        before - self.photos.len()
    }
}
