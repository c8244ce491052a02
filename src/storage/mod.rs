//! Storage module for persisting run output
//!
//! This module handles everything written next to the downloaded images:
//! - Preparing the output directory before a run starts
//! - The flat photo metadata file with run-level counts
//! - The section → row → photo summary derived from it

mod json;
mod traits;

pub use json::JsonStore;
pub use traits::{MetadataStore, StorageError, StorageResult};

use crate::model::PhotoRecord;
use crate::ScrapeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Contents of the flat metadata file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub venue: String,
    pub total_photos: usize,
    /// Number of sections discovered on the venue index, including any
    /// left out by a section limit
    pub sections: usize,
    pub photos: Vec<PhotoRecord>,
}

/// One photo as listed in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub photo_id: String,
    pub seat: Option<String>,
    pub image_url: String,
}

/// Photos of one section grouped by row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRows {
    pub rows: BTreeMap<String, Vec<SummaryEntry>>,
}

/// Section id → rows; rows without a name are grouped under "unknown"
pub type SectionSummary = BTreeMap<String, SectionRows>;

/// Groups photos by section, then row, keeping run order within each row
pub fn build_summary(photos: &[PhotoRecord]) -> SectionSummary {
    let mut summary = SectionSummary::new();

    for photo in photos {
        summary
            .entry(photo.section.clone())
            .or_default()
            .rows
            .entry(photo.row_or_unknown().to_string())
            .or_default()
            .push(SummaryEntry {
                photo_id: photo.photo_id.clone(),
                seat: photo.seat.clone(),
                image_url: photo.image_url.clone(),
            });
    }

    summary
}

/// Creates the output directory if needed
///
/// Called once before any network activity so an unwritable location fails
/// the run immediately.
pub fn prepare_output_dir(path: &Path) -> Result<(), ScrapeError> {
    std::fs::create_dir_all(path).map_err(|source| ScrapeError::OutputDir {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!("Output directory ready: {}", path.display());
    Ok(())
}
