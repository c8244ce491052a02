use crate::url::image_extension;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Row directory used when a photo carries no row
pub const UNKNOWN_ROW: &str = "unknown";

/// One photo and the seat location it was taken from
///
/// Location fields are free-form strings taken verbatim from the photo URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Site-wide photo identifier
    pub photo_id: String,
    pub section: String,
    pub row: Option<String>,
    pub seat: Option<String>,
    /// Absolute, full-resolution image URL
    pub image_url: String,
    /// Absolute URL of the photo's own page
    pub page_url: String,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub contributor: Option<String>,
}

impl PhotoRecord {
    /// Row name used for directory layout and summaries
    pub fn row_or_unknown(&self) -> &str {
        self.row.as_deref().unwrap_or(UNKNOWN_ROW)
    }

    /// Returns where this photo is stored under `base_dir`
    ///
    /// Layout: `section_<s>/row_<r>/section_<s>_row_<r>[_seat_<k>]_<id><ext>`.
    /// The same record always maps to the same path.
    pub fn local_path(&self, base_dir: &Path) -> PathBuf {
        let section_dir = format!("section_{}", self.section);
        let row_dir = format!("row_{}", self.row_or_unknown());
        let ext = image_extension(&self.image_url);

        let filename = match &self.seat {
            Some(seat) => format!(
                "{}_{}_seat_{}_{}{}",
                section_dir, row_dir, seat, self.photo_id, ext
            ),
            None => format!("{}_{}_{}{}", section_dir, row_dir, self.photo_id, ext),
        };

        base_dir.join(&section_dir).join(&row_dir).join(filename)
    }
}
