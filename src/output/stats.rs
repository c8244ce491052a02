//! Run statistics
//!
//! Counts gathered by the coordinator and printed by the binary.

use serde::Serialize;
use std::path::PathBuf;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Sections were discovered and processed; counts may still show partial failures
    Completed,

    /// The section index yielded nothing; no downloads or metadata were written
    NoSections,
}

/// Summary of one scrape run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub venue: String,

    /// Sections listed on the venue index
    pub sections_found: usize,

    /// Sections actually paginated (after any section limit)
    pub sections_scraped: usize,

    /// Photo records in the final result
    pub photos_found: usize,

    /// Images fetched during this run
    pub photos_downloaded: usize,

    /// Images already on disk
    pub photos_skipped: usize,

    pub downloads_failed: usize,

    /// Where the flat metadata was written, if it was
    pub metadata_path: Option<PathBuf>,

    pub outcome: RunOutcome,
}

impl RunReport {
    /// Report for a run that stopped because no sections were found
    pub fn no_sections(venue: &str) -> Self {
        Self {
            venue: venue.to_string(),
            sections_found: 0,
            sections_scraped: 0,
            photos_found: 0,
            photos_downloaded: 0,
            photos_skipped: 0,
            downloads_failed: 0,
            metadata_path: None,
            outcome: RunOutcome::NoSections,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

/// Prints a run report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &RunReport) {
    println!("=== Scrape Summary ===\n");
    println!("Venue: {}", report.venue.replace('+', " "));

    if report.outcome == RunOutcome::NoSections {
        println!("No sections found. Nothing was downloaded.");
        return;
    }

    println!();
    println!("Sections:");
    println!("  Found: {}", report.sections_found);
    println!("  Scraped: {}", report.sections_scraped);
    println!();

    println!("Photos:");
    println!("  Found: {}", report.photos_found);
    println!("  Downloaded: {}", report.photos_downloaded);
    println!("  Already present: {}", report.photos_skipped);
    if report.downloads_failed > 0 {
        println!("  Failed: {}", report.downloads_failed);
    }

    if let Some(path) = &report.metadata_path {
        println!();
        println!("Metadata: {}", path.display());
    }
}
