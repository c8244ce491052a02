//! Storage traits and error types
//!
//! This module defines the trait interface for metadata backends and
//! associated error types.

use crate::model::{PhotoRecord, SectionRef};
use crate::storage::{Metadata, SectionSummary};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for metadata backends
///
/// The persisted artifacts are the single source of truth for reporting
/// tools, which only ever read them.
pub trait MetadataStore {
    /// Persists a finished run
    ///
    /// Writes the flat photo list with run-level counts and the derived
    /// section/row summary. Both replace any previous output wholesale.
    ///
    /// # Arguments
    ///
    /// * `venue` - Venue the run scraped
    /// * `sections` - Sections that were scraped
    /// * `photos` - Every photo record, in run order
    fn save(
        &self,
        venue: &str,
        sections: &[SectionRef],
        photos: &[PhotoRecord],
    ) -> StorageResult<()>;

    /// Loads the flat metadata; a missing file yields [`Metadata::default`]
    fn load(&self) -> StorageResult<Metadata>;

    /// Loads the section/row summary; a missing file yields an empty summary
    fn load_summary(&self) -> StorageResult<SectionSummary>;
}
