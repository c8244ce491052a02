//! JSON file backend

use crate::config::OutputConfig;
use crate::model::{PhotoRecord, SectionRef};
use crate::storage::traits::{MetadataStore, StorageResult};
use crate::storage::{build_summary, Metadata, SectionSummary};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores run output as two pretty-printed JSON files
#[derive(Debug, Clone)]
pub struct JsonStore {
    metadata_path: PathBuf,
    summary_path: PathBuf,
}

impl JsonStore {
    pub fn new(metadata_path: impl Into<PathBuf>, summary_path: impl Into<PathBuf>) -> Self {
        Self {
            metadata_path: metadata_path.into(),
            summary_path: summary_path.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.metadata_path(), config.summary_path())
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }
}

impl MetadataStore for JsonStore {
    fn save(
        &self,
        venue: &str,
        sections: &[SectionRef],
        photos: &[PhotoRecord],
    ) -> StorageResult<()> {
        let metadata = Metadata {
            venue: venue.to_string(),
            total_photos: photos.len(),
            sections: sections.len(),
            photos: photos.to_vec(),
        };
        write_json(&self.metadata_path, &metadata)?;
        tracing::info!("Saved metadata to {}", self.metadata_path.display());

        write_json(&self.summary_path, &build_summary(photos))?;
        tracing::info!("Saved section summary to {}", self.summary_path.display());

        Ok(())
    }

    fn load(&self) -> StorageResult<Metadata> {
        read_json_or_default(&self.metadata_path)
    }

    fn load_summary(&self) -> StorageResult<SectionSummary> {
        read_json_or_default(&self.summary_path)
    }
}

/// Replaces `path` with the serialized value via a sibling temp file
fn write_json<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let json = serde_json::to_string_pretty(value)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> StorageResult<T> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet", path.display());
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}
