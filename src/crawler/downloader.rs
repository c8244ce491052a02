//! Image download manager
//!
//! Downloads every photo exactly once into its deterministic local path.
//! Files already on disk are skipped without any network traffic, and a
//! failed transfer never affects its siblings.

use crate::crawler::politeness::Politeness;
use crate::model::PhotoRecord;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default number of simultaneous transfers
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 5;

/// Errors for a single image transfer
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Moves one image from a URL to a file
#[async_trait]
pub trait ImageTransfer: Send + Sync {
    /// Writes the image at `url` to `dest`, returning the number of bytes written
    ///
    /// `dest` must only exist afterwards if the transfer succeeded.
    async fn transfer(&self, url: &str, dest: &Path) -> Result<u64, DownloadError>;
}

/// Streams images over HTTP into a `.part` file, renamed on success
pub struct HttpTransfer {
    client: Client,
    politeness: Politeness,
}

impl HttpTransfer {
    pub fn new(client: Client, politeness: Politeness) -> Self {
        Self { client, politeness }
    }
}

#[async_trait]
impl ImageTransfer for HttpTransfer {
    async fn transfer(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        self.politeness.pause().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::Http {
                url: url.to_string(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let partial = partial_path(dest);
        let result = stream_to_file(response, url, &partial).await;

        match result {
            Ok(bytes) => {
                tokio::fs::rename(&partial, dest)
                    .await
                    .map_err(|e| DownloadError::io(dest, e))?;
                Ok(bytes)
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                Err(e)
            }
        }
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| DownloadError::Http {
            url: url.to_string(),
            source,
        })?;
        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| DownloadError::io(path, e))?;
    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Counts from one `download_all` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Files fetched by this call
    pub downloaded: usize,

    /// Records whose file was already on disk
    pub skipped: usize,

    /// Transfers that failed
    pub failed: usize,
}

/// Downloads photo records under a global concurrency cap
pub struct DownloadManager {
    transfer: Arc<dyn ImageTransfer>,
    output_dir: PathBuf,
    semaphore: Arc<Semaphore>,
}

impl DownloadManager {
    /// Creates a manager writing under `output_dir` with at most `max_concurrent` transfers in flight
    pub fn new(
        transfer: Arc<dyn ImageTransfer>,
        output_dir: impl Into<PathBuf>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            transfer,
            output_dir: output_dir.into(),
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Downloads every record whose file is not yet on disk
    ///
    /// Records sharing a local path are fetched once. Individual failures are
    /// logged and counted; they never abort the remaining transfers.
    ///
    /// # Returns
    ///
    /// A [`DownloadReport`]; `downloaded` is the number of new files.
    pub async fn download_all(&self, records: &[PhotoRecord]) -> DownloadReport {
        let mut report = DownloadReport::default();
        let mut targets = HashSet::new();
        let mut tasks = JoinSet::new();

        tracing::info!("Downloading {} photos", records.len());

        for record in records {
            let path = record.local_path(&self.output_dir);

            if !targets.insert(path.clone()) {
                continue;
            }

            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                tracing::debug!("Photo already exists: {}", path.display());
                report.skipped += 1;
                continue;
            }

            let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Download semaphore closed: {}", e);
                    break;
                }
            };

            let transfer = Arc::clone(&self.transfer);
            let url = record.image_url.clone();

            tasks.spawn(async move {
                let _permit = permit;

                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| DownloadError::io(parent, e))?;
                }

                let bytes = transfer.transfer(&url, &path).await?;
                Ok::<_, DownloadError>((path, bytes))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((path, bytes))) => {
                    tracing::info!("Downloaded: {} ({} bytes)", path.display(), bytes);
                    report.downloaded += 1;
                }
                Ok(Err(e)) => {
                    tracing::error!("Download failed: {}", e);
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!("Download task panicked: {}", e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Downloads finished: {} new, {} already present, {} failed",
            report.downloaded,
            report.skipped,
            report.failed
        );

        report
    }
}
