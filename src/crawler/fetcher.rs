//! HTTP page fetcher
//!
//! This module handles all page requests for the crawler, including:
//! - Building the shared HTTP client with a browser-like header set
//! - Politeness delays before every attempt
//! - Retry with exponential backoff for transient failures
//! - Switching to a browser-based fallback after the first HTTP 403
//!
//! A page that cannot be fetched is logged and reported as `None`. Callers
//! treat that as "no content for this page", never as a reason to abort.

use crate::config::FetcherConfig;
use crate::crawler::politeness::Politeness;
use crate::ScrapeError;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// User agent sent unless the configuration overrides it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Anything that can turn a URL into page HTML
///
/// Implemented by [`PageFetcher`] and by browser-automation fallbacks.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the page body, or `None` if the page could not be retrieved
    async fn fetch_html(&self, url: &str) -> Option<String>;
}

/// Starts the heavier browser-based page source on demand
///
/// [`PageFetcher`] calls this at most once per run, the first time the site
/// answers 403, and reuses the returned source for every later page.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn PageSource>, ScrapeError>;
}

/// Builds the shared HTTP client
///
/// # Arguments
///
/// * `config` - Fetcher settings (timeout and optional user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Client with browser-like default headers
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Client::builder()
        .user_agent(user_agent)
        .default_headers(browser_headers())
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(std::time::Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

/// Outcome of a single HTTP attempt
#[derive(Debug)]
enum Attempt {
    /// 2xx with a readable body
    Body(String),

    /// 403: the site is blocking plain HTTP clients
    Forbidden,

    /// Network error, 429 or 5xx: worth retrying
    Transient(String),

    /// Any other status: retrying will not help
    Terminal(String),
}

/// Page fetcher with retry, politeness and a one-time browser fallback
///
/// The fallback decision lives in a single-assignment cell: the first 403
/// launches the browser (or records that none is available), and every later
/// call reads that decision without changing it.
pub struct PageFetcher {
    client: Client,
    politeness: Politeness,
    max_retries: u32,
    launcher: Option<Arc<dyn BrowserLauncher>>,
    browser: OnceCell<Option<Arc<dyn PageSource>>>,
}

impl PageFetcher {
    pub fn new(client: Client, politeness: Politeness, max_retries: u32) -> Self {
        Self {
            client,
            politeness,
            max_retries,
            launcher: None,
            browser: OnceCell::new(),
        }
    }

    /// Builds a fetcher and its client from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, ScrapeError> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            Politeness::from_config(config),
            config.max_retries,
        ))
    }

    /// Enables the browser fallback used after the first 403
    pub fn with_fallback(mut self, launcher: Arc<dyn BrowserLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Returns the shared HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Whether page requests now go through the browser fallback
    pub fn using_fallback(&self) -> bool {
        self.active_browser().is_some()
    }

    fn active_browser(&self) -> Option<Arc<dyn PageSource>> {
        self.browser.get().and_then(|browser| browser.clone())
    }

    /// Fetches a page over HTTP, retrying transient failures
    async fn fetch_over_http(&self, url: &str) -> Option<String> {
        for attempt in 0..=self.max_retries {
            self.politeness.pause().await;

            match self.attempt(url).await {
                Attempt::Body(body) => return Some(body),
                Attempt::Forbidden => {
                    tracing::warn!("Got 403 for {}", url);
                    return self.fetch_with_fallback(url).await;
                }
                Attempt::Terminal(reason) => {
                    tracing::warn!("Giving up on {}: {}", url, reason);
                    return None;
                }
                Attempt::Transient(reason) if attempt < self.max_retries => {
                    let wait = self.politeness.backoff(attempt);
                    tracing::warn!(
                        "Request for {} failed, retrying in {:?}: {}",
                        url,
                        wait,
                        reason
                    );
                    tokio::time::sleep(wait).await;
                }
                Attempt::Transient(reason) => {
                    tracing::error!(
                        "Failed to fetch {} after {} retries: {}",
                        url,
                        self.max_retries,
                        reason
                    );
                }
            }
        }

        None
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Attempt::Transient("request timeout".to_string()),
            Err(e) => return Attempt::Transient(e.to_string()),
        };

        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            return Attempt::Forbidden;
        }

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Attempt::Transient(format!("HTTP {}", status.as_u16()));
        }

        if !status.is_success() {
            return Attempt::Terminal(format!("HTTP {}", status.as_u16()));
        }

        match response.text().await {
            Ok(body) => Attempt::Body(body),
            Err(e) => Attempt::Transient(format!("failed to read body: {}", e)),
        }
    }

    /// Switches to the browser source (launching it on first use) and fetches through it
    async fn fetch_with_fallback(&self, url: &str) -> Option<String> {
        let Some(launcher) = &self.launcher else {
            tracing::warn!("No browser fallback configured, skipping {}", url);
            return None;
        };

        let browser = self
            .browser
            .get_or_init(|| async {
                tracing::info!("Switching to browser fallback for the rest of the run");
                match launcher.launch().await {
                    Ok(browser) => Some(browser),
                    Err(e) => {
                        tracing::error!("Failed to start browser fallback: {}", e);
                        None
                    }
                }
            })
            .await
            .clone()?;

        self.fetch_with_browser(browser.as_ref(), url).await
    }

    async fn fetch_with_browser(&self, browser: &dyn PageSource, url: &str) -> Option<String> {
        self.politeness.pause().await;
        let html = browser.fetch_html(url).await;
        if html.is_none() {
            tracing::error!("Browser fallback failed to fetch {}", url);
        }
        html
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_html(&self, url: &str) -> Option<String> {
        match self.active_browser() {
            Some(browser) => self.fetch_with_browser(browser.as_ref(), url).await,
            None => self.fetch_over_http(url).await,
        }
    }
}
