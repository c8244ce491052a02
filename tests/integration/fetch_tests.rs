//! Page fetcher tests: retries, terminal failures and the 403 fallback

use crate::common::*;
use async_trait::async_trait;
use seatview::crawler::{BrowserLauncher, PageSource};
use seatview::ScrapeError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stand-in for a browser session; answers every URL itself
struct FakeBrowser {
    fetches: AtomicUsize,
}

#[async_trait]
impl PageSource for FakeBrowser {
    async fn fetch_html(&self, url: &str) -> Option<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Some(format!("<html><body>rendered {}</body></html>", url))
    }
}

struct FakeLauncher {
    launches: AtomicUsize,
    browser: Arc<FakeBrowser>,
}

impl FakeLauncher {
    fn new() -> Self {
        Self {
            launches: AtomicUsize::new(0),
            browser: Arc::new(FakeBrowser {
                fetches: AtomicUsize::new(0),
            }),
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Arc<dyn PageSource>, ScrapeError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let browser: Arc<dyn PageSource> = self.browser.clone();
        Ok(browser)
    }
}

struct BrokenLauncher {
    launches: AtomicUsize,
}

#[async_trait]
impl BrowserLauncher for BrokenLauncher {
    async fn launch(&self) -> Result<Arc<dyn PageSource>, ScrapeError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Err(ScrapeError::Browser("no browser installed".to_string()))
    }
}

#[tokio::test]
async fn test_retries_transient_errors_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html("<p>finally</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fast_fetcher(3);
    let body = fetcher.fetch_html(&format!("{}/flaky", server.uri())).await;

    assert_eq!(body.as_deref(), Some("<p>finally</p>"));
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(html("ok"))
        .mount(&server)
        .await;

    let fetcher = fast_fetcher(1);
    assert!(fetcher
        .fetch_html(&format!("{}/busy", server.uri()))
        .await
        .is_some());
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = fast_fetcher(2);
    assert!(fetcher
        .fetch_html(&format!("{}/down", server.uri()))
        .await
        .is_none());
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fast_fetcher(3);
    assert!(fetcher
        .fetch_html(&format!("{}/missing", server.uri()))
        .await
        .is_none());
}

#[tokio::test]
async fn test_forbidden_without_fallback_is_a_page_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fast_fetcher(3);

    assert!(fetcher.fetch_html(&format!("{}/a", server.uri())).await.is_none());
    assert!(!fetcher.using_fallback());

    // The next page still goes over HTTP
    assert!(fetcher.fetch_html(&format!("{}/b", server.uri())).await.is_none());
}

#[tokio::test]
async fn test_forbidden_switches_to_browser_for_rest_of_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/later"))
        .respond_with(html("plain http"))
        .expect(0)
        .mount(&server)
        .await;

    let launcher = Arc::new(FakeLauncher::new());
    let fetcher = fast_fetcher(3).with_fallback(launcher.clone());

    let first = fetcher
        .fetch_html(&format!("{}/blocked", server.uri()))
        .await
        .unwrap();
    let second = fetcher
        .fetch_html(&format!("{}/later", server.uri()))
        .await
        .unwrap();

    assert!(first.contains("rendered"));
    assert!(second.contains("/later"));
    assert!(fetcher.using_fallback());
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
    assert_eq!(launcher.browser.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_forbidden_launches_browser_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let launcher = Arc::new(FakeLauncher::new());
    let fetcher = fast_fetcher(0).with_fallback(launcher.clone());
    let urls: Vec<String> = (0..4).map(|i| format!("{}/p{}", server.uri(), i)).collect();

    let results = futures::future::join_all(urls.iter().map(|url| fetcher.fetch_html(url))).await;

    assert!(results.iter().all(Option::is_some));
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_browser_launch_is_not_repeated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let launcher = Arc::new(BrokenLauncher {
        launches: AtomicUsize::new(0),
    });
    let fetcher = fast_fetcher(0).with_fallback(launcher.clone());

    assert!(fetcher.fetch_html(&format!("{}/a", server.uri())).await.is_none());
    assert!(fetcher.fetch_html(&format!("{}/b", server.uri())).await.is_none());

    assert_eq!(launcher.launches.load(Ordering::SeqCst), 1);
    assert!(!fetcher.using_fallback());
}
