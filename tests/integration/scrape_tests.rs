//! Whole-run tests against a mock photo site

use crate::common::*;
use seatview::crawler::{run_scrape, Coordinator};
use seatview::output::RunOutcome;
use seatview::storage::{JsonStore, MetadataStore};
use seatview::ScrapeError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_images(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/images/\d+\.jpg$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"\xFF\xD8\xFFfake-jpeg".to_vec())
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

/// Three sections with two photos each, rows and seats in the URLs
async fn mount_three_sections(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(index_path()))
        .respond_with(html(index_page(&["101", "102", "103"])))
        .mount(server)
        .await;

    for section in ["101", "102", "103"] {
        let body = format!(
            "<html><body>{}{}</body></html>",
            photo_anchor(&format!("{}1", section), section, "A", Some("1")),
            photo_anchor(&format!("{}2", section), section, "B", None),
        );
        Mock::given(method("GET"))
            .and(path(section_path(section)))
            .respond_with(html(body))
            .mount(server)
            .await;
    }
}

fn files_under(dir: &Path) -> usize {
    let mut count = 0;
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        if entry.file_type().unwrap().is_dir() {
            count += files_under(&entry.path());
        } else {
            count += 1;
        }
    }
    count
}

#[tokio::test]
async fn test_full_run_three_sections() {
    let server = MockServer::start().await;
    mount_three_sections(&server).await;
    mount_images(&server, 6).await;

    let output = TempDir::new().unwrap();
    let config = test_config(&server.uri(), output.path());

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.sections_found, 3);
    assert_eq!(report.photos_found, 6);
    assert_eq!(report.photos_downloaded, 6);
    assert_eq!(report.downloads_failed, 0);

    let raw = fs::read_to_string(output.path().join("metadata.json")).unwrap();
    let metadata: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(metadata["total_photos"], 6);
    assert_eq!(metadata["sections"], 3);
    assert_eq!(metadata["venue"], VENUE);

    for section in ["101", "102", "103"] {
        assert_eq!(files_under(&output.path().join(format!("section_{}", section))), 2);
    }
    assert!(output
        .path()
        .join("section_101/row_A/section_101_row_A_seat_1_1011.jpg")
        .exists());
    assert!(output
        .path()
        .join("section_103/row_B/section_103_row_B_1032.jpg")
        .exists());
}

#[tokio::test]
async fn test_records_carry_location_and_full_resolution_url() {
    let server = MockServer::start().await;
    mount_three_sections(&server).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path());
    config.download.enabled = false;

    Coordinator::new(config.clone()).unwrap().run().await.unwrap();

    let metadata = JsonStore::from_config(&config.output).load().unwrap();
    let first = &metadata.photos[0];
    assert_eq!(first.photo_id, "1011");
    assert_eq!(first.section, "101");
    assert_eq!(first.row.as_deref(), Some("A"));
    assert_eq!(first.seat.as_deref(), Some("1"));
    assert_eq!(first.image_url, format!("{}/images/1011.jpg", server.uri()));
    assert_eq!(metadata.photos[1].seat, None);

    let summary = JsonStore::from_config(&config.output).load_summary().unwrap();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary["102"].rows["A"][0].photo_id, "1021");
    assert_eq!(summary["102"].rows["B"][0].seat, None);
}

#[tokio::test]
async fn test_section_limit_still_records_all_discovered_sections() {
    let server = MockServer::start().await;
    mount_three_sections(&server).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path());
    config.scrape.max_sections = Some(1);
    config.download.enabled = false;

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.sections_found, 3);
    assert_eq!(report.sections_scraped, 1);

    let raw = fs::read_to_string(output.path().join("metadata.json")).unwrap();
    let metadata: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(metadata["sections"], 3);
    assert_eq!(metadata["total_photos"], 2);

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert!(!requested.contains(&section_path("102")));
    assert!(!requested.contains(&section_path("103")));
}

#[tokio::test]
async fn test_second_run_downloads_nothing_new() {
    let server = MockServer::start().await;
    mount_three_sections(&server).await;
    // Six images in total across both runs
    mount_images(&server, 6).await;

    let output = TempDir::new().unwrap();
    let config = test_config(&server.uri(), output.path());

    let first = Coordinator::new(config.clone()).unwrap().run().await.unwrap();
    let second = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(first.photos_downloaded, 6);
    assert_eq!(second.photos_downloaded, 0);
    assert_eq!(second.photos_skipped, 6);
    assert_eq!(second.photos_found, first.photos_found);
}

#[tokio::test]
async fn test_no_sections_ends_run_early() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(index_path()))
        .respond_with(html("<html><body><p>Venue not found</p></body></html>"))
        .expect(1)
        .mount(&server)
        .await;
    mount_images(&server, 0).await;

    let output = TempDir::new().unwrap();
    let config = test_config(&server.uri(), output.path());

    let report = run_scrape(config).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::NoSections);
    assert_eq!(report.photos_found, 0);
    assert!(!output.path().join("metadata.json").exists());
}

#[tokio::test]
async fn test_run_scrape_reports_bad_output_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(index_page(&["101"])))
        .expect(0)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let occupied = output.path().join("not-a-dir");
    fs::write(&occupied, "x").unwrap();
    let config = test_config(&server.uri(), &occupied);

    let result = run_scrape(config).await;

    assert!(matches!(result, Err(ScrapeError::OutputDir { .. })));
}

#[tokio::test]
async fn test_failing_section_does_not_abort_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(index_path()))
        .respond_with(html(index_page(&["101", "102"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(section_path("101")))
        .respond_with(html(photo_anchor("5", "101", "C", Some("7"))))
        .mount(&server)
        .await;
    // First attempt plus two retries
    Mock::given(method("GET"))
        .and(path(section_path("102")))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path());
    config.download.enabled = false;

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.sections_scraped, 2);
    assert_eq!(report.photos_found, 1);
}

#[tokio::test]
async fn test_pagination_stops_at_first_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(index_path()))
        .respond_with(html(index_page(&["9"])))
        .mount(&server)
        .await;

    for (page, id) in [(None, "1"), (Some(2), "2")] {
        Mock::given(method("GET"))
            .and(path(section_path("9")))
            .and(PageParam(page))
            .respond_with(html(format!("{}{}", photo_anchor(id, "9", "A", None), next_link())))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(section_path("9")))
        .and(PageParam(Some(3)))
        .respond_with(html(format!("<p>No photos yet</p>{}", next_link())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(section_path("9")))
        .and(PageParam(Some(4)))
        .respond_with(html(photo_anchor("4", "9", "A", None)))
        .expect(0)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path());
    config.download.enabled = false;

    let report = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(report.photos_found, 2);
}

#[tokio::test]
async fn test_pagination_stops_without_next_control() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(index_path()))
        .respond_with(html(index_page(&["9"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(section_path("9")))
        .and(PageParam(None))
        .respond_with(html(photo_anchor("1", "9", "A", None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(section_path("9")))
        .and(PageParam(Some(2)))
        .respond_with(html(photo_anchor("2", "9", "A", None)))
        .expect(0)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path());
    config.download.enabled = false;

    let report = Coordinator::new(config).unwrap().run().await.unwrap();
    assert_eq!(report.photos_found, 1);
}

#[tokio::test]
async fn test_pagination_never_exceeds_fifty_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(index_path()))
        .respond_with(html(index_page(&["9"])))
        .mount(&server)
        .await;
    // Every page claims there is another one
    Mock::given(method("GET"))
        .and(path(section_path("9")))
        .respond_with(html(format!(
            "{}{}",
            photo_anchor("1", "9", "A", None),
            next_link()
        )))
        .expect(50)
        .mount(&server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path());
    config.download.enabled = false;

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    // Cross-page duplicates are kept unless dedupe is enabled
    assert_eq!(report.photos_found, 50);
}
