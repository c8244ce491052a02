//! Integration tests for Seatview
//!
//! These tests use wiremock to stand in for the photo site and tempfile
//! directories for output, exercising fetching, pagination, downloads and
//! whole runs end-to-end.

mod common;
mod fetch_tests;
mod scrape_tests;
