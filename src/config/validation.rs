use crate::config::types::{
    Config, DownloadConfig, FetcherConfig, OutputConfig, ScrapeConfig, SiteConfig,
    MAX_PAGES_CEILING,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_scrape_config(&config.scrape)?;
    validate_download_config(&config.download)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.venue.trim().is_empty() {
        return Err(ConfigError::Validation("venue cannot be empty".to_string()));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min-delay-ms ({}) must not exceed max-delay-ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be at most 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > MAX_PAGES_CEILING {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and {}, got {}",
            MAX_PAGES_CEILING, config.max_pages
        )));
    }

    validate_concurrency("max-concurrent-sections", config.max_concurrent_sections)?;

    if config.max_sections == Some(0) {
        return Err(ConfigError::Validation(
            "max-sections must be at least 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    validate_concurrency("max-concurrent", config.max_concurrent)
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.metadata_file.is_empty() || config.summary_file.is_empty() {
        return Err(ConfigError::Validation(
            "metadata-file and summary-file cannot be empty".to_string(),
        ));
    }

    if config.metadata_file == config.summary_file {
        return Err(ConfigError::Validation(
            "metadata-file and summary-file must differ".to_string(),
        ));
    }

    Ok(())
}

fn validate_concurrency(name: &str, value: usize) -> Result<(), ConfigError> {
    if !(1..=100).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and 100, got {}",
            name, value
        )));
    }
    Ok(())
}
