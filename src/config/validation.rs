use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates a crawl seed URL
///
/// The seed must be an absolute http(s) URL with a host, since the host is
/// what scopes the whole crawl.
pub fn validate_seed_url(seed: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https, got {}",
            seed,
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(url)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates request header configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user-agents must contain at least one identity".to_string(),
        ));
    }

    if let Some(position) = config.user_agents.iter().position(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "user-agents entry {} is empty",
            position
        )));
    }

    if config.sitemap_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "sitemap-timeout-secs must be >= 1, got {}",
            config.sitemap_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results-path cannot be empty".to_string(),
        ));
    }

    if config.sitemap_dir.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap-dir cannot be empty".to_string(),
        ));
    }

    if config.sitemap_chunk_size < 1 {
        return Err(ConfigError::Validation(format!(
            "sitemap-chunk-size must be >= 1, got {}",
            config.sitemap_chunk_size
        )));
    }

    Ok(())
}
