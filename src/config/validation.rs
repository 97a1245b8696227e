use crate::config::types::{AppEntry, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_apps(&config.apps)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.feed_base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid feed-base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "feed-base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.country.len() != 2 || !config.country.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(ConfigError::Validation(format!(
            "country must be a two-letter lowercase code, got '{}'",
            config.country
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "file-prefix must not contain path separators, got '{}'",
            config.file_prefix
        )));
    }

    Ok(())
}

/// Validates the app catalog: unique non-empty names, positive ids, parseable URLs
fn validate_apps(apps: &[AppEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for app in apps {
        if app.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "app name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(app.name.to_ascii_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate app name '{}'",
                app.name
            )));
        }

        if app.id == 0 {
            return Err(ConfigError::Validation(format!(
                "app '{}' must have a non-zero id",
                app.name
            )));
        }

        Url::parse(&app.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid url for app '{}': {}", app.name, e))
        })?;
    }

    Ok(())
}
