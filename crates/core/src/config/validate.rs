use super::{
    types::{Config, FeedSourceKind},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - HTTP feeds have a URL and a non-zero timeout
/// - Preview directories are non-empty and end with '/'
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.feed.source == FeedSourceKind::Http {
        let has_url = config
            .feed
            .url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        if !has_url {
            return Err(ConfigError::ValidationError(
                "feed.url is required when feed.source = \"http\"".to_string(),
            ));
        }
    }

    if config.feed.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "feed.timeout_secs cannot be 0".to_string(),
        ));
    }

    for (name, dir) in [
        ("previews.alternate_dir", &config.previews.alternate_dir),
        ("previews.matching_dir", &config.previews.matching_dir),
    ] {
        if dir.is_empty() || !dir.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a non-empty directory ending with '/'",
                name
            )));
        }
    }

    Ok(())
}
