use super::{types::Config, ConfigError};

/// Validate configuration
///
/// Rejects values that would make the service unusable rather than merely
/// unusual: a zero port, a zero research timeout or token budget, an empty
/// platform list, zero concurrency, and a zero schedule interval when the
/// scheduler is enabled.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.research.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "research.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.research.max_tokens == 0 {
        return Err(ConfigError::ValidationError(
            "research.max_tokens must be greater than 0".to_string(),
        ));
    }

    if config.research.platforms.iter().all(|p| p.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "research.platforms must name at least one platform".to_string(),
        ));
    }

    if config.collection.max_concurrent_genres == 0 {
        return Err(ConfigError::ValidationError(
            "collection.max_concurrent_genres must be at least 1".to_string(),
        ));
    }

    if config.collection.schedule_enabled && config.collection.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "collection.interval_secs must be greater than 0 when scheduling is enabled"
                .to_string(),
        ));
    }

    Ok(())
}
