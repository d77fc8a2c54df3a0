//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use imgdock_core::Config;

/// Validate critical configuration values
///
/// Runs `Config::validate` and warns about settings that are legal but
/// probably unintended.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if !config.is_production() && config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS allows all origins; set CORS_ORIGINS before deploying");
    }

    if config.max_batch_images > 100 {
        tracing::warn!(
            max_batch_images = config.max_batch_images,
            "MAX_BATCH_IMAGES is very high - a single request can hold many decoded images in memory"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_is_valid() {
        let config = Config::local("/tmp/imgdock", "http://localhost:4000/files");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_production_config_from_fields_is_valid() {
        let mut config = Config::local("/tmp/imgdock", "http://localhost:4000/files");
        config.environment = "production".to_string();
        config.cors_origins = vec!["https://admin.example.com".to_string()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_batch_limit_is_rejected() {
        let mut config = Config::local("/tmp/imgdock", "http://localhost:4000/files");
        config.max_batch_images = 0;
        assert!(validate_config(&config).is_err());
    }
}
