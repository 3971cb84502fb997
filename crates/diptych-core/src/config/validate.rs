//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.fetch_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.fetch_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_download_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_download_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "output.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.generation.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "generation.endpoint must not be empty".into(),
            ));
        }
        if self.generation.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "generation.timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_fetch_timeout() {
        let mut config = Config::default();
        config.limits.fetch_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_zero_download_limit() {
        let mut config = Config::default();
        config.limits.max_download_mb = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_download_mb"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_quality() {
        let mut config = Config::default();
        config.output.jpeg_quality = 0;
        assert!(config.validate().is_err());

        config.output.jpeg_quality = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jpeg_quality"));
    }

    #[test]
    fn test_validate_rejects_blank_endpoint() {
        let mut config = Config::default();
        config.generation.endpoint = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("generation.endpoint"));
    }
}
