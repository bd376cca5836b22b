use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Ingest section exists (enforced by serde)
/// - Ingest URL is non-empty
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Ingest validation
    if config.ingest.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ingest.url cannot be empty".to_string(),
        ));
    }

    Ok(())
}
