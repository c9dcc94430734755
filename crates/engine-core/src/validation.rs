use crate::error::ConfigError;
use model::config::QueryConfig;

/// Checks a single query configuration for required fields and cross-field
/// consistency. Pure; must pass before any network access for that query.
pub fn validate_query_config(config: &QueryConfig) -> Result<(), ConfigError> {
    if config.query.trim().is_empty() {
        return Err(ConfigError::MissingQuery {
            name: config.name.clone(),
        });
    }

    // replication_key and starting_replication_value come as a pair
    let has_key = config.replication_key.is_some();
    let has_start = config.starting_replication_value.is_some();
    if has_key != has_start {
        return Err(ConfigError::InconsistentReplicationConfig {
            name: config.name.clone(),
        });
    }

    Ok(())
}
