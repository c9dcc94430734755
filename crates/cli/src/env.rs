use crate::error::CliError;
use engine_runtime::{config::PipelineConfig, error::RuntimeError};

pub const API_KEY_VAR: &str = "DUNE_API_KEY";

/// API key from the environment, falling back to the config file.
pub fn resolve_api_key(config: &PipelineConfig) -> Result<String, CliError> {
    if let Ok(key) = std::env::var(API_KEY_VAR)
        && !key.trim().is_empty()
    {
        return Ok(key);
    }
    config
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::Runtime(RuntimeError::MissingApiKey))
}
