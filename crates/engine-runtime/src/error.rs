use crate::{destination::DestinationError, state::StateError};
use engine_core::error::{ConfigError, ExtractError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to read the configuration file: {0}")]
    ConfigFileRead(#[from] std::io::Error),

    #[error("Failed to parse the configuration file as TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid query configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Cursor store error: {0}")]
    State(#[from] StateError),

    #[error("Destination error: {0}")]
    Destination(#[from] DestinationError),

    #[error("Missing API key: set 'api_key' in the config file or the DUNE_API_KEY environment variable")]
    MissingApiKey,
}
