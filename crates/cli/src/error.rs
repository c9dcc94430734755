use engine_core::error::ConfigError;
use engine_runtime::{error::RuntimeError, state::StateError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to run the pipeline: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Invalid query configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Cursor store error: {0}")]
    State(#[from] StateError),
}
