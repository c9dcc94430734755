use connectors::error::ClientError;
use thiserror::Error;

/// Configuration problems detected before any extraction attempt.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'query' param for {name} is not populated")]
    MissingQuery { name: String },

    #[error("both 'replication_key' and 'starting_replication_value' params must be set for {name}")]
    InconsistentReplicationConfig { name: String },
}

/// Failures surfaced while running one extraction unit.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("query execution failed for {name}: {source}")]
    QueryExecution {
        name: String,
        #[source]
        source: ClientError,
    },
}
