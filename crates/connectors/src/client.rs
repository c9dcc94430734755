use crate::{error::ClientError, result::ResultSet};
use async_trait::async_trait;
use model::query::QuerySpec;
use serde_json::{Map, Value};

/// Options forwarded to the execution platform for a single run.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionOptions {
    /// Force a fresh execution instead of reusing the platform's stored
    /// result.
    pub refresh: bool,
    /// Client-side result caching. Off by default: the cache layer
    /// intermittently fails with permission errors on shared hosts, so
    /// implementations currently ignore it.
    pub cache: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            refresh: true,
            cache: false,
        }
    }
}

/// Boundary to the hosted query-execution platform.
///
/// One call per extraction run; implementations own authentication,
/// transport, and timeouts. No retries happen behind this trait.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    async fn execute(
        &self,
        query: &QuerySpec,
        api_key: &str,
        options: &ExecutionOptions,
        parameters: &Map<String, Value>,
    ) -> Result<ResultSet, ClientError>;
}
