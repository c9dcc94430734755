use crate::{
    client::{ExecutionClient, ExecutionOptions},
    error::ClientError,
    result::ResultSet,
};
use async_trait::async_trait;
use model::query::{QueryRef, QuerySpec};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://api.dune.com/api/v1";
const API_KEY_HEADER: &str = "X-Dune-API-Key";
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLL_ATTEMPTS: u32 = 300;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a polled execution stands.
#[derive(Debug, PartialEq, Eq)]
enum ExecutionState {
    Completed,
    Pending,
    Failed(String),
}

/// Classifies a `/status` payload. A missing or empty `state` field is a
/// broken response, not a reason to keep polling.
fn execution_state(payload: &Value) -> Result<ExecutionState, ClientError> {
    let state = payload.get("state").and_then(Value::as_str).unwrap_or_default();
    if state.is_empty() {
        return Err(ClientError::MalformedResponse(
            "missing execution state".to_string(),
        ));
    }
    match state {
        "QUERY_STATE_COMPLETED" => Ok(ExecutionState::Completed),
        "QUERY_STATE_FAILED" | "QUERY_STATE_CANCELLED" | "QUERY_STATE_EXPIRED" => {
            Ok(ExecutionState::Failed(state.to_string()))
        }
        _ => Ok(ExecutionState::Pending),
    }
}

/// HTTP client for the Dune Analytics execution API.
///
/// Executes hosted queries by ID; inline SQL is first registered as a
/// private query so it can be executed the same way. Polls the execution
/// until it reaches a terminal state; does not retry failures.
pub struct DuneClient {
    http: reqwest::Client,
    base_url: String,
}

impl DuneClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, url: &str, api_key: &str) -> Result<Value, ClientError> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<Value, ClientError> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    /// Registers inline SQL as a private query so it can be executed by ID.
    async fn create_query(&self, sql: &str, api_key: &str) -> Result<u64, ClientError> {
        let body = json!({
            "name": "adhoc",
            "query_sql": sql,
            "is_private": true,
        });
        let payload = self
            .post_json(&format!("{}/query", self.base_url), api_key, &body)
            .await?;
        payload
            .get("query_id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ClientError::MalformedResponse("missing query_id".to_string()))
    }

    async fn execute_query_id(
        &self,
        id: u64,
        api_key: &str,
        parameters: &Map<String, Value>,
    ) -> Result<ResultSet, ClientError> {
        let body = json!({ "query_parameters": Value::Object(parameters.clone()) });
        let payload = self
            .post_json(&format!("{}/query/{}/execute", self.base_url, id), api_key, &body)
            .await?;
        let execution_id = payload
            .get("execution_id")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::MalformedResponse("missing execution_id".to_string()))?
            .to_string();

        let mut completed = false;
        for attempt in 0..MAX_POLL_ATTEMPTS {
            let status = self
                .get_json(
                    &format!("{}/execution/{}/status", self.base_url, execution_id),
                    api_key,
                )
                .await?;
            match execution_state(&status)? {
                ExecutionState::Completed => {
                    completed = true;
                    break;
                }
                ExecutionState::Failed(state) => {
                    return Err(ClientError::ExecutionFailed(state));
                }
                ExecutionState::Pending => {
                    debug!("Execution {execution_id} still pending (attempt {attempt}), polling");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
        if !completed {
            return Err(ClientError::ExecutionTimedOut(MAX_POLL_ATTEMPTS));
        }

        let payload = self
            .get_json(
                &format!("{}/execution/{}/results", self.base_url, execution_id),
                api_key,
            )
            .await?;
        Ok(ResultSet::from_results_payload(&payload))
    }

    /// Latest stored result for a query, without triggering an execution.
    async fn latest_results(&self, id: u64, api_key: &str) -> Result<ResultSet, ClientError> {
        let payload = self
            .get_json(&format!("{}/query/{}/results", self.base_url, id), api_key)
            .await?;
        Ok(ResultSet::from_results_payload(&payload))
    }

    fn resolve_id(query_ref: &QueryRef) -> Result<u64, ClientError> {
        query_ref.query_id().ok_or_else(|| match query_ref {
            QueryRef::Id(id) => ClientError::InvalidQueryRef(id.to_string()),
            QueryRef::Url(url) => ClientError::InvalidQueryRef(url.clone()),
        })
    }
}

impl Default for DuneClient {
    fn default() -> Self {
        Self::new()
    }
}


#[async_trait]
impl ExecutionClient for DuneClient {
    async fn execute(
        &self,
        query: &QuerySpec,
        api_key: &str,
        options: &ExecutionOptions,
        parameters: &Map<String, Value>,
    ) -> Result<ResultSet, ClientError> {
        match query {
            QuerySpec::Sql(sql) => {
                // Inline SQL always runs fresh; there is no stored result to
                // reuse.
                let id = self.create_query(sql, api_key).await?;
                info!("Registered ad-hoc query {id}");
                self.execute_query_id(id, api_key, parameters).await
            }
            QuerySpec::Ref(query_ref) => {
                let id = Self::resolve_id(query_ref)?;
                if options.refresh {
                    self.execute_query_id(id, api_key, parameters).await
                } else {
                    self.latest_results(id, api_key).await
                }
            }
        }
    }
}
