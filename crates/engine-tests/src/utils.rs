use async_trait::async_trait;
use connectors::{
    client::{ExecutionClient, ExecutionOptions},
    error::ClientError,
    result::ResultSet,
};
use model::{query::QuerySpec, records::Record};
use serde_json::{Map, Value};
use std::{collections::VecDeque, sync::Mutex};

/// One observed call to the mock execution client.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub query: QuerySpec,
    pub api_key: String,
    pub options: ExecutionOptions,
    pub parameters: Map<String, Value>,
}

/// Scripted execution client: pops one canned result per call and records
/// everything it was asked for. Runs out of script -> empty result.
#[derive(Default)]
pub struct MockExecutionClient {
    responses: Mutex<VecDeque<ResultSet>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockExecutionClient {
    pub fn scripted(responses: Vec<ResultSet>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn single(rows: Vec<Record>) -> Self {
        Self::scripted(vec![ResultSet::new(rows)])
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutionClient for MockExecutionClient {
    async fn execute(
        &self,
        query: &QuerySpec,
        api_key: &str,
        options: &ExecutionOptions,
        parameters: &Map<String, Value>,
    ) -> Result<ResultSet, ClientError> {
        self.calls.lock().unwrap().push(RecordedCall {
            query: query.clone(),
            api_key: api_key.to_string(),
            options: *options,
            parameters: parameters.clone(),
        });
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

/// Builds a record from field/value pairs.
pub fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
