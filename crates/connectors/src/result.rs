use model::records::Record;
use serde::Deserialize;
use serde_json::Value;

/// Tabular result returned by the execution platform.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultSet {
    pub rows: Vec<Record>,
}

impl ResultSet {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One-pass conversion into record mappings.
    pub fn into_records(self) -> impl Iterator<Item = Record> + Send {
        self.rows.into_iter()
    }

    /// Extracts `result.rows` from a raw results payload. Rows that are not
    /// JSON objects are dropped.
    pub fn from_results_payload(payload: &Value) -> Self {
        let rows = payload
            .pointer("/result/rows")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().filter_map(|row| row.as_object().cloned()).collect())
            .unwrap_or_default();
        Self { rows }
    }
}
