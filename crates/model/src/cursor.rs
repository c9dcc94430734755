use crate::{
    records::{Record, record_field},
    value::cmp_json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Incremental replication state for one resource.
///
/// Owned by the runtime: extraction only reads `last_value`, never writes
/// it. The next value is derived from the maximum observed replication field
/// across the records a run yielded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationCursor {
    pub cursor_path: String,
    pub last_value: Value,
}

impl ReplicationCursor {
    pub fn new(cursor_path: impl Into<String>, last_value: Value) -> Self {
        Self {
            cursor_path: cursor_path.into(),
            last_value,
        }
    }

    /// Cursor advanced past `records`: the largest replication value seen,
    /// never smaller than the current `last_value`. Records without the
    /// field (or with a null value) are ignored.
    pub fn advanced(&self, records: &[Record]) -> Self {
        let mut last_value = self.last_value.clone();
        for record in records {
            if let Some(observed) = record_field(record, &self.cursor_path)
                && !observed.is_null()
                && cmp_json(observed, &last_value) == Ordering::Greater
            {
                last_value = observed.clone();
            }
        }
        Self {
            cursor_path: self.cursor_path.clone(),
            last_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(field: &str, value: Value) -> Record {
        let mut r = Record::new();
        r.insert(field.to_string(), value);
        r
    }

    #[test]
    fn advances_to_max_observed_value() {
        let cursor = ReplicationCursor::new("date", json!("2025-01-01"));
        let records = vec![
            record("date", json!("2025-01-03")),
            record("date", json!("2025-01-02")),
        ];
        assert_eq!(cursor.advanced(&records).last_value, json!("2025-01-03"));
    }

    #[test]
    fn never_moves_backwards() {
        let cursor = ReplicationCursor::new("ts", json!(100));
        let records = vec![record("ts", json!(42))];
        assert_eq!(cursor.advanced(&records).last_value, json!(100));
    }

    #[test]
    fn ignores_missing_and_null_fields() {
        let cursor = ReplicationCursor::new("ts", json!(5));
        let records = vec![record("other", json!(999)), record("ts", Value::Null)];
        assert_eq!(cursor.advanced(&records).last_value, json!(5));
    }

    #[test]
    fn survives_json_round_trip() {
        let cursor = ReplicationCursor::new("date", json!("2025-01-01"));
        let bytes = serde_json::to_vec(&cursor).unwrap();
        let restored: ReplicationCursor = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored, cursor);
    }
}
