use model::config::QueryParams;
use serde_json::{Map, Value};
use tracing::warn;

/// Normalizes configured query parameters into a plain mapping.
///
/// A JSON-encoded string is parsed in place. A string that fails to parse
/// (or parses to a non-object) degrades to an empty mapping with a warning,
/// so extraction continues.
pub fn normalize_query_params(params: Option<&QueryParams>, resource: &str) -> Map<String, Value> {
    match params {
        None => Map::new(),
        Some(QueryParams::Map(map)) => map.clone(),
        Some(QueryParams::Raw(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!(
                    "query_params for {resource} is not a JSON object ({other}), using empty parameters"
                );
                Map::new()
            }
            Err(err) => {
                warn!("failed to parse query_params for {resource}: {err}, using empty parameters");
                Map::new()
            }
        },
    }
}
