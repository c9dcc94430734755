use serde_json::{Map, Value};

/// One extracted row, keyed by column name.
pub type Record = Map<String, Value>;

/// Field lookup with a case-insensitive fallback; result-set column casing
/// is not guaranteed to match the configured field name.
pub fn record_field<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).or_else(|| {
        record
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    })
}
