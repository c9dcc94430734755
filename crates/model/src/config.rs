use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Load strategy for a resource's target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteDisposition {
    /// Records are appended as-is, never deduplicated.
    Append,
    /// Records are upserted by primary key.
    Merge,
}

impl fmt::Display for WriteDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteDisposition::Append => write!(f, "append"),
            WriteDisposition::Merge => write!(f, "merge"),
        }
    }
}

/// Query parameters as they appear in configuration: either an inline
/// mapping or a JSON-encoded string that is parsed at execution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParams {
    Map(Map<String, Value>),
    Raw(String),
}

/// One configured query, keyed by name in the pipeline configuration.
///
/// `name` is not part of the configuration table itself; the source builder
/// injects the map key before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub name: String,

    /// Raw SQL template, numeric query ID, or query URL.
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub query_params: Option<QueryParams>,

    #[serde(default)]
    pub primary_key: Option<Vec<String>>,

    #[serde(default)]
    pub write_disposition: Option<WriteDisposition>,

    /// Field used as the incremental cursor. Requires
    /// `starting_replication_value` and vice versa.
    #[serde(default)]
    pub replication_key: Option<String>,

    #[serde(default)]
    pub starting_replication_value: Option<Value>,
}

impl QueryConfig {
    /// Resolved load strategy. Without a primary key records can never be
    /// deduplicated, so any configured disposition is overridden to append;
    /// with one, merge is the default.
    pub fn write_strategy(&self) -> WriteDisposition {
        match self.primary_key.as_deref() {
            None | Some([]) => WriteDisposition::Append,
            Some(_) => self.write_disposition.unwrap_or(WriteDisposition::Merge),
        }
    }

    pub fn is_incremental(&self) -> bool {
        self.replication_key.is_some()
    }
}
