use chrono::{DateTime, Utc};
use model::config::WriteDisposition;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Outcome of loading one resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceLoadInfo {
    pub resource: String,
    pub rows_loaded: usize,
    pub write_disposition: WriteDisposition,
    pub new_cursor: Option<Value>,
}

/// Run report returned by `Pipeline::run`, printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub pipeline: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub resources: Vec<ResourceLoadInfo>,
}

impl LoadSummary {
    pub fn total_rows(&self) -> usize {
        self.resources.iter().map(|r| r.rows_loaded).sum()
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.finished_at - self.started_at;
        writeln!(
            f,
            "Pipeline {} loaded {} row(s) across {} resource(s) in {}.{:03}s",
            self.pipeline,
            self.total_rows(),
            self.resources.len(),
            elapsed.num_seconds(),
            elapsed.num_milliseconds().rem_euclid(1000),
        )?;
        for resource in &self.resources {
            write!(
                f,
                "  - {}: {} row(s), {}",
                resource.resource, resource.rows_loaded, resource.write_disposition
            )?;
            if let Some(cursor) = &resource.new_cursor {
                write!(f, ", cursor at {cursor}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
