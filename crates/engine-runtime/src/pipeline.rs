use crate::{
    destination::{Destination, LoadTarget},
    error::RuntimeError,
    state::CursorStore,
    summary::{LoadSummary, ResourceLoadInfo},
};
use chrono::Utc;
use connectors::client::ExecutionClient;
use engine_core::resource::ExtractionUnit;
use std::sync::Arc;
use tracing::info;

/// Executes extraction units in order and persists their records and
/// cursors.
pub struct Pipeline {
    name: String,
    store: Arc<dyn CursorStore>,
    destination: Arc<dyn Destination>,
}

impl Pipeline {
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn CursorStore>,
        destination: Arc<dyn Destination>,
    ) -> Self {
        Self {
            name: name.into(),
            store,
            destination,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs every unit once. A persisted cursor takes precedence over the
    /// unit's initial one; after a successful load the cursor is advanced to
    /// the maximum observed replication value and saved. The first failing
    /// unit aborts the run; extraction errors are never swallowed here.
    pub async fn run(
        &self,
        units: &[ExtractionUnit],
        client: &dyn ExecutionClient,
    ) -> Result<LoadSummary, RuntimeError> {
        let started_at = Utc::now();
        let mut resources = Vec::with_capacity(units.len());

        for unit in units {
            let cursor = match self.store.load_cursor(&self.name, unit.name()).await? {
                Some(stored) => Some(stored),
                None => unit.initial_cursor(),
            };

            let records: Vec<_> = unit.run(client, cursor.as_ref()).await?.collect();
            let new_cursor = cursor.map(|c| c.advanced(&records));

            let target = LoadTarget {
                resource: unit.name().to_string(),
                primary_key: unit.primary_key().map(<[String]>::to_vec),
                write_disposition: unit.write_disposition(),
            };
            let stats = self.destination.load(&target, records).await?;

            if let Some(new_cursor) = &new_cursor {
                self.store
                    .save_cursor(&self.name, unit.name(), new_cursor)
                    .await?;
            }

            resources.push(ResourceLoadInfo {
                resource: target.resource,
                rows_loaded: stats.rows_loaded,
                write_disposition: target.write_disposition,
                new_cursor: new_cursor.map(|c| c.last_value),
            });
        }

        let summary = LoadSummary {
            pipeline: self.name.clone(),
            started_at,
            finished_at: Utc::now(),
            resources,
        };
        info!(
            "Pipeline {} finished: {} row(s) across {} resource(s)",
            self.name,
            summary.total_rows(),
            summary.resources.len()
        );
        Ok(summary)
    }
}
