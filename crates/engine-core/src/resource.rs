use crate::{
    error::ExtractError, params::normalize_query_params, template::render_incremental_sql,
};
use connectors::client::{ExecutionClient, ExecutionOptions};
use model::{
    config::{QueryConfig, WriteDisposition},
    cursor::ReplicationCursor,
    query::QuerySpec,
    records::Record,
};
use tracing::info;

/// Records yielded by one execution: lazy, finite, one pass.
pub type RecordStream = Box<dyn Iterator<Item = Record> + Send>;

/// A named, independently executable extraction task.
///
/// Static metadata (name, primary key, write disposition) is fixed when the
/// unit is built and never changes across executions. The unit holds no
/// mutable state: the cursor is owned by the caller and only read here.
#[derive(Debug)]
pub struct ExtractionUnit {
    config: QueryConfig,
    api_key: String,
    write_disposition: WriteDisposition,
}

impl ExtractionUnit {
    /// Builds the unit for a validated configuration.
    pub fn build(config: QueryConfig, api_key: &str) -> Self {
        let write_disposition = config.write_strategy();
        Self {
            config,
            api_key: api_key.to_string(),
            write_disposition,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn primary_key(&self) -> Option<&[String]> {
        self.config.primary_key.as_deref()
    }

    pub fn write_disposition(&self) -> WriteDisposition {
        self.write_disposition
    }

    pub fn is_incremental(&self) -> bool {
        self.config.is_incremental()
    }

    /// First-run cursor derived from the replication settings, if any.
    pub fn initial_cursor(&self) -> Option<ReplicationCursor> {
        match (
            &self.config.replication_key,
            &self.config.starting_replication_value,
        ) {
            (Some(key), Some(start)) => Some(ReplicationCursor::new(key.clone(), start.clone())),
            _ => None,
        }
    }

    /// Executes the query once and yields its records.
    ///
    /// With a cursor the run is incremental: a SQL query gets the
    /// replication key and cursor value rendered into its template, an
    /// opaque reference gets the cursor value injected into its parameter
    /// mapping. Without one the full result is fetched. Execution errors
    /// propagate untouched; retries belong to the caller.
    pub async fn run(
        &self,
        client: &dyn ExecutionClient,
        cursor: Option<&ReplicationCursor>,
    ) -> Result<RecordStream, ExtractError> {
        let name = self.name();
        info!("Extracting data for {name}");

        let mut params = normalize_query_params(self.config.query_params.as_ref(), name);
        let mut spec = QuerySpec::parse(&self.config.query);

        if let Some(cursor) = cursor {
            info!("Incrementally loading data for {name}");
            match &spec {
                QuerySpec::Sql(sql) => {
                    spec = QuerySpec::Sql(render_incremental_sql(
                        sql,
                        &cursor.cursor_path,
                        &cursor.last_value,
                    ));
                }
                QuerySpec::Ref(_) => {
                    params.insert(cursor.cursor_path.clone(), cursor.last_value.clone());
                }
            }
        } else {
            info!("No incremental loading config for {name}, fetching all data.");
        }

        // cache stays off: the execution client's cache intermittently fails
        // with permission errors on shared hosts
        let options = ExecutionOptions {
            refresh: true,
            cache: false,
        };
        let result = client
            .execute(&spec, &self.api_key, &options, &params)
            .await
            .map_err(|source| ExtractError::QueryExecution {
                name: name.to_string(),
                source,
            })?;

        info!("Finished extracting data for {name}, {} row(s)", result.len());
        if self.write_disposition == WriteDisposition::Append {
            info!("Records for {name} will be appended to the target table.");
        }
        Ok(Box::new(result.into_records()))
    }
}
