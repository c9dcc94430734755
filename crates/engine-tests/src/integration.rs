#[cfg(test)]
mod tests {
    use crate::utils::{MockExecutionClient, record};
    use connectors::result::ResultSet;
    use engine_core::source::build_source;
    use engine_runtime::{
        config::PipelineConfig,
        destination::MemoryDestination,
        pipeline::Pipeline,
        state::{CursorStore, SledCursorStore},
    };
    use model::{
        config::WriteDisposition,
        query::{QueryRef, QuerySpec},
    };
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    const CONFIG: &str = r#"
pipeline_name = "dune_source"

[queries.dex_volume]
query = "https://dune.com/queries/4388"
primary_key = ["project"]
query_params = '{}'

[queries.custom_sql]
query = "SELECT * FROM prices.day WHERE {replication_key} > '{cursor_value}'"
replication_key = "ts"
starting_replication_value = "2024-11-01"
"#;

    fn pipeline(state_dir: &std::path::Path, dest: Arc<MemoryDestination>) -> Pipeline {
        let store = Arc::new(SledCursorStore::open(state_dir).unwrap());
        Pipeline::new("dune_source", store, dest)
    }

    // Scenario: full pipeline over a scripted client.
    // Expected outcome: both resources load in declaration order and the
    // summary reports their row counts.
    #[traced_test]
    #[tokio::test]
    async fn runs_all_configured_resources() {
        let config = PipelineConfig::from_toml_str(CONFIG).unwrap();
        let units = build_source(config.query_configs().unwrap(), "test-key").unwrap();
        assert_eq!(units.len(), 2);

        let client = MockExecutionClient::scripted(vec![
            ResultSet::new(vec![
                record(&[("project", json!("uniswap")), ("volume", json!(1.5))]),
                record(&[("project", json!("curve")), ("volume", json!(0.5))]),
            ]),
            ResultSet::new(vec![record(&[("ts", json!("2024-11-02"))])]),
        ]);

        let dir = tempdir().unwrap();
        let dest = Arc::new(MemoryDestination::new());
        let summary = pipeline(dir.path(), dest.clone())
            .run(&units, &client)
            .await
            .unwrap();

        assert_eq!(summary.total_rows(), 3);
        assert_eq!(summary.resources[0].resource, "dex_volume");
        assert_eq!(summary.resources[0].rows_loaded, 2);
        assert_eq!(summary.resources[0].write_disposition, WriteDisposition::Merge);
        assert_eq!(summary.resources[1].resource, "custom_sql");
        assert_eq!(dest.rows("dex_volume").len(), 2);

        // both calls ran fresh and uncached, with the configured credential
        for call in client.calls() {
            assert!(call.options.refresh);
            assert!(!call.options.cache);
            assert_eq!(call.api_key, "test-key");
        }
    }

    // Scenario: two consecutive runs of an incremental SQL resource.
    // Expected outcome: the second run renders the advanced cursor value,
    // not the starting one, and the store holds the new cursor.
    #[traced_test]
    #[tokio::test]
    async fn cursor_advances_between_runs() {
        let config = PipelineConfig::from_toml_str(CONFIG).unwrap();
        let units = build_source(config.query_configs().unwrap(), "test-key").unwrap();

        let dir = tempdir().unwrap();
        let store = Arc::new(SledCursorStore::open(dir.path()).unwrap());
        let dest = Arc::new(MemoryDestination::new());
        let pipeline = Pipeline::new("dune_source", store.clone(), dest);

        let first = MockExecutionClient::scripted(vec![
            ResultSet::default(),
            ResultSet::new(vec![
                record(&[("ts", json!("2024-12-01"))]),
                record(&[("ts", json!("2024-11-15"))]),
            ]),
        ]);
        pipeline.run(&units, &first).await.unwrap();

        let saved = store
            .load_cursor("dune_source", "custom_sql")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.last_value, json!("2024-12-01"));

        let second = MockExecutionClient::scripted(vec![ResultSet::default(), ResultSet::default()]);
        pipeline.run(&units, &second).await.unwrap();

        let calls = second.calls();
        let QuerySpec::Sql(sql) = &calls[1].query else {
            panic!("expected SQL query");
        };
        assert!(sql.contains("WHERE ts > '2024-12-01'"));
        assert!(!sql.contains("{cursor_value}"));
    }

    // Scenario: incremental resource addressed by URL instead of SQL.
    // Expected outcome: the cursor value travels in the parameter mapping.
    #[traced_test]
    #[tokio::test]
    async fn reference_query_cursor_travels_in_params() {
        let toml = r#"
[queries.dex_volume_incremental]
query = "https://dune.com/queries/4778954"
primary_key = ["project", "date"]
replication_key = "date"
starting_replication_value = "2025-01-01"
"#;
        let config = PipelineConfig::from_toml_str(toml).unwrap();
        let units = build_source(config.query_configs().unwrap(), "test-key").unwrap();

        let client = MockExecutionClient::single(vec![record(&[
            ("project", json!("uniswap")),
            ("date", json!("2025-02-01")),
        ])]);

        let dir = tempdir().unwrap();
        let dest = Arc::new(MemoryDestination::new());
        let summary = pipeline(dir.path(), dest)
            .run(&units, &client)
            .await
            .unwrap();

        let calls = client.calls();
        assert!(matches!(&calls[0].query, QuerySpec::Ref(QueryRef::Url(_))));
        assert_eq!(calls[0].parameters["date"], json!("2025-01-01"));
        assert_eq!(summary.resources[0].new_cursor, Some(json!("2025-02-01")));
    }

    // Scenario: a stale parameter string in an otherwise valid config.
    // Expected outcome: the run proceeds with empty parameters and a warning
    // instead of failing.
    #[traced_test]
    #[tokio::test]
    async fn malformed_params_degrade_to_empty() {
        let toml = r#"
[queries.dex_volume]
query = "https://x/4388"
primary_key = ["project"]
query_params = '{not valid json'
"#;
        let config = PipelineConfig::from_toml_str(toml).unwrap();
        let units = build_source(config.query_configs().unwrap(), "test-key").unwrap();

        let client = MockExecutionClient::single(vec![]);
        let dir = tempdir().unwrap();
        let dest = Arc::new(MemoryDestination::new());
        pipeline(dir.path(), dest).run(&units, &client).await.unwrap();

        assert!(client.calls()[0].parameters.is_empty());
        assert!(logs_contain("failed to parse query_params for dex_volume"));
    }
}
