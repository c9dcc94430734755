use crate::{error::ConfigError, resource::ExtractionUnit, validation::validate_query_config};
use model::config::QueryConfig;
use tracing::info;

/// Builds the full set of extraction units from the configured query map.
///
/// Entries are processed in declaration order, with each map key injected as
/// the unit's name. The first invalid configuration aborts the whole build,
/// so a run never starts with a partial resource set.
pub fn build_source(
    queries: impl IntoIterator<Item = (String, QueryConfig)>,
    api_key: &str,
) -> Result<Vec<ExtractionUnit>, ConfigError> {
    let mut units = Vec::new();
    for (name, mut config) in queries {
        config.name = name;
        validate_query_config(&config)?;
        units.push(ExtractionUnit::build(config, api_key));
    }
    info!("Built {} extraction unit(s)", units.len());
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(query: &str) -> QueryConfig {
        QueryConfig {
            name: String::new(),
            query: query.to_string(),
            query_params: None,
            primary_key: None,
            write_disposition: None,
            replication_key: None,
            starting_replication_value: None,
        }
    }

    #[test]
    fn builds_units_in_declaration_order() {
        let queries = vec![
            ("dex_volume".to_string(), config("4388")),
            ("y2k_price_data".to_string(), config("4749625")),
            ("custom_sql".to_string(), config("SELECT 1")),
        ];
        let units = build_source(queries, "key").unwrap();
        let names: Vec<_> = units.iter().map(|u| u.name().to_string()).collect();
        assert_eq!(names, ["dex_volume", "y2k_price_data", "custom_sql"]);
    }

    #[test]
    fn injects_map_key_as_name() {
        let queries = vec![("renamed".to_string(), config("4388"))];
        let units = build_source(queries, "key").unwrap();
        assert_eq!(units[0].name(), "renamed");
    }

    #[test]
    fn first_invalid_entry_aborts_the_build() {
        let mut broken = config("4388");
        broken.replication_key = Some("date".to_string());

        let queries = vec![
            ("ok".to_string(), config("4388")),
            ("broken".to_string(), broken),
            ("never_built".to_string(), config("4749625")),
        ];
        let err = build_source(queries, "key").unwrap_err();
        assert!(
            matches!(err, ConfigError::InconsistentReplicationConfig { name } if name == "broken")
        );
    }

    #[test]
    fn missing_query_aborts_the_build() {
        let queries = vec![("empty".to_string(), config(""))];
        let err = build_source(queries, "key").unwrap_err();
        assert!(matches!(err, ConfigError::MissingQuery { name } if name == "empty"));
    }

    #[test]
    fn replicated_unit_gets_its_initial_cursor() {
        let mut c = config("4778954");
        c.replication_key = Some("date".to_string());
        c.starting_replication_value = Some(json!("2025-01-01"));

        let units = build_source(vec![("inc".to_string(), c)], "key").unwrap();
        let cursor = units[0].initial_cursor().unwrap();
        assert_eq!(cursor.cursor_path, "date");
        assert_eq!(cursor.last_value, json!("2025-01-01"));
    }
}
