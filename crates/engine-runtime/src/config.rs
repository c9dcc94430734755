use crate::error::RuntimeError;
use model::config::QueryConfig;
use serde::Deserialize;
use std::path::Path;

/// Pipeline configuration file.
///
/// `[queries.<name>]` tables keep their declaration order so every run
/// enumerates resources in the same order the file declares them.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_pipeline_name")]
    pub pipeline_name: String,

    /// Usually left out of the file and supplied via the environment.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub queries: toml::Table,
}

fn default_pipeline_name() -> String {
    "dune_source".to_string()
}

impl PipelineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, RuntimeError> {
        Ok(toml::from_str(contents)?)
    }

    /// Query configurations in declaration order. Names stay in the map
    /// keys; the source builder injects them before validation.
    pub fn query_configs(&self) -> Result<Vec<(String, QueryConfig)>, RuntimeError> {
        let mut configs = Vec::with_capacity(self.queries.len());
        for (name, value) in &self.queries {
            let config: QueryConfig = value.clone().try_into()?;
            configs.push((name.clone(), config));
        }
        Ok(configs)
    }
}
