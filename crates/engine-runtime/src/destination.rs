use async_trait::async_trait;
use model::{
    config::WriteDisposition,
    records::{Record, record_field},
};
use serde_json::Value;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DestinationError {
    #[error("I/O error writing to destination: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Static metadata of the resource being loaded.
#[derive(Debug, Clone)]
pub struct LoadTarget {
    pub resource: String,
    pub primary_key: Option<Vec<String>>,
    pub write_disposition: WriteDisposition,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadStats {
    pub rows_loaded: usize,
}

/// Boundary to whatever persists the extracted records. Staging, schema
/// management and merge semantics live behind this trait, not in the
/// extraction core.
#[async_trait]
pub trait Destination: Send + Sync {
    async fn load(
        &self,
        target: &LoadTarget,
        records: Vec<Record>,
    ) -> Result<LoadStats, DestinationError>;
}

/// Writes each resource to `<dir>/<resource>.jsonl`.
///
/// Append disposition appends lines; merge rewrites the file with incoming
/// rows upserted over existing ones by primary key.
pub struct JsonlDestination {
    dir: PathBuf,
}

impl JsonlDestination {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, resource: &str) -> PathBuf {
        self.dir.join(format!("{resource}.jsonl"))
    }

    fn merge_key(record: &Record, primary_key: &[String]) -> String {
        let parts: Vec<String> = primary_key
            .iter()
            .map(|col| {
                record_field(record, col)
                    .cloned()
                    .unwrap_or(Value::Null)
                    .to_string()
            })
            .collect();
        parts.join("\u{1f}")
    }

    fn read_existing(path: &Path) -> Result<Vec<Record>, DestinationError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(path)?;
        let mut rows = Vec::new();
        for line in contents.lines().filter(|line| !line.trim().is_empty()) {
            rows.push(serde_json::from_str(line)?);
        }
        Ok(rows)
    }

    fn write_all(path: &Path, rows: &[Record]) -> Result<(), DestinationError> {
        let mut out = String::new();
        for row in rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        std::fs::write(path, out)?;
        Ok(())
    }
}

#[async_trait]
impl Destination for JsonlDestination {
    async fn load(
        &self,
        target: &LoadTarget,
        records: Vec<Record>,
    ) -> Result<LoadStats, DestinationError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.table_path(&target.resource);
        let rows_loaded = records.len();

        match (target.write_disposition, target.primary_key.as_deref()) {
            (WriteDisposition::Merge, Some(pk)) if !pk.is_empty() => {
                let mut merged = Self::read_existing(&path)?;
                let mut index: HashMap<String, usize> = merged
                    .iter()
                    .enumerate()
                    .map(|(i, row)| (Self::merge_key(row, pk), i))
                    .collect();
                for record in records {
                    let key = Self::merge_key(&record, pk);
                    match index.get(&key) {
                        Some(&i) => merged[i] = record,
                        None => {
                            index.insert(key, merged.len());
                            merged.push(record);
                        }
                    }
                }
                Self::write_all(&path, &merged)?;
            }
            _ => {
                let mut existing = Self::read_existing(&path)?;
                existing.extend(records);
                Self::write_all(&path, &existing)?;
            }
        }

        info!("Loaded {rows_loaded} row(s) into {}", path.display());
        Ok(LoadStats { rows_loaded })
    }
}

/// Prints records as tab-prefixed JSON lines; useful for dry runs.
pub struct StdoutDestination;

#[async_trait]
impl Destination for StdoutDestination {
    async fn load(
        &self,
        target: &LoadTarget,
        records: Vec<Record>,
    ) -> Result<LoadStats, DestinationError> {
        let rows_loaded = records.len();
        for record in records {
            println!("{}\t{}", target.resource, serde_json::to_string(&record)?);
        }
        Ok(LoadStats { rows_loaded })
    }
}

/// In-memory destination for tests; merge semantics are the warehouse's
/// job, so it only appends.
#[derive(Default)]
pub struct MemoryDestination {
    tables: Mutex<HashMap<String, Vec<Record>>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, resource: &str) -> Vec<Record> {
        self.tables
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Destination for MemoryDestination {
    async fn load(
        &self,
        target: &LoadTarget,
        records: Vec<Record>,
    ) -> Result<LoadStats, DestinationError> {
        let rows_loaded = records.len();
        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(target.resource.clone())
            .or_default()
            .extend(records);
        Ok(LoadStats { rows_loaded })
    }
}
