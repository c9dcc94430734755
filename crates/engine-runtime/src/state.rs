use async_trait::async_trait;
use model::cursor::ReplicationCursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state database error: {0}")]
    Sled(#[from] sled::Error),

    #[error("failed to decode stored cursor: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Persistence of per-resource replication cursors across runs.
#[async_trait]
pub trait CursorStore: Send + Sync {
    async fn load_cursor(
        &self,
        pipeline: &str,
        resource: &str,
    ) -> Result<Option<ReplicationCursor>, StateError>;

    async fn save_cursor(
        &self,
        pipeline: &str,
        resource: &str,
        cursor: &ReplicationCursor,
    ) -> Result<(), StateError>;
}

/// Cursor store backed by an embedded sled database.
pub struct SledCursorStore {
    db: sled::Db,
}

impl SledCursorStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    #[inline]
    fn cursor_key(pipeline: &str, resource: &str) -> String {
        format!("cursor:{pipeline}:{resource}")
    }
}

#[async_trait]
impl CursorStore for SledCursorStore {
    async fn load_cursor(
        &self,
        pipeline: &str,
        resource: &str,
    ) -> Result<Option<ReplicationCursor>, StateError> {
        let key = Self::cursor_key(pipeline, resource);
        match self.db.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save_cursor(
        &self,
        pipeline: &str,
        resource: &str,
        cursor: &ReplicationCursor,
    ) -> Result<(), StateError> {
        let key = Self::cursor_key(pipeline, resource);
        let bytes = serde_json::to_vec(cursor)?;
        self.db.insert(key, bytes)?;
        self.db.flush_async().await?;
        Ok(())
    }
}
