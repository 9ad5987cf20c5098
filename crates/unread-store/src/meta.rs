//! Per-user key/value metadata.
//!
//! The read map is stored as one string value under one key per user. This
//! module supplies that key/value surface twice, in memory and backed by a
//! JSONL file, plus the binding that turns either into a kernel
//! [`ReadMapStore`].

use crate::jsonl::{JsonlError, read_records_from_path, write_records_to_path};
use crate::lock::MetaLock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use unread_kernel::config::DEFAULT_LOCK_STALE_SECS;
use unread_kernel::{ReadMapStore, StoreError, UserId};

/// One persisted `(user, key) → value` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    pub user_id: UserId,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Key/value metadata scoped per user.
pub trait UserMeta {
    fn get(&self, user: UserId, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, user: UserId, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory metadata, ordered by user then key.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserMeta {
    records: BTreeMap<(UserId, String), MetaRecord>,
}

impl MemoryUserMeta {
    /// Duplicate `(user, key)` rows resolve last-write-wins.
    pub fn from_records(records: Vec<MetaRecord>) -> Self {
        let mut index = BTreeMap::new();
        for record in records {
            index.insert((record.user_id, record.key.clone()), record);
        }
        Self { records: index }
    }

    /// Load the metadata file at `path`; a missing file is empty.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, JsonlError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let records: Vec<MetaRecord> = read_records_from_path(path)?;
        Ok(Self::from_records(records))
    }

    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), JsonlError> {
        let records: Vec<MetaRecord> = self.records().cloned().collect();
        write_records_to_path(path, &records)
    }

    pub fn records(&self) -> impl Iterator<Item = &MetaRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl UserMeta for MemoryUserMeta {
    fn get(&self, user: UserId, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .records
            .get(&(user, key.to_string()))
            .map(|record| record.value.clone()))
    }

    fn set(&mut self, user: UserId, key: &str, value: &str) -> Result<(), StoreError> {
        self.records.insert(
            (user, key.to_string()),
            MetaRecord {
                user_id: user,
                key: key.to_string(),
                value: value.to_string(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}

/// Metadata in a JSONL file, re-read on every `get`.
///
/// Each `set` holds the [`MetaLock`] across a load-modify-save of the whole
/// file, so concurrent writers for different users do not drop each
/// other's rows.
#[derive(Debug, Clone)]
pub struct JsonlUserMeta {
    path: PathBuf,
    stale_lock_after: Duration,
}

impl JsonlUserMeta {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stale_lock_after: Duration::from_secs(DEFAULT_LOCK_STALE_SECS),
        }
    }

    /// Age after which a leftover lock file is taken over.
    pub fn with_stale_lock_after(mut self, stale_after: Duration) -> Self {
        self.stale_lock_after = stale_after;
        self
    }
}

impl UserMeta for JsonlUserMeta {
    fn get(&self, user: UserId, key: &str) -> Result<Option<String>, StoreError> {
        MemoryUserMeta::load_jsonl(&self.path)?.get(user, key)
    }

    fn set(&mut self, user: UserId, key: &str, value: &str) -> Result<(), StoreError> {
        let _lock = MetaLock::acquire(&self.path, self.stale_lock_after)?;
        let mut meta = MemoryUserMeta::load_jsonl(&self.path)?;
        if meta.get(user, key)?.as_deref() == Some(value) {
            return Ok(());
        }
        meta.set(user, key, value)?;
        meta.save_jsonl(&self.path)?;
        Ok(())
    }
}

/// A [`ReadMapStore`] keeping the encoded map under `key` in `meta`.
#[derive(Debug, Clone)]
pub struct MetaReadMapStore<M> {
    meta: M,
    key: String,
}

impl<M: UserMeta> MetaReadMapStore<M> {
    pub fn new(meta: M, key: impl Into<String>) -> Self {
        Self {
            meta,
            key: key.into(),
        }
    }
}

impl<M: UserMeta> ReadMapStore for MetaReadMapStore<M> {
    fn load_read_map_string(&self, user: UserId) -> Result<String, StoreError> {
        Ok(self.meta.get(user, &self.key)?.unwrap_or_default())
    }

    fn save_read_map_string(&mut self, user: UserId, encoded: &str) -> Result<(), StoreError> {
        self.meta.set(user, &self.key, encoded)
    }
}
