//! A persisted accelerator over filesystem stats.
//!
//! Entries are keyed by absolute path. Every write path that changes or
//! removes a file must call [`MetadataCache::invalidate`] for it before the
//! operation counts as complete; the cache never revalidates on its own.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::common::constants::CACHE_SCHEMA_VERSION;
use crate::common::record::{MediaKind, ObjectRecord};
use crate::persist::{PersistError, Repository};
use crate::utils::time::datetime_from_millis;

/// One cached snapshot of an [`ObjectRecord`], in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub name: String,
    pub size: u64,
    /// Modification time as milliseconds since the Unix epoch.
    pub modified_ms: i64,
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<String>,
}

impl CacheEntry {
    pub fn from_record(record: &ObjectRecord) -> Self {
        CacheEntry {
            name: record.name.clone(),
            size: record.size_bytes,
            modified_ms: record.modified_at.timestamp_millis(),
            kind: record.media_kind,
            inline: record.inline_content.clone(),
        }
    }

    /// Rebuilds a record for `path`. Tokens are not cached; `token` is `None`.
    pub fn to_record(&self, path: &Path) -> Option<ObjectRecord> {
        Some(ObjectRecord {
            name: self.name.clone(),
            path: path.to_path_buf(),
            size_bytes: self.size,
            modified_at: datetime_from_millis(self.modified_ms)?,
            media_kind: self.kind,
            inline_content: self.inline.clone(),
            token: None,
        })
    }
}

/// The persisted form of the whole cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheDocument {
    pub version: u32,
    pub entries: BTreeMap<String, CacheEntry>,
}

/// In-memory metadata cache with explicit flushing.
pub struct MetadataCache {
    entries: HashMap<PathBuf, CacheEntry>,
    repository: Box<dyn Repository<CacheDocument>>,
    dirty: bool,
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("entries", &self.entries.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl MetadataCache {
    /// Loads the persisted cache.
    ///
    /// A document written under another schema version is dropped whole,
    /// and a corrupt or unreadable one resets the cache to empty. Both cases
    /// log a warning and never fail.
    pub fn load(repository: Box<dyn Repository<CacheDocument>>) -> Self {
        let mut cache = MetadataCache {
            entries: HashMap::new(),
            repository,
            dirty: false,
        };

        match cache.repository.load() {
            Ok(Some(document)) if document.version == CACHE_SCHEMA_VERSION => {
                cache.entries = document
                    .entries
                    .into_iter()
                    .map(|(path, entry)| (PathBuf::from(path), entry))
                    .collect();
            }
            Ok(Some(document)) => {
                warn!(found = document.version, expected = CACHE_SCHEMA_VERSION,
                    "metadata cache written by another version, discarding");
                cache.dirty = true;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "metadata cache unreadable, starting empty");
                cache.dirty = true;
            }
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<ObjectRecord> {
        self.entries.get(path).and_then(|entry| entry.to_record(path))
    }

    pub fn populate(&mut self, path: &Path, record: &ObjectRecord) {
        self.entries.insert(path.to_path_buf(), CacheEntry::from_record(record));
        self.dirty = true;
    }

    /// Drops the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let removed = self.entries.remove(path).is_some();
        if removed {
            debug!(path = %path.display(), "metadata cache entry invalidated");
            self.dirty = true;
        }
        removed
    }

    /// Persists the cache if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        if !self.dirty {
            return Ok(());
        }
        self.repository.save(&self.document())?;
        self.dirty = false;
        Ok(())
    }

    pub fn document(&self) -> CacheDocument {
        CacheDocument {
            version: CACHE_SCHEMA_VERSION,
            entries: self
                .entries
                .iter()
                .map(|(path, entry)| (path.to_string_lossy().into_owned(), entry.clone()))
                .collect(),
        }
    }
}
