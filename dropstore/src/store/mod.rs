//! The store facade: one tenant's storage root, its configuration and the
//! locked catalog every operation goes through.

pub mod catalog;
pub mod config;
mod open;
mod remove;
mod update;

pub use open::OpenError;
pub use remove::RemoveError;
pub use update::{RenameReceipt, UpdateError};

use std::path::PathBuf;
use parking_lot::Mutex;
use crate::common::record::ObjectRecord;
use crate::ingest::{self, IngestError, UploadReceipt, UploadRequest};
use crate::naming::NameGenerator;
use crate::query::{QueryEngine, QueryError, QueryPage, QueryRequest};
use crate::storage::LocalStorage;
use catalog::Catalog;
use config::TenantConfig;

/// An opened tenant store.
///
/// All state lives here; there are no globals. Share it behind an `Arc`
/// between request handlers: every operation takes the catalog lock for its
/// whole duration, so mutations are serialized per store.
//
// // 一个已打开的租户存储。所有状态都在这里，没有全局变量。
#[derive(Debug)]
pub struct Store {
    pub(crate) config: TenantConfig,
    pub(crate) storage: LocalStorage,
    pub(crate) catalog: Mutex<Catalog>,
}

impl Store {
    /// Validates `config`, creates the storage layout and loads persisted state.
    pub fn open(config: TenantConfig) -> Result<Store, OpenError> {
        open::open_store(config)
    }

    /// Replaces the public-name generator, e.g. with a word-list closure.
    pub fn with_name_generator(self, generator: impl NameGenerator + 'static) -> Store {
        self.set_name_generator(generator);
        self
    }

    pub fn set_name_generator(&self, generator: impl NameGenerator + 'static) {
        self.catalog.lock().names = Box::new(generator);
    }

    pub fn config(&self) -> &TenantConfig {
        &self.config
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Ingests one upload and returns its public name and capability token.
    pub fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, IngestError> {
        let mut catalog = self.catalog.lock();
        ingest::ingest(&self.config, &self.storage, &mut catalog, request)
    }

    /// A listing request scoped to this store's root.
    pub fn query(&self) -> QueryRequest {
        QueryRequest::new(self.storage.root())
    }

    pub fn list(&self, request: &QueryRequest) -> Result<QueryPage, QueryError> {
        let mut catalog = self.catalog.lock();
        let Catalog { tokens, cache, .. } = &mut *catalog;
        QueryEngine::new(&self.config, cache, tokens).list(request)
    }

    /// The storage path a token authorizes, if the token is known.
    pub fn resolve(&self, token: &str) -> Option<PathBuf> {
        self.catalog.lock().resolve(token).map(PathBuf::from)
    }

    /// Describes the object a token authorizes.
    pub fn lookup(&self, token: &str) -> Result<ObjectRecord, UpdateError> {
        update::lookup(self, token)
    }

    /// Renames the object behind `token`, keeping its extension.
    pub fn rename(&self, token: &str, new_name: &str) -> Result<RenameReceipt, UpdateError> {
        update::rename(self, token, new_name)
    }

    /// Replaces the content of the object behind `token`.
    pub fn edit(&self, token: &str, content: &[u8]) -> Result<ObjectRecord, UpdateError> {
        update::edit(self, token, content)
    }

    /// Moves the object behind `token` into quarantine and revokes the token.
    ///
    /// When the tenant disables `uploadDeleteLink`, the caller must have
    /// re-authenticated (`reauthenticated = true`).
    pub fn delete(&self, token: &str, reauthenticated: bool) -> Result<PathBuf, RemoveError> {
        remove::delete(self, token, reauthenticated)
    }

    /// Number of live capability tokens.
    pub fn token_count(&self) -> usize {
        self.catalog.lock().tokens.len()
    }

    /// Number of cached metadata entries.
    pub fn cached_count(&self) -> usize {
        self.catalog.lock().cache.len()
    }
}
