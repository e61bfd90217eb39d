use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use crate::cache::{CacheDocument, MetadataCache};
use crate::common::constants::{CACHE_FILE, DEFAULT_ALPHABET, STATE_DATABASE_FILE, TOKENS_FILE};
use crate::naming::{NameAllocator, NameGenerator, RandomCode};
use crate::persist::{JsonFileRepository, PersistError, Repository, SqliteRepository};
use crate::registry::{CapabilityTokenRegistry, TokenDocument, TokenError};
use crate::utils::time::now_millis;
use super::config::{StateBackend, TenantConfig};
use super::open::OpenError;

/// Everything that must change together: the token table, the metadata
/// cache and the public-name generator.
///
/// A [`Store`](super::Store) keeps exactly one `Catalog` behind one mutex,
/// so mint, revoke, populate and invalidate (with their persisted writes)
/// are serialized, and so is name allocation.
//
// // 必须一起变更的状态：令牌表、元数据缓存和公开名称生成器。
// // Store 只在一个互斥锁后面持有一个 Catalog。
pub struct Catalog {
    pub(crate) tokens: CapabilityTokenRegistry,
    pub(crate) cache: MetadataCache,
    pub(crate) names: Box<dyn NameGenerator>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("tokens", &self.tokens)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Loads persisted state for `config`. Corrupt state is reset, never fatal.
    pub(crate) fn open(config: &TenantConfig) -> Result<Catalog, OpenError> {
        let state = config.state_path();
        fs::create_dir_all(&state)?;

        let (token_repository, cache_repository): (
            Box<dyn Repository<TokenDocument>>,
            Box<dyn Repository<CacheDocument>>,
        ) = match config.state_backend {
            StateBackend::Json => (
                Box::new(JsonFileRepository::new(state.join(TOKENS_FILE))),
                Box::new(JsonFileRepository::new(state.join(CACHE_FILE))),
            ),
            StateBackend::Sqlite => {
                let database = state.join(STATE_DATABASE_FILE);
                (
                    Box::new(open_sqlite(&database, "tokens")?),
                    Box::new(open_sqlite(&database, "cache")?),
                )
            }
        };

        let token_generator = RandomCode::new(DEFAULT_ALPHABET, config.token_length)?;
        let tokens = CapabilityTokenRegistry::load(token_repository, Box::new(token_generator), config.token_attempts);
        let cache = MetadataCache::load(cache_repository);
        let names = NameAllocator::starting_at_random(DEFAULT_ALPHABET, config.file_length)?;

        Ok(Catalog {
            tokens,
            cache,
            names: Box::new(names),
        })
    }

    pub fn resolve(&self, token: &str) -> Option<&Path> {
        self.tokens.resolve(token)
    }

    /// Revokes `token` and drops the cache entry of the path it pointed at.
    pub fn revoke(&mut self, token: &str) -> Result<Option<PathBuf>, TokenError> {
        let path = self.tokens.revoke(token)?;
        if let Some(path) = &path {
            self.invalidate(path);
        }
        Ok(path)
    }

    /// Invalidates `path` and flushes. A failed flush only warns: the entry is
    /// already gone from memory, and a stale persisted entry is dropped again
    /// on the next successful flush.
    pub(crate) fn invalidate(&mut self, path: &Path) {
        self.cache.invalidate(path);
        self.flush_cache();
    }

    pub(crate) fn flush_cache(&mut self) {
        if let Err(e) = self.cache.flush() {
            warn!(error = %e, "failed to persist metadata cache");
        }
    }
}

/// Opens a SQLite repository, moving an unusable database aside first.
fn open_sqlite<T>(database: &Path, key: &str) -> Result<SqliteRepository<T>, PersistError> {
    match SqliteRepository::open(database, key) {
        Ok(repository) => Ok(repository),
        Err(e) => {
            let aside = database.with_extension(format!("db.corrupt-{}", now_millis()));
            warn!(error = %e, moved_to = %aside.display(), "state database unusable, starting empty");
            fs::rename(database, &aside)?;
            SqliteRepository::open(database, key)
        }
    }
}
