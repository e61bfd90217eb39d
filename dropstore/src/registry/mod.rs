//! The capability-token registry: a persisted bijection between opaque
//! tokens and the storage paths they authorize.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::common::constants::TOKEN_SCHEMA_VERSION;
use crate::naming::{NameError, NameGenerator};
use crate::persist::{PersistError, Repository};
use crate::store::config::TenantConfig;

/// Defines errors that can occur while minting or revoking tokens.
//
// // 定义在签发或吊销令牌时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No unused token was found within the configured number of attempts.
    //
    // // 在配置的尝试次数内未找到未使用的令牌。
    #[error("Could not mint an unused token after {0} attempts.")]
    TokenSpaceExhausted(usize),

    /// The token generator itself failed.
    //
    // // 令牌生成器本身出错。
    #[error("Token generation failed: {0}")]
    Name(#[from] NameError),

    /// The token table could not be persisted.
    //
    // // 令牌表无法持久化。
    #[error("Failed to persist token table: {0}")]
    Persist(#[from] PersistError),
}

/// The persisted form of the token table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDocument {
    pub version: u32,
    pub tokens: BTreeMap<String, PathBuf>,
}

/// Maps capability tokens to storage paths and back.
pub struct CapabilityTokenRegistry {
    by_token: HashMap<String, PathBuf>,
    by_path: HashMap<PathBuf, String>,
    generator: Box<dyn NameGenerator>,
    attempts: usize,
    repository: Box<dyn Repository<TokenDocument>>,
}

impl std::fmt::Debug for CapabilityTokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityTokenRegistry")
            .field("tokens", &self.by_token.len())
            .field("attempts", &self.attempts)
            .finish()
    }
}

impl CapabilityTokenRegistry {
    /// Loads the persisted table and rebuilds the reverse index.
    ///
    /// An unreadable, corrupt or foreign-version table is replaced by an
    /// empty one with a warning; this never fails.
    pub fn load(
        repository: Box<dyn Repository<TokenDocument>>,
        generator: Box<dyn NameGenerator>,
        attempts: usize,
    ) -> Self {
        let mut registry = CapabilityTokenRegistry {
            by_token: HashMap::new(),
            by_path: HashMap::new(),
            generator,
            attempts,
            repository,
        };

        match registry.repository.load() {
            Ok(Some(document)) if document.version == TOKEN_SCHEMA_VERSION => {
                for (token, path) in document.tokens {
                    if let Some(existing) = registry.by_path.get(&path) {
                        warn!(path = %path.display(), kept = %existing, dropped = %token,
                            "duplicate token for one path in persisted table");
                        continue;
                    }
                    registry.by_path.insert(path.clone(), token.clone());
                    registry.by_token.insert(token, path);
                }
            }
            Ok(Some(document)) => {
                warn!(found = document.version, expected = TOKEN_SCHEMA_VERSION,
                    "unsupported token table version, starting empty");
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "token table unreadable, starting empty");
            }
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }

    /// Issues a fresh token bound to `path` and persists the table.
    ///
    /// A path that already holds a token gets a new one; the old token stops
    /// resolving.
    pub fn mint(&mut self, path: &Path, tenant: &TenantConfig) -> Result<String, TokenError> {
        let mut token = None;
        for attempt in 1..=self.attempts {
            let candidate = self.generator.generate(tenant)?;
            if !self.by_token.contains_key(&candidate) {
                token = Some(candidate);
                break;
            }
            debug!(attempt, "token collision, retrying");
        }
        let token = token.ok_or(TokenError::TokenSpaceExhausted(self.attempts))?;

        let previous = self.by_path.insert(path.to_path_buf(), token.clone());
        if let Some(previous) = &previous {
            self.by_token.remove(previous);
        }
        self.by_token.insert(token.clone(), path.to_path_buf());

        if let Err(e) = self.save() {
            // 回滚内存状态，使其与磁盘保持一致
            self.by_token.remove(&token);
            self.by_path.remove(path);
            if let Some(previous) = previous {
                self.by_path.insert(path.to_path_buf(), previous.clone());
                self.by_token.insert(previous, path.to_path_buf());
            }
            return Err(e);
        }
        Ok(token)
    }

    pub fn resolve(&self, token: &str) -> Option<&Path> {
        self.by_token.get(token).map(PathBuf::as_path)
    }

    pub fn token_for(&self, path: &Path) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Removes both directions of `token` and persists the table.
    /// Returns the path the token pointed at, if it was known.
    pub fn revoke(&mut self, token: &str) -> Result<Option<PathBuf>, TokenError> {
        let Some(path) = self.by_token.remove(token) else {
            return Ok(None);
        };
        self.by_path.remove(&path);

        if let Err(e) = self.save() {
            self.by_path.insert(path.clone(), token.to_string());
            self.by_token.insert(token.to_string(), path);
            return Err(e);
        }
        Ok(Some(path))
    }

    /// Points an existing token at a new path (after a rename).
    ///
    /// A stale token still bound to `new_path` is dropped, so only `token`
    /// authorizes the object afterwards.
    pub fn rebind(&mut self, token: &str, new_path: &Path) -> Result<(), TokenError> {
        let Some(old_path) = self.by_token.get(token).cloned() else {
            return Ok(());
        };
        self.by_path.remove(&old_path);
        let displaced = self
            .by_path
            .insert(new_path.to_path_buf(), token.to_string())
            .filter(|previous| previous != token);
        if let Some(displaced) = &displaced {
            self.by_token.remove(displaced);
            debug!(path = %new_path.display(), "dropping stale token bound to rename target");
        }
        self.by_token.insert(token.to_string(), new_path.to_path_buf());

        if let Err(e) = self.save() {
            self.by_path.remove(new_path);
            if let Some(displaced) = displaced {
                self.by_path.insert(new_path.to_path_buf(), displaced.clone());
                self.by_token.insert(displaced, new_path.to_path_buf());
            }
            self.by_path.insert(old_path.clone(), token.to_string());
            self.by_token.insert(token.to_string(), old_path);
            return Err(e);
        }
        Ok(())
    }

    /// The table in its persisted shape.
    pub fn document(&self) -> TokenDocument {
        TokenDocument {
            version: TOKEN_SCHEMA_VERSION,
            tokens: self
                .by_token
                .iter()
                .map(|(token, path)| (token.clone(), path.clone()))
                .collect(),
        }
    }

    fn save(&self) -> Result<(), TokenError> {
        self.repository.save(&self.document())?;
        Ok(())
    }
}
