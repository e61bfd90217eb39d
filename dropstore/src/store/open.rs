use std::path::PathBuf;
use parking_lot::Mutex;
use tracing::info;
use crate::naming::NameError;
use crate::persist::PersistError;
use crate::storage::LocalStorage;
use super::catalog::Catalog;
use super::config::{ConfigError, TenantConfig};
use super::Store;

/// Defines errors that can occur when opening a store.
//
// // 定义在打开存储时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// The tenant configuration failed validation.
    //
    // // 租户配置未通过校验。
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The storage root, quarantine or state directory could not be created.
    //
    // // 无法创建存储根目录、隔离目录或状态目录。
    #[error("Failed to prepare storage layout: {0}")]
    Layout(#[from] std::io::Error),

    /// The state database could not be opened even after being reset.
    //
    // // 即使重置后，状态数据库仍无法打开。
    #[error("Failed to open state database: {0}")]
    State(#[from] PersistError),

    /// A name or token generator could not be built from the configuration.
    //
    // // 无法根据配置构建名称或令牌生成器。
    #[error("Failed to build generator: {0}")]
    Generator(#[from] NameError),

    /// The storage root path exists but is not a directory.
    //
    // // 存储根路径存在，但不是目录。
    #[error("Storage root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Validates `config`, prepares the directory layout and loads persisted state.
pub(crate) fn open_store(config: TenantConfig) -> Result<Store, OpenError> {
    config.validate()?;

    if config.image_path.exists() && !config.image_path.is_dir() {
        return Err(OpenError::NotADirectory(config.image_path.clone()));
    }
    let storage = LocalStorage::new(&config.image_path, &config.quarantine_path());
    storage.ensure_layout()?;

    let catalog = Catalog::open(&config)?;
    info!(
        tenant = %config.name,
        root = %config.image_path.display(),
        tokens = catalog.tokens.len(),
        cached = catalog.cache.len(),
        "store opened"
    );

    Ok(Store {
        config,
        storage,
        catalog: Mutex::new(catalog),
    })
}
