use std::fs;
use std::io;
use std::path::PathBuf;
use serde::Serialize;
use tracing::{info, warn};
use crate::common::record::ObjectRecord;
use crate::registry::TokenError;
use crate::utils::path::{join_file_name, sanitize_name, split_extension};
use super::catalog::Catalog;
use super::Store;

/// Defines errors that can occur while inspecting, renaming or editing an object.
//
// // 定义在查看、重命名或编辑对象时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The token is unknown or has been revoked.
    //
    // // 令牌未知或已被吊销。
    #[error("Invalid or revoked token.")]
    InvalidToken,

    /// The token resolves, but the file behind it is gone.
    //
    // // 令牌可以解析，但其背后的文件已不存在。
    #[error("Object not found at {0}")]
    ObjectNotFound(PathBuf),

    /// The rename target is already taken by another object.
    //
    // // 重命名目标已被另一个对象占用。
    #[error("Name '{0}' is already in use.")]
    NameInUse(String),

    /// The new name is empty after sanitizing.
    //
    // // 新名称经过清理后为空。
    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    /// The new content exceeds the tenant's paste size limit.
    //
    // // 新内容超出了租户的粘贴大小限制。
    #[error("Content too large: {size} bytes exceeds the limit of {limit} bytes.")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// A filesystem operation failed.
    //
    // // 文件系统操作失败。
    #[error("File system error: {0}")]
    Io(#[from] io::Error),

    /// The token table could not be updated.
    //
    // // 无法更新令牌表。
    #[error("Token table error: {0}")]
    Token(#[from] TokenError),
}

/// Result of a successful rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameReceipt {
    pub name: String,
    pub file_name: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Resolves `token` to a path that still holds a regular file.
fn existing_target(catalog: &Catalog, token: &str) -> Result<PathBuf, UpdateError> {
    let path = catalog.resolve(token).ok_or(UpdateError::InvalidToken)?.to_path_buf();
    if !path.is_file() {
        return Err(UpdateError::ObjectNotFound(path));
    }
    Ok(path)
}

fn describe(store: &Store, catalog: &mut Catalog, path: &std::path::Path) -> Result<ObjectRecord, UpdateError> {
    let mut record = match catalog.cache.get(path) {
        Some(record) => record,
        None => {
            let record = ObjectRecord::from_file(path, &store.config)?;
            catalog.cache.populate(path, &record);
            catalog.flush_cache();
            record
        }
    };
    record.token = catalog.tokens.token_for(path).map(str::to_string);
    Ok(record)
}

pub(crate) fn lookup(store: &Store, token: &str) -> Result<ObjectRecord, UpdateError> {
    let mut catalog = store.catalog.lock();
    let path = existing_target(&catalog, token)?;
    describe(store, &mut catalog, &path)
}

/// 在存储根目录内重命名对象，保留原扩展名。
///
/// 目标名称已被占用时返回 `NameInUse`，原文件与令牌保持不变。
pub(crate) fn rename(store: &Store, token: &str, new_name: &str) -> Result<RenameReceipt, UpdateError> {
    let mut catalog = store.catalog.lock();
    let path = existing_target(&catalog, token)?;

    let stem = sanitize_name(new_name.trim());
    if stem.is_empty() {
        return Err(UpdateError::InvalidName(new_name.to_string()));
    }
    let current = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| UpdateError::ObjectNotFound(path.clone()))?
        .to_string();
    let extension = split_extension(&current).1.unwrap_or("");
    let file_name = join_file_name(&stem, extension);

    if file_name == current {
        return Ok(RenameReceipt {
            url: store.config.public_url(&file_name),
            name: stem,
            file_name,
            path,
        });
    }
    if store.storage.exists(&file_name) {
        return Err(UpdateError::NameInUse(file_name));
    }

    let new_path = store.storage.rename(&path, &file_name)?;
    if let Err(e) = catalog.tokens.rebind(token, &new_path) {
        // 令牌表写入失败：把文件移回原处
        if let Err(rollback) = fs::rename(&new_path, &path) {
            warn!(error = %rollback, from = %new_path.display(), "failed to roll back rename");
        }
        return Err(e.into());
    }

    catalog.cache.invalidate(&path);
    catalog.cache.invalidate(&new_path);
    catalog.flush_cache();

    info!(from = %current, to = %file_name, "object renamed");
    Ok(RenameReceipt {
        url: store.config.public_url(&file_name),
        name: stem,
        file_name,
        path: new_path,
    })
}

/// 原子地替换对象内容，令牌不变。
pub(crate) fn edit(store: &Store, token: &str, content: &[u8]) -> Result<ObjectRecord, UpdateError> {
    let limit = store.config.paste_max_size;
    if content.len() as u64 > limit {
        return Err(UpdateError::PayloadTooLarge { size: content.len() as u64, limit });
    }

    let mut catalog = store.catalog.lock();
    let path = existing_target(&catalog, token)?;

    store.storage.replace(&path, content)?;
    catalog.cache.invalidate(&path);
    catalog.flush_cache();

    info!(path = %path.display(), bytes = content.len(), "object edited");
    describe(store, &mut catalog, &path)
}
