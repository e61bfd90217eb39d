use std::path::PathBuf;
use tracing::{info, warn};
use crate::registry::TokenError;
use super::Store;

/// Defines errors that can occur during deletion.
//
// // 定义在删除过程中可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum RemoveError {
    /// The token is unknown or has been revoked.
    //
    // // 令牌未知或已被吊销。
    #[error("Invalid or revoked token.")]
    InvalidToken,

    /// The file behind the token was already gone. The dangling token has
    /// been revoked.
    //
    // // 令牌背后的文件已不存在，悬空令牌已被吊销。
    #[error("Object not found at {0}")]
    ObjectNotFound(PathBuf),

    /// The tenant requires re-authentication to delete, and the caller has not.
    //
    // // 租户要求删除前重新认证，而调用方没有。
    #[error("Deleting requires re-authentication for this tenant.")]
    ReauthenticationRequired,

    /// Moving the file into quarantine failed.
    //
    // // 将文件移入隔离目录失败。
    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),

    /// The token table could not be updated.
    //
    // // 无法更新令牌表。
    #[error("Token table error: {0}")]
    Token(#[from] TokenError),
}

/// 将对象移入隔离目录并吊销其令牌，返回隔离后的路径。
pub(crate) fn delete(store: &Store, token: &str, reauthenticated: bool) -> Result<PathBuf, RemoveError> {
    if !store.config.upload_delete_link && !reauthenticated {
        return Err(RemoveError::ReauthenticationRequired);
    }

    let mut catalog = store.catalog.lock();
    let path = catalog
        .resolve(token)
        .ok_or(RemoveError::InvalidToken)?
        .to_path_buf();

    if !path.is_file() {
        warn!(path = %path.display(), "token points at a missing object, revoking it");
        catalog.revoke(token)?;
        return Err(RemoveError::ObjectNotFound(path));
    }

    let quarantined = store.storage.quarantine(&path)?;
    catalog.revoke(token)?;

    info!(from = %path.display(), to = %quarantined.display(), "object quarantined");
    Ok(quarantined)
}
