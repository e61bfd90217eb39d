pub mod local;

pub use local::LocalStorage;

/// Defines errors that can occur while placing content into the storage root.
//
// // 定义将内容放入存储根目录时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A plain I/O error while writing, renaming or removing a file.
    //
    // // 写入、重命名或删除文件时发生的普通 I/O 错误。
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The rename crossed a filesystem boundary and the copy-then-unlink
    /// fallback failed as well.
    //
    // // 重命名跨越了文件系统边界，且“复制后删除”的回退方案也失败了。
    #[error("Cross-device move failed: {0}")]
    CrossDevice(std::io::Error),
}
