//! Whole-document persistence behind a small repository interface.
//!
//! Components hand a complete snapshot to [`Repository::save`] after every
//! mutation and read it back once at startup with [`Repository::load`]. The
//! backing store can change (JSON file, SQLite) without touching them.

mod json;
mod sqlite;

pub use json::JsonFileRepository;
pub use sqlite::SqliteRepository;

/// Defines errors that can occur while loading or saving persisted state.
//
// // 定义在加载或保存持久化状态时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// An I/O error occurred while reading or writing the state file.
    //
    // // 读写状态文件时发生 I/O 错误。
    #[error("State I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document exists but could not be parsed.
    //
    // // 持久化文档存在，但无法解析。
    #[error("Persisted state is corrupt: {0}")]
    Corrupt(serde_json::Error),

    /// The in-memory document could not be serialized.
    //
    // // 内存中的文档无法序列化。
    #[error("Failed to serialize state: {0}")]
    Serialization(serde_json::Error),

    /// The SQLite state database failed.
    //
    // // SQLite 状态数据库出错。
    #[error("State database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Loads and saves one document of type `T`.
pub trait Repository<T>: Send {
    /// Reads the persisted document. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> Result<Option<T>, PersistError>;

    /// Replaces the persisted document with `value`.
    fn save(&self, value: &T) -> Result<(), PersistError>;
}
