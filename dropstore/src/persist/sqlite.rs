use std::marker::PhantomData;
use std::path::Path;
use rusqlite::{Connection, OptionalExtension, params};
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::utils::time::now_millis;
use super::{PersistError, Repository};

/// Stores a document as a JSON body in a keyed row of a SQLite database.
///
/// Several repositories may share one database file as long as their keys
/// differ.
#[derive(Debug)]
pub struct SqliteRepository<T> {
    connection: Connection,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SqliteRepository<T> {
    pub fn open(database: &Path, key: &str) -> Result<Self, PersistError> {
        if let Some(dir) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let connection = Connection::open(database)?;
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS snapshots (
                key         TEXT PRIMARY KEY NOT NULL,
                body        TEXT NOT NULL,
                updated_ms  INTEGER NOT NULL
             );",
        )?;
        Ok(SqliteRepository {
            connection,
            key: key.to_string(),
            _marker: PhantomData,
        })
    }
}

impl<T> Repository<T> for SqliteRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>, PersistError> {
        let body: Option<String> = self
            .connection
            .query_row(
                "SELECT body FROM snapshots WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => serde_json::from_str(&body).map(Some).map_err(PersistError::Corrupt),
            None => Ok(None),
        }
    }

    fn save(&self, value: &T) -> Result<(), PersistError> {
        let body = serde_json::to_string(value).map_err(PersistError::Serialization)?;
        let tx = self.connection.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO snapshots (key, body, updated_ms) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_ms = excluded.updated_ms",
            params![self.key, body, now_millis()],
        )?;
        tx.commit()?;
        Ok(())
    }
}
