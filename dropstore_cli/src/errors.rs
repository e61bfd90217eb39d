use std::io;
use std::path::PathBuf;
use thiserror::Error;
use dropstore::{ConfigError, IngestError, OpenError, QueryError, RemoveError, UpdateError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("The provided path is not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Nothing to upload: give a file, --paste, --stdin or --link.")]
    NoContent,

    #[error("Incorrect password.")]
    PasswordMismatch,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to open store: {0}")]
    Open(#[from] OpenError),

    #[error("Upload failed: {0}")]
    Upload(#[from] IngestError),

    #[error("Failed to list objects: {0}")]
    Query(#[from] QueryError),

    #[error("Failed to update object: {0}")]
    Update(#[from] UpdateError),

    #[error("Failed to delete object: {0}")]
    Remove(#[from] RemoveError),
}
