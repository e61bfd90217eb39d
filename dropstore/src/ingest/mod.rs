//! The upload pipeline.
//!
//! An upload moves through `Received → ExtensionResolved → NameAllocated →
//! Persisted → Committed`, or stops with exactly one [`IngestError`]. No
//! intermediate state is visible to callers: a failure after the content was
//! placed removes it again.

mod extension;
mod sniff;

pub use sniff::sniff_extension;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::common::record::ObjectRecord;
use crate::naming::{NameError, NameGenerator};
use crate::persist::PersistError;
use crate::registry::TokenError;
use crate::storage::{LocalStorage, StorageError};
use crate::store::catalog::Catalog;
use crate::store::config::TenantConfig;
use crate::utils::path::{join_file_name, sanitize_name};
use extension::resolve_extension;

/// Defines errors that can occur while ingesting an upload.
//
// // 定义在处理上传时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Not exactly one of file, payload or link was supplied.
    //
    // // 文件、原始数据、链接三者并非恰好提供了一个。
    #[error("No content specified: supply exactly one of a file, a payload or a link.")]
    NoContentSpecified,

    /// The payload or link exceeds the tenant's size limit.
    //
    // // 原始数据或链接超出了租户的大小限制。
    #[error("Content too large: {size} bytes exceeds the limit of {limit} bytes.")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// The link target is not an absolute http(s) URL.
    //
    // // 链接目标不是绝对的 http(s) URL。
    #[error("Invalid link target: {0}")]
    InvalidLink(String),

    /// The resolved extension is on the tenant's denylist.
    //
    // // 解析出的扩展名在租户的禁止列表中。
    #[error("Disallowed file type: .{0}")]
    DisallowedExtension(String),

    /// Every candidate name within the retry bound was already taken.
    //
    // // 在重试上限内的所有候选名称都已被占用。
    #[error("Could not generate a unique name after {0} attempts.")]
    NameExhausted(usize),

    /// The name generator ran out of codes.
    //
    // // 名称生成器的编码已用尽。
    #[error("Name generation failed: {0}")]
    Sequence(#[from] NameError),

    /// No unused capability token was found within the retry bound.
    //
    // // 在重试上限内未找到可用的能力令牌。
    #[error("Could not mint a unique token after {0} attempts.")]
    TokenSpaceExhausted(usize),

    /// The uploaded temporary file could not be read.
    //
    // // 无法读取上传的临时文件。
    #[error("Failed to read uploaded file: {0}")]
    SourceUnreadable(io::Error),

    /// Writing or moving the content into the storage root failed.
    //
    // // 将内容写入或移动到存储根目录失败。
    #[error("Failed to store upload: {0}")]
    PersistenceFailure(io::Error),

    /// A cross-device move fell back to copy-and-unlink, and that failed too.
    //
    // // 跨设备移动回退到“复制后删除”，但该操作同样失败。
    #[error("Failed to move upload across devices: {0}")]
    CrossDeviceMoveFailure(io::Error),

    /// The token table could not be persisted.
    //
    // // 令牌表无法持久化。
    #[error("Failed to persist token table: {0}")]
    StatePersistence(#[from] PersistError),
}

impl From<StorageError> for IngestError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Io(e) => IngestError::PersistenceFailure(e),
            StorageError::CrossDevice(e) => IngestError::CrossDeviceMoveFailure(e),
        }
    }
}

impl From<TokenError> for IngestError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::TokenSpaceExhausted(attempts) => IngestError::TokenSpaceExhausted(attempts),
            TokenError::Name(e) => IngestError::Sequence(e),
            TokenError::Persist(e) => IngestError::StatePersistence(e),
        }
    }
}

/// The stages an upload passes through, reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    ExtensionResolved,
    NameAllocated,
    Persisted,
    Committed,
}

/// An already-received temporary file, as handed over by the transport layer.
/// Ingest takes ownership: on success the file has been moved away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempUpload {
    pub path: PathBuf,
    /// The file name the client declared, used for its extension.
    pub file_name: String,
}

/// One upload as received from the outside.
///
/// Exactly one of `file`, `payload` and `link` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: Option<TempUpload>,
    pub payload: Option<Vec<u8>>,
    pub link: Option<String>,
    /// Requested public name, honoured on the first attempt only.
    pub name: Option<String>,
    /// Extension override, without or with a leading dot.
    pub extension: Option<String>,
}

impl UploadRequest {
    pub fn file(path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        UploadRequest {
            file: Some(TempUpload { path: path.into(), file_name: file_name.into() }),
            ..UploadRequest::default()
        }
    }

    pub fn payload(bytes: impl Into<Vec<u8>>) -> Self {
        UploadRequest { payload: Some(bytes.into()), ..UploadRequest::default() }
    }

    pub fn link(target: impl Into<String>) -> Self {
        UploadRequest { link: Some(target.into()), ..UploadRequest::default() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Validates the intake and borrows the one piece of content.
    fn content(&self, config: &TenantConfig) -> Result<Content<'_>, IngestError> {
        let content = match (&self.file, &self.payload, &self.link) {
            (Some(file), None, None) => Content::File { path: &file.path, file_name: &file.file_name },
            (None, Some(payload), None) => Content::Payload(payload),
            (None, None, Some(link)) => Content::Link(link.trim()),
            _ => return Err(IngestError::NoContentSpecified),
        };

        match content {
            Content::Payload(bytes) if bytes.len() as u64 > config.paste_max_size => {
                Err(IngestError::PayloadTooLarge { size: bytes.len() as u64, limit: config.paste_max_size })
            }
            Content::Link(link) if link.len() > config.url_max_size => {
                Err(IngestError::PayloadTooLarge { size: link.len() as u64, limit: config.url_max_size as u64 })
            }
            Content::Link(link) => match url::Url::parse(link) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(content),
                _ => Err(IngestError::InvalidLink(link.to_string())),
            },
            _ => Ok(content),
        }
    }
}

/// The validated content of an upload.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Content<'a> {
    File { path: &'a Path, file_name: &'a str },
    Payload(&'a [u8]),
    Link(&'a str),
}

/// What a committed upload hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// Public name without extension.
    pub name: String,
    /// Resolved extension without leading dot; empty for links.
    pub extension: String,
    /// Stored file name, `name` plus extension.
    pub file_name: String,
    pub path: PathBuf,
    /// Public URL, when the tenant has a URL prefix configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Capability token that authorizes rename, edit and delete.
    pub token: String,
}

/// Runs one upload through the pipeline. The caller holds the catalog lock
/// for the whole call, so the collision check and the placement cannot race
/// another upload.
pub(crate) fn ingest(
    config: &TenantConfig,
    storage: &LocalStorage,
    catalog: &mut Catalog,
    request: &UploadRequest,
) -> Result<UploadReceipt, IngestError> {
    let content = request.content(config)?;
    debug!(stage = ?IngestStage::Received, "upload received");

    let extension = resolve_extension(&content, request.extension.as_deref())
        .map_err(IngestError::SourceUnreadable)?;
    if config.is_disallowed(&extension) {
        return Err(IngestError::DisallowedExtension(extension));
    }
    debug!(stage = ?IngestStage::ExtensionResolved, %extension);

    let (name, file_name) = allocate_name(
        config,
        storage,
        catalog.names.as_mut(),
        request.name.as_deref(),
        &extension,
    )?;
    debug!(stage = ?IngestStage::NameAllocated, %file_name);

    let path = place(storage, &content, &file_name)?;
    debug!(stage = ?IngestStage::Persisted, path = %path.display());

    let token = match catalog.tokens.mint(&path, config) {
        Ok(token) => token,
        Err(e) => {
            // 未能签发令牌：撤回已写入的文件，整个上传视为失败
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %cleanup, "failed to remove uncommitted upload");
            }
            return Err(e.into());
        }
    };

    catalog.cache.invalidate(&path);
    match ObjectRecord::from_file(&path, config) {
        Ok(record) => catalog.cache.populate(&path, &record),
        Err(e) => warn!(path = %path.display(), error = %e, "could not describe new upload"),
    }
    if let Err(e) = catalog.cache.flush() {
        warn!(error = %e, "failed to persist metadata cache");
    }

    info!(stage = ?IngestStage::Committed, file = %file_name, "upload committed");
    Ok(UploadReceipt {
        url: config.public_url(&file_name),
        name,
        extension,
        file_name,
        path,
        token,
    })
}

/// Picks a free public name: the sanitized requested name on the first
/// attempt, generated candidates afterwards.
fn allocate_name(
    config: &TenantConfig,
    storage: &LocalStorage,
    names: &mut dyn NameGenerator,
    requested: Option<&str>,
    extension: &str,
) -> Result<(String, String), IngestError> {
    for attempt in 0..config.name_attempts {
        let stem = match requested {
            Some(requested) if attempt == 0 && !requested.is_empty() => sanitize_name(requested),
            _ => sanitize_name(&names.generate(config)?),
        };
        if stem.is_empty() {
            continue;
        }
        let file_name = join_file_name(&stem, extension);
        if !storage.exists(&file_name) {
            return Ok((stem, file_name));
        }
        debug!(attempt, candidate = %file_name, "name already taken");
    }
    Err(IngestError::NameExhausted(config.name_attempts))
}

fn place(storage: &LocalStorage, content: &Content<'_>, file_name: &str) -> Result<PathBuf, IngestError> {
    let placed = match content {
        Content::Payload(bytes) => storage.write_new(file_name, bytes),
        Content::Link(link) => storage.write_new(file_name, link.as_bytes()),
        Content::File { path, .. } => storage.relocate(path, file_name),
    };
    Ok(placed?)
}
