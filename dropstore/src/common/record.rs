use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::store::config::TenantConfig;
use crate::utils::path::split_extension;
use crate::utils::time::{datetime_from_millis, system_time_to_millis};

/// The coarse classification of a stored object, derived from its extension.
//
// // 存储对象的粗略分类，由其扩展名推导得出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Plain,
    Other,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Plain => "plain",
            MediaKind::Other => "other",
        };
        f.write_str(label)
    }
}

/// One stored item as seen by listings and mutation operations.
//
// // 列表和变更操作所看到的一个存储项。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    /// Public file name relative to the storage root (e.g. `a1B2.png`).
    pub name: String,
    /// Absolute location on disk.
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Modification time, truncated to milliseconds.
    pub modified_at: DateTime<Utc>,
    pub media_kind: MediaKind,
    /// Trimmed content of small plain objects; link targets end up here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_content: Option<String>,
    /// The capability token bound to this object, if one has been minted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ObjectRecord {
    /// Stats the file at `path` and builds a fresh record for it.
    ///
    /// Plain objects no larger than the tenant's inline threshold have their
    /// UTF-8 content read and trimmed into `inline_content`.
    pub fn from_file(path: &Path, config: &TenantConfig) -> io::Result<ObjectRecord> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"))?
            .to_string();

        let modified_ms = system_time_to_millis(metadata.modified()?);
        let modified_at = datetime_from_millis(modified_ms)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "modification time out of range"))?;

        let extension = split_extension(&name).1.unwrap_or("");
        let media_kind = config.classify(extension);

        let inline_content = if media_kind == MediaKind::Plain && metadata.len() <= config.inline_threshold {
            read_inline(path, config.inline_threshold)?
        } else {
            None
        };

        Ok(ObjectRecord {
            name,
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            modified_at,
            media_kind,
            inline_content,
            token: None,
        })
    }

    /// The record's extension without the leading dot, or `""`.
    pub fn extension(&self) -> &str {
        split_extension(&self.name).1.unwrap_or("")
    }
}

fn read_inline(path: &Path, limit: u64) -> io::Result<Option<String>> {
    let mut buffer = Vec::new();
    fs::File::open(path)?.take(limit).read_to_end(&mut buffer)?;
    // 非 UTF-8 内容不做内联
    Ok(String::from_utf8(buffer).ok().map(|s| s.trim().to_string()))
}
