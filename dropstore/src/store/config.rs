use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::common::constants::{
    DEFAULT_ALLOCATION_ATTEMPTS, DEFAULT_INLINE_THRESHOLD, DEFAULT_NAME_WIDTH, DEFAULT_PAGE_LINKS,
    DEFAULT_PAGE_SIZE, DEFAULT_PASTE_MAX_SIZE, DEFAULT_QUARANTINE_DIR, DEFAULT_STATE_DIR,
    DEFAULT_TOKEN_WIDTH, DEFAULT_URL_MAX_SIZE,
};
use crate::common::record::MediaKind;
use crate::utils::hash::{is_sha256_hex, sha256_hex};
use crate::utils::path::normalize_extension;

/// Defines errors that can occur while loading or validating a tenant configuration.
//
// // 定义在加载或校验租户配置时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    //
    // // 读取配置文件时发生 I/O 错误。
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file is not valid JSON for this structure.
    //
    // // 配置文件不是该结构的合法 JSON。
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),

    /// `imagePath` was not set.
    //
    // // 未设置 `imagePath`。
    #[error("Missing required option 'imagePath'.")]
    MissingStorageRoot,

    /// `url` is set but is not an absolute URL.
    //
    // // 设置了 `url`，但它不是绝对 URL。
    #[error("Option 'url' is not an absolute URL: {0}")]
    InvalidUrl(String),

    /// `password` is set but is not a hex SHA-256 digest.
    //
    // // 设置了 `password`，但它不是十六进制的 SHA-256 摘要。
    #[error("Option 'password' must be a 64-character hex SHA-256 digest.")]
    InvalidPasswordHash,

    /// A numeric option is out of its allowed range.
    //
    // // 某个数值选项超出允许范围。
    #[error("Option '{option}' must be at least {minimum}.")]
    OutOfRange { option: &'static str, minimum: u64 },

    /// `quarantineDir` is not a single plain directory name.
    //
    // // `quarantineDir` 不是单一的普通目录名。
    #[error("Option 'quarantineDir' must be a single directory name: {0}")]
    InvalidQuarantineDir(String),
}

/// Where the token table and metadata cache are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    #[default]
    Json,
    Sqlite,
}

/// Per-tenant configuration, resolved and validated once before a store opens.
///
/// Every field has a default except `imagePath`; a configuration file only
/// needs to name what it overrides.
//
// // 租户配置。在打开存储之前解析并校验一次。
// // 除 `imagePath` 外每个字段都有默认值；配置文件只需写出需要覆盖的部分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantConfig {
    /// Tenant label, handed to custom name generators.
    pub name: String,
    /// Storage root holding the public objects.
    pub image_path: PathBuf,
    /// Public URL prefix under which stored objects are served.
    pub url: Option<String>,
    /// Hex SHA-256 digest of the tenant password.
    pub password: Option<String>,
    /// Width of generated public names.
    pub file_length: usize,
    /// Width of capability tokens.
    pub token_length: usize,
    pub image_files: Vec<String>,
    pub audio_files: Vec<String>,
    pub video_files: Vec<String>,
    pub text_files: Vec<String>,
    /// Extensions that are refused at upload (server-executable types).
    pub disallowed_extensions: Vec<String>,
    /// Whether a token alone is enough to delete, without re-authentication.
    pub upload_delete_link: bool,
    /// Maximum size in bytes of a raw payload upload.
    pub paste_max_size: u64,
    /// Maximum length in bytes of a link target.
    pub url_max_size: usize,
    pub page_size: usize,
    pub page_links: usize,
    /// Plain objects up to this size get their content cached inline.
    pub inline_threshold: u64,
    pub name_attempts: usize,
    pub token_attempts: usize,
    pub quarantine_dir: String,
    /// Directory for persisted state; defaults to `<imagePath>/.dropstore`.
    pub state_dir: Option<PathBuf>,
    pub state_backend: StateBackend,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TenantConfig {
    fn default() -> Self {
        TenantConfig {
            name: "default".to_string(),
            image_path: PathBuf::new(),
            url: None,
            password: None,
            file_length: DEFAULT_NAME_WIDTH,
            token_length: DEFAULT_TOKEN_WIDTH,
            image_files: strings(&["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"]),
            audio_files: strings(&["mp3", "ogg", "wav", "flac", "m4a", "opus"]),
            video_files: strings(&["mp4", "webm", "mkv", "mov", "avi"]),
            text_files: strings(&["txt", "md", "log"]),
            disallowed_extensions: strings(&[
                "php", "phtml", "php3", "php4", "php5", "php7", "phar", "cgi", "pl", "asp", "aspx", "jsp",
            ]),
            upload_delete_link: true,
            paste_max_size: DEFAULT_PASTE_MAX_SIZE,
            url_max_size: DEFAULT_URL_MAX_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            page_links: DEFAULT_PAGE_LINKS,
            inline_threshold: DEFAULT_INLINE_THRESHOLD,
            name_attempts: DEFAULT_ALLOCATION_ATTEMPTS,
            token_attempts: DEFAULT_ALLOCATION_ATTEMPTS,
            quarantine_dir: DEFAULT_QUARANTINE_DIR.to_string(),
            state_dir: None,
            state_backend: StateBackend::Json,
        }
    }
}

impl TenantConfig {
    /// Reads a JSON configuration file and validates it.
    pub fn from_file(path: &Path) -> Result<TenantConfig, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: TenantConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks required options and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingStorageRoot);
        }
        if let Some(url) = &self.url {
            match url::Url::parse(url) {
                Ok(parsed) if !parsed.cannot_be_a_base() => {}
                _ => return Err(ConfigError::InvalidUrl(url.clone())),
            }
        }
        if let Some(password) = &self.password {
            if !is_sha256_hex(password) {
                return Err(ConfigError::InvalidPasswordHash);
            }
        }

        let minimums: [(&'static str, u64, u64); 6] = [
            ("fileLength", self.file_length as u64, 1),
            ("tokenLength", self.token_length as u64, 1),
            ("pageSize", self.page_size as u64, 1),
            ("pageLinks", self.page_links as u64, 1),
            ("nameAttempts", self.name_attempts as u64, 1),
            ("tokenAttempts", self.token_attempts as u64, 1),
        ];
        for (option, value, minimum) in minimums {
            if value < minimum {
                return Err(ConfigError::OutOfRange { option, minimum });
            }
        }

        let quarantine = Path::new(&self.quarantine_dir);
        let mut components = quarantine.components();
        match (components.next(), components.next()) {
            (Some(std::path::Component::Normal(_)), None) => {}
            _ => return Err(ConfigError::InvalidQuarantineDir(self.quarantine_dir.clone())),
        }
        Ok(())
    }

    /// Directory holding the persisted token table and metadata cache.
    pub fn state_path(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| self.image_path.join(DEFAULT_STATE_DIR))
    }

    pub fn quarantine_path(&self) -> PathBuf {
        self.image_path.join(&self.quarantine_dir)
    }

    /// Classifies an extension (with or without leading dot, any case)
    /// against the tenant's lists. An empty extension is plain text.
    pub fn classify(&self, extension: &str) -> MediaKind {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return MediaKind::Plain;
        }
        let listed = |list: &[String]| list.iter().any(|e| normalize_extension(e) == extension);
        if listed(&self.image_files) {
            MediaKind::Image
        } else if listed(&self.audio_files) {
            MediaKind::Audio
        } else if listed(&self.video_files) {
            MediaKind::Video
        } else if listed(&self.text_files) {
            MediaKind::Plain
        } else {
            MediaKind::Other
        }
    }

    pub fn is_disallowed(&self, extension: &str) -> bool {
        let extension = normalize_extension(extension);
        !extension.is_empty()
            && self
                .disallowed_extensions
                .iter()
                .any(|e| normalize_extension(e) == extension)
    }

    /// The public URL of a stored file, when a URL prefix is configured.
    pub fn public_url(&self, file_name: &str) -> Option<String> {
        let prefix = self.url.as_ref()?;
        let mut base = url::Url::parse(prefix).ok()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(file_name).ok().map(String::from)
    }

    /// Whether `candidate` hashes to the configured password digest.
    /// Always false when no password is configured.
    pub fn check_password(&self, candidate: &str) -> bool {
        match &self.password {
            Some(expected) => sha256_hex(candidate.as_bytes()).eq_ignore_ascii_case(expected),
            None => false,
        }
    }

    /// The stored form of a password, suitable for the `password` option.
    pub fn hash_password(password: &str) -> String {
        sha256_hex(password.as_bytes())
    }
}
