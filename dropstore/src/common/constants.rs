/// The schema version of the persisted capability-token table.
pub const TOKEN_SCHEMA_VERSION: u32 = 1;

/// The schema version of the persisted metadata cache.
/// A cache written with any other version is discarded as a whole.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

// --- 名称分配 ---
/// Symbol alphabet shared by public names and capability tokens, in ascending order.
pub const DEFAULT_ALPHABET: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default width of generated public names.
pub const DEFAULT_NAME_WIDTH: usize = 4;

/// Default width of capability tokens.
pub const DEFAULT_TOKEN_WIDTH: usize = 30;

/// Default bound on name and token allocation attempts.
pub const DEFAULT_ALLOCATION_ATTEMPTS: usize = 20;

// --- 查询 ---
/// Default number of records per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 48;

/// Default number of page links surrounding the current page.
pub const DEFAULT_PAGE_LINKS: usize = 8;

/// Plain objects up to this many bytes have their trimmed content cached inline.
pub const DEFAULT_INLINE_THRESHOLD: u64 = 2048;

/// Number of leading bytes inspected when sniffing an extension from content.
pub const SNIFF_PREFIX_LEN: usize = 4096;

// --- 上传限制 ---
/// Default maximum size of a raw payload upload (1 MiB).
pub const DEFAULT_PASTE_MAX_SIZE: u64 = 1024 * 1024;

/// Default maximum length of a link target.
pub const DEFAULT_URL_MAX_SIZE: usize = 2048;

// --- 存储布局 ---
/// Subdirectory of the storage root that receives deleted objects.
pub const DEFAULT_QUARANTINE_DIR: &str = "deleted";

/// Hidden subdirectory of the storage root that holds the persisted state.
pub const DEFAULT_STATE_DIR: &str = ".dropstore";

/// File name of the JSON token table.
pub const TOKENS_FILE: &str = "tokens.json";

/// File name of the JSON metadata cache.
pub const CACHE_FILE: &str = "cache.json";

/// File name of the SQLite state database.
pub const STATE_DATABASE_FILE: &str = "state.db";
