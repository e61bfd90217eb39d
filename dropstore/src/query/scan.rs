use std::fs;
use std::path::{Path, PathBuf};
use glob::{MatchOptions, Pattern};
use regex::Regex;
use crate::utils::path::{normalize_extension, split_extension};
use super::QueryError;

/// A file-name pattern scoping a listing.
#[derive(Debug, Clone)]
pub enum Mask {
    /// Shell-style glob over the file name (`*.*`, `ab??.png`).
    Glob(Pattern),
    /// Regular expression over the file name.
    Regex(Regex),
}

impl Mask {
    pub fn glob(pattern: &str) -> Result<Mask, QueryError> {
        Ok(Mask::Glob(Pattern::new(pattern)?))
    }

    pub fn regex(pattern: &str) -> Result<Mask, QueryError> {
        Ok(Mask::Regex(Regex::new(pattern)?))
    }

    /// Every visible file.
    pub fn any() -> Mask {
        Mask::Glob(Pattern::new("*").expect("static glob pattern"))
    }

    /// Files that carry an extension (`*.*`).
    pub fn with_extension() -> Mask {
        Mask::Glob(Pattern::new("*.*").expect("static glob pattern"))
    }

    /// Files whose name contains no `.` at all: links and extension-less pastes.
    pub fn extensionless() -> Mask {
        Mask::Regex(Regex::new(r"^[^.]+$").expect("static regex pattern"))
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Mask::Glob(pattern) => pattern.matches_with(
                file_name,
                MatchOptions {
                    case_sensitive: true,
                    require_literal_separator: true,
                    require_literal_leading_dot: true,
                },
            ),
            Mask::Regex(regex) => regex.is_match(file_name),
        }
    }
}

/// Criteria applied while walking the scope directory.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanFilter<'a> {
    pub mask: &'a Mask,
    /// Normalized (lowercase, dot-less) extensions; `None` admits everything.
    pub extensions: Option<&'a [String]>,
    pub max_size: Option<u64>,
}

/// A candidate found by [`enumerate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FoundFile {
    pub name: String,
    pub path: PathBuf,
}

/// Lists regular files directly under `scope` that pass `filter`.
///
/// Hidden entries (leading `.`) and directories, including the quarantine
/// and state directories, are never returned. Any I/O error aborts the scan.
pub(crate) fn enumerate(scope: &Path, filter: ScanFilter<'_>) -> Result<Vec<FoundFile>, QueryError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(scope)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.starts_with('.') || !filter.mask.matches(&name) {
            continue;
        }

        if let Some(allowed) = filter.extensions {
            let extension = split_extension(&name).1.map(normalize_extension).unwrap_or_default();
            if !allowed.iter().any(|e| *e == extension) {
                continue;
            }
        }

        // 跟随符号链接取元数据，与直接访问文件时的行为一致
        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            // 在 read_dir 与 stat 之间被删除
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            continue;
        }
        if let Some(max) = filter.max_size {
            if metadata.len() > max {
                continue;
            }
        }
        found.push(FoundFile { name, path });
    }
    Ok(found)
}
