//!
//! # Test Common Utilities
//!
//! Helpers for driving the `dropstore` binary against an isolated tenant.
//!
//
// // # 测试通用工具
// //
// // 为在隔离的租户上运行 `dropstore` 二进制文件提供辅助函数。
// //
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

/// Represents the context for a single test: a temporary directory holding
/// the tenant's storage root and its configuration file.
///
/// The temporary directory is removed when the `TestContext` goes out of scope.
pub struct TestContext {
    /// Held for its Drop behavior to ensure cleanup.
    pub _temp_dir: TempDir,
    /// The tenant's storage root.
    pub root: PathBuf,
    /// The JSON configuration file passed with `--config`.
    pub config_path: PathBuf,
}

impl TestContext {
    /// Creates a tenant with default options plus the given extra JSON fields.
    pub fn new(extra: serde_json::Value) -> anyhow::Result<Self> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path().join("images");
        let config_path = temp_dir.path().join("tenant.json");

        let mut config = serde_json::json!({
            "name": "cli-test",
            "imagePath": root,
            "url": "https://drop.example.com/",
        });
        if let (Some(base), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        fs::write(&config_path, serde_json::to_vec_pretty(&config)?)?;

        Ok(TestContext {
            _temp_dir: temp_dir,
            root,
            config_path,
        })
    }

    /// A `dropstore` command already pointed at this tenant's configuration.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_dropstore"));
        cmd.arg("--config").arg(&self.config_path);
        cmd
    }

    /// Uploads `text` as a paste and returns the parsed JSON receipt.
    pub fn paste(&self, text: &str) -> anyhow::Result<serde_json::Value> {
        let output = self
            .cmd()
            .args(["upload", "--json", "--paste", text])
            .output()?;
        anyhow::ensure!(
            output.status.success(),
            "upload failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Reads a string field out of a JSON receipt.
pub fn field(value: &serde_json::Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}
