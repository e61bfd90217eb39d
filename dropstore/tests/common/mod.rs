#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use dropstore::common::constants::DEFAULT_ALPHABET;
use dropstore::{NameAllocator, Store, TenantConfig};
use tempfile::TempDir;

/// 辅助函数：构建一个以 `dir/images` 为存储根目录的默认租户配置。
pub fn tenant_config(dir: &TempDir) -> TenantConfig {
    TenantConfig {
        name: "test-tenant".to_string(),
        image_path: dir.path().join("images"),
        url: Some("https://drop.example.com/i".to_string()),
        ..TenantConfig::default()
    }
}

/// 辅助函数：打开一个名称从 "0000" 开始顺序分配的存储。
///
/// 随机起点会让断言无法预测名称，因此测试统一使用确定性的分配器。
pub fn setup_store(dir: &TempDir) -> Store {
    open_with(tenant_config(dir))
}

/// 辅助函数：使用给定配置打开存储，并装上确定性的名称分配器。
pub fn open_with(config: TenantConfig) -> Store {
    Store::open(config)
        .unwrap()
        .with_name_generator(NameAllocator::new(DEFAULT_ALPHABET, 4).unwrap())
}

/// 辅助函数：在临时目录中创建一个具有特定内容的虚拟文件。
///
/// 用于模拟传输层已接收的上传临时文件。
pub fn create_dummy_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(name);
    let mut file = fs::File::create(&file_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file_path
}

/// 辅助函数：直接在存储根目录写入一个文件，并设置其修改时间。
///
/// `epoch_secs` 是相对于 UNIX 纪元的秒数，便于构造日期边界。
pub fn place_object(root: &Path, name: &str, content: &[u8], epoch_secs: u64) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, content).unwrap();
    set_modified(&path, epoch_secs);
    path
}

/// 辅助函数：把文件的修改时间设置为 UNIX 纪元后的 `epoch_secs` 秒。
pub fn set_modified(path: &Path, epoch_secs: u64) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(epoch_secs))
        .unwrap();
}
