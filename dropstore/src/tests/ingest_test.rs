use super::store_test::open_store;
use crate::common::record::MediaKind;
use crate::ingest::{IngestError, UploadRequest};
use crate::store::config::TenantConfig;
use crate::store::Store;
use std::fs;
use tempfile::tempdir;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[test]
fn test_upload_payload_successfully() {
    // 1. 准备环境
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    // 2. 执行操作
    let receipt = store.upload(&UploadRequest::payload(b"hello worl".to_vec())).unwrap();

    // 3. 断言结果
    assert_eq!(receipt.name, "0000");
    assert_eq!(receipt.extension, "");
    assert_eq!(receipt.file_name, "0000");
    assert_eq!(receipt.token.len(), 30);
    assert_eq!(fs::read(&receipt.path).unwrap(), b"hello worl");

    // 4. 验证令牌表
    assert_eq!(store.resolve(&receipt.token).unwrap(), receipt.path);
}

#[test]
fn test_upload_sniffs_payload_extension() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let receipt = store.upload(&UploadRequest::payload(PNG.to_vec())).unwrap();

    assert_eq!(receipt.extension, "png");
    assert_eq!(receipt.file_name, "0000.png");
    let record = store.lookup(&receipt.token).unwrap();
    assert_eq!(record.media_kind, MediaKind::Image);
    assert_eq!(record.inline_content, None);
}

#[test]
fn test_upload_file_is_moved_into_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    let store = open_store(&root);

    let source = dir.path().join("upload.tmp");
    fs::write(&source, b"moved content").unwrap();

    let receipt = store.upload(&UploadRequest::file(&source, "notes.txt")).unwrap();

    assert_eq!(receipt.file_name, "0000.txt");
    assert!(!source.exists());
    assert_eq!(fs::read(root.join("0000.txt")).unwrap(), b"moved content");
}

#[test]
fn test_upload_extension_override_is_sanitized() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let request = UploadRequest::payload(PNG.to_vec()).with_extension(".we!rd");
    let receipt = store.upload(&request).unwrap();

    assert_eq!(receipt.extension, "werd");
}

#[test]
fn test_upload_requested_name() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let first = store
        .upload(&UploadRequest::payload(b"a".to_vec()).with_name("my file"))
        .unwrap();
    // 名称已被占用时回退到生成的名称
    let second = store
        .upload(&UploadRequest::payload(b"b".to_vec()).with_name("my file"))
        .unwrap();

    assert_eq!(first.name, "my_file");
    assert_eq!(second.name, "0000");
}

#[test]
fn test_upload_link_is_stored_without_extension() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let receipt = store.upload(&UploadRequest::link("https://example.com/page")).unwrap();

    assert_eq!(receipt.extension, "");
    assert_eq!(fs::read_to_string(&receipt.path).unwrap(), "https://example.com/page");
}

#[test]
fn test_upload_rejects_non_http_link() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let result = store.upload(&UploadRequest::link("ftp://example.com/file"));
    assert!(matches!(result, Err(IngestError::InvalidLink(_))));
}

#[test]
fn test_upload_without_content() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let result = store.upload(&UploadRequest::default());
    assert!(matches!(result, Err(IngestError::NoContentSpecified)));

    // 同时提供两种内容同样无效
    let mut both = UploadRequest::payload(b"x".to_vec());
    both.link = Some("https://example.com".to_string());
    assert!(matches!(store.upload(&both), Err(IngestError::NoContentSpecified)));
}

#[test]
fn test_upload_disallowed_extension() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let request = UploadRequest::payload(b"<?php ?>".to_vec()).with_extension("PHP");
    let result = store.upload(&request);

    assert!(matches!(result, Err(IngestError::DisallowedExtension(ext)) if ext == "PHP"));
    assert_eq!(store.token_count(), 0);
}

#[test]
fn test_upload_payload_too_large() {
    let dir = tempdir().unwrap();
    let config = TenantConfig {
        image_path: dir.path().to_path_buf(),
        paste_max_size: 4,
        ..TenantConfig::default()
    };
    let store = Store::open(config).unwrap();

    let result = store.upload(&UploadRequest::payload(b"12345".to_vec()));
    assert!(matches!(result, Err(IngestError::PayloadTooLarge { size: 5, limit: 4 })));
}

#[test]
fn test_upload_name_exhausted() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).with_name_generator(|_: &TenantConfig| "dup".to_string());
    fs::write(dir.path().join("dup"), b"taken").unwrap();

    let result = store.upload(&UploadRequest::payload(b"new".to_vec()));

    assert!(matches!(result, Err(IngestError::NameExhausted(20))));
    assert_eq!(fs::read(dir.path().join("dup")).unwrap(), b"taken");
}
