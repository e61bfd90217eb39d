mod common;

use std::fs;
use common::{open_with, setup_store, tenant_config};
use dropstore::{StateBackend, Store, UploadRequest};
use tempfile::tempdir;

#[test]
fn test_tokens_survive_reopen() {
    let dir = tempdir().unwrap();
    let receipt = {
        let store = setup_store(&dir);
        store.upload(&UploadRequest::payload(b"durable".to_vec())).unwrap()
    };

    let store = Store::open(tenant_config(&dir)).unwrap();

    assert_eq!(store.resolve(&receipt.token).unwrap(), receipt.path);
    assert_eq!(store.token_count(), 1);
    assert_eq!(store.cached_count(), 1);
    let renamed = store.rename(&receipt.token, "kept").unwrap();
    assert_eq!(renamed.file_name, "kept");
}

#[test]
fn test_corrupt_state_starts_empty() {
    let dir = tempdir().unwrap();
    let receipt = {
        let store = setup_store(&dir);
        store.upload(&UploadRequest::payload(b"data".to_vec())).unwrap()
    };
    let state = dir.path().join("images").join(".dropstore");
    fs::write(state.join("tokens.json"), b"{ not json").unwrap();
    fs::write(state.join("cache.json"), b"[]").unwrap();

    let store = Store::open(tenant_config(&dir)).unwrap();

    // 令牌丢失，但对象本身仍可列出
    assert!(store.resolve(&receipt.token).is_none());
    let page = store.list(&store.query()).unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].token, None);
}

#[test]
fn test_stale_cache_entry_dropped_after_delete() {
    let dir = tempdir().unwrap();
    let store = setup_store(&dir);
    let receipt = store.upload(&UploadRequest::payload(b"short-lived".to_vec())).unwrap();
    assert_eq!(store.cached_count(), 1);

    store.delete(&receipt.token, false).unwrap();

    assert_eq!(store.cached_count(), 0);
    let reopened = Store::open(tenant_config(&dir)).unwrap();
    assert_eq!(reopened.cached_count(), 0);
    assert_eq!(reopened.token_count(), 0);
}

#[test]
fn test_edit_refreshes_cached_metadata() {
    let dir = tempdir().unwrap();
    let store = setup_store(&dir);
    let receipt = store.upload(&UploadRequest::payload(b"v1".to_vec())).unwrap();
    store.list(&store.query()).unwrap();

    store.edit(&receipt.token, b"version two").unwrap();

    let page = store.list(&store.query()).unwrap();
    assert_eq!(page.records[0].size_bytes, 11);
    assert_eq!(page.records[0].inline_content.as_deref(), Some("version two"));
}

#[test]
fn test_sqlite_state_and_external_state_dir() {
    let dir = tempdir().unwrap();
    let mut config = tenant_config(&dir);
    config.state_backend = StateBackend::Sqlite;
    config.state_dir = Some(dir.path().join("state"));

    let token = {
        let store = open_with(config.clone());
        store.upload(&UploadRequest::payload(b"sql".to_vec())).unwrap().token
    };
    assert!(dir.path().join("state").join("state.db").is_file());
    assert!(!dir.path().join("images").join(".dropstore").exists());

    let store = Store::open(config).unwrap();
    let record = store.lookup(&token).unwrap();
    assert_eq!(record.inline_content.as_deref(), Some("sql"));
}

#[test]
fn test_corrupt_sqlite_database_is_moved_aside() {
    let dir = tempdir().unwrap();
    let mut config = tenant_config(&dir);
    config.state_backend = StateBackend::Sqlite;
    let state = dir.path().join("images").join(".dropstore");
    fs::create_dir_all(&state).unwrap();
    fs::write(state.join("state.db"), vec![b'x'; 4096]).unwrap();

    let store = Store::open(config).unwrap();

    assert_eq!(store.token_count(), 0);
    let moved_aside = fs::read_dir(&state)
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| e.file_name().to_string_lossy().starts_with("state.db.corrupt-"));
    assert!(moved_aside);
}
