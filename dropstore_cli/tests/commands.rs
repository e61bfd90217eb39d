//!
//! # CLI Command Integration Tests
//!
//
// // # CLI 命令集成测试
// //

mod common;

use crate::common::{TestContext, field};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// Uploads a paste, then finds it in the listing and through `show`.
//
// // 上传一段文本，然后在列表和 `show` 中找到它。
#[test]
fn test_upload_list_show() -> anyhow::Result<()> {
    let context = TestContext::new(serde_json::json!({}))?;

    let receipt = context.paste("hello from the cli")?;
    let file_name = field(&receipt, "fileName");
    let token = field(&receipt, "token");
    assert_eq!(file_name.len(), 4);
    assert_eq!(token.len(), 30);
    assert_eq!(field(&receipt, "url"), format!("https://drop.example.com/{}", file_name));

    context
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(file_name.as_str()))
        .stdout(predicate::str::contains("plain"))
        .stdout(predicate::str::contains("1 object(s)."));

    context
        .cmd()
        .args(["show", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from the cli"));
    Ok(())
}

#[test]
fn test_upload_file_copies_by_default() -> anyhow::Result<()> {
    let context = TestContext::new(serde_json::json!({}))?;
    let source = context._temp_dir.path().join("photo.txt");
    fs::write(&source, "local file")?;

    context
        .cmd()
        .arg("upload")
        .arg(&source)
        .args(["--name", "holiday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name:  holiday.txt"))
        .stdout(predicate::str::contains("Token: "));

    assert!(source.exists());
    assert_eq!(fs::read_to_string(context.root.join("holiday.txt"))?, "local file");
    Ok(())
}

#[test]
fn test_upload_file_with_move() -> anyhow::Result<()> {
    let context = TestContext::new(serde_json::json!({}))?;
    let source = context._temp_dir.path().join("moved.md");
    fs::write(&source, "# moved")?;

    context
        .cmd()
        .arg("upload")
        .arg(&source)
        .arg("--move")
        .assert()
        .success();

    assert!(!source.exists());
    Ok(())
}

#[test]
fn test_upload_requires_content() -> anyhow::Result<()> {
    let context = TestContext::new(serde_json::json!({}))?;
    context.cmd().arg("upload").assert().failure();
    Ok(())
}

#[test]
fn test_upload_disallowed_extension_fails() -> anyhow::Result<()> {
    let context = TestContext::new(serde_json::json!({}))?;
    context
        .cmd()
        .args(["upload", "--paste", "<?php", "--ext", "php"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Disallowed file type"));
    Ok(())
}

#[test]
fn test_rename_edit_delete() -> anyhow::Result<()> {
    let context = TestContext::new(serde_json::json!({}))?;
    let receipt = context.paste("first draft")?;
    let token = field(&receipt, "token");

    context
        .cmd()
        .args(["rename", &token, "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed to 'notes'."));

    context
        .cmd()
        .args(["edit", &token, "--paste", "second draft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 'notes' (12 bytes)."));
    assert_eq!(fs::read_to_string(context.root.join("notes"))?, "second draft");

    context.cmd().args(["delete", &token]).assert().success();
    assert!(!context.root.join("notes").exists());
    assert!(context.root.join("deleted").join("notes").exists());

    // 令牌已被吊销
    context
        .cmd()
        .args(["show", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid or revoked token"));
    Ok(())
}

#[test]
fn test_delete_with_reauthentication() -> anyhow::Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_dropstore"))
        .args(["hash-password", "s3cret"])
        .output()?;
    let hash = String::from_utf8(output.stdout)?.trim().to_string();
    assert_eq!(hash.len(), 64);

    let context = TestContext::new(serde_json::json!({
        "password": hash,
        "uploadDeleteLink": false,
    }))?;
    let token = field(&context.paste("guarded")?, "token");

    context
        .cmd()
        .args(["delete", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains("re-authentication"));

    context
        .cmd()
        .args(["delete", &token, "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));

    context
        .cmd()
        .args(["delete", &token, "--password", "s3cret"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_list_json_and_filters() -> anyhow::Result<()> {
    let context = TestContext::new(serde_json::json!({ "pageSize": 2 }))?;
    for text in ["one", "two", "three"] {
        context.paste(text)?;
    }

    let output = context.cmd().args(["list", "--json", "--page", "all"]).output()?;
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(body["records"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["page"]["totalPages"], 2);

    context
        .cmd()
        .args(["list", "--images"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No objects found."));

    context
        .cmd()
        .args(["list", "--page", "last"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid page selector"));

    context
        .cmd()
        .args(["list", "--since", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
    Ok(())
}

#[test]
fn test_root_flag_uses_defaults() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("quick");

    Command::new(env!("CARGO_BIN_EXE_dropstore"))
        .arg("--root")
        .arg(&root)
        .args(["upload", "--link", "https://example.com/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token: "));

    assert!(root.is_dir());
    Ok(())
}
