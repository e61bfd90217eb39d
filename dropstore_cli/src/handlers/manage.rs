use std::fs;
use std::path::PathBuf;
use dropstore::Store;
use crate::errors::CliError;
use crate::handlers::read_stdin;
use crate::ui::printer::print_record_details;

/// 处理查看命令
pub fn handle_show(store: &Store, token: &str) -> Result<(), CliError> {
    let record = store.lookup(token)?;
    print_record_details(&record, store.config().public_url(&record.name).as_deref());
    Ok(())
}

/// 处理重命名命令
pub fn handle_rename(store: &Store, token: &str, new_name: &str) -> Result<(), CliError> {
    let receipt = store.rename(token, new_name)?;
    println!("Renamed to '{}'.", receipt.file_name);
    if let Some(url) = receipt.url {
        println!("URL: {}", url);
    }
    Ok(())
}

/// 处理编辑命令
pub fn handle_edit(
    store: &Store,
    token: &str,
    paste: Option<String>,
    stdin: bool,
    from: Option<PathBuf>,
) -> Result<(), CliError> {
    let content = match (paste, from) {
        (Some(paste), _) => paste.into_bytes(),
        (None, Some(path)) => fs::read(path)?,
        (None, None) if stdin => read_stdin()?,
        (None, None) => return Err(CliError::NoContent),
    };
    let record = store.edit(token, &content)?;
    println!("Updated '{}' ({} bytes).", record.name, record.size_bytes);
    Ok(())
}

/// 处理删除命令
///
/// 给出密码时先校验；校验通过即视为已重新认证。
pub fn handle_delete(store: &Store, token: &str, password: Option<&str>) -> Result<(), CliError> {
    let reauthenticated = match password {
        Some(password) if store.config().check_password(password) => true,
        Some(_) => return Err(CliError::PasswordMismatch),
        None => false,
    };
    let quarantined = store.delete(token, reauthenticated)?;
    println!("Deleted. Moved to {}", quarantined.display());
    Ok(())
}
