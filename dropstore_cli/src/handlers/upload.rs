use std::fs;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;
use dropstore::{Store, UploadRequest};
use crate::errors::CliError;
use crate::handlers::read_stdin;
use crate::ui::printer::print_receipt;

/// 命令行给出的上传内容
#[derive(Debug)]
pub enum UploadContent {
    File(PathBuf),
    Payload(Vec<u8>),
    Link(String),
}

impl UploadContent {
    pub fn from_args(
        file: Option<PathBuf>,
        paste: Option<String>,
        stdin: bool,
        link: Option<String>,
    ) -> Result<Self, CliError> {
        match (file, paste, stdin, link) {
            (Some(file), None, false, None) => Ok(UploadContent::File(file)),
            (None, Some(paste), false, None) => Ok(UploadContent::Payload(paste.into_bytes())),
            (None, None, true, None) => Ok(UploadContent::Payload(read_stdin()?)),
            (None, None, false, Some(link)) => Ok(UploadContent::Link(link)),
            _ => Err(CliError::NoContent),
        }
    }
}

/// 处理上传命令
pub fn handle_upload(
    store: &Store,
    content: UploadContent,
    name: Option<String>,
    extension: Option<String>,
    move_source: bool,
    json: bool,
) -> Result<(), CliError> {
    // 1. 准备上传请求。文件默认先复制到存储根目录下的临时文件，
    //    这样入库时只需同一文件系统内的重命名，源文件保持不变。
    let mut _staged = None;
    let request = match content {
        UploadContent::File(path) => {
            if !path.is_file() {
                return Err(CliError::NotAFile(path));
            }
            let declared = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if move_source {
                UploadRequest::file(&path, declared)
            } else {
                let staged = NamedTempFile::new_in(store.storage().root())?;
                fs::copy(&path, staged.path())?;
                debug!(source = %path.display(), staged = %staged.path().display(), "staged upload");
                let staged = staged.into_temp_path();
                let request = UploadRequest::file(staged.to_path_buf(), declared);
                _staged = Some(staged);
                request
            }
        }
        UploadContent::Payload(bytes) => UploadRequest::payload(bytes),
        UploadContent::Link(link) => UploadRequest::link(link),
    };
    let request = match name {
        Some(name) => request.with_name(name),
        None => request,
    };
    let request = match extension {
        Some(extension) => request.with_extension(extension),
        None => request,
    };

    // 2. 执行上传；临时文件在成功时已被移走，失败时由 TempPath 清理
    let receipt = store.upload(&request)?;

    // 3. 输出回执
    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        print_receipt(&receipt);
    }
    Ok(())
}
