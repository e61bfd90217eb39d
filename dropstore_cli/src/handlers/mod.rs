pub mod list;
pub mod manage;
pub mod upload;

use std::io::{self, Read};
use crate::errors::CliError;

/// 读取标准输入的全部内容
pub(crate) fn read_stdin() -> Result<Vec<u8>, CliError> {
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(buffer)
}
