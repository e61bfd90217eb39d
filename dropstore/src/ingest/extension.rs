use std::fs::File;
use std::io::{self, Read};
use crate::common::constants::SNIFF_PREFIX_LEN;
use crate::utils::path::{sanitize_extension, split_extension};
use super::sniff::sniff_extension;
use super::Content;

/// Resolves the stored extension of an upload, without leading dot.
///
/// Priority: a caller-supplied override (sanitized), then the empty
/// extension for links, then magic bytes when the content carries no
/// extractable extension of its own, then the declared file name's
/// extension. Anything unresolved is the empty extension.
pub(crate) fn resolve_extension(content: &Content<'_>, requested: Option<&str>) -> io::Result<String> {
    if let Some(requested) = requested {
        let sanitized = sanitize_extension(requested);
        if !sanitized.is_empty() {
            return Ok(sanitized);
        }
    }

    match content {
        Content::Link(_) => Ok(String::new()),
        Content::Payload(bytes) => {
            let prefix = &bytes[..bytes.len().min(SNIFF_PREFIX_LEN)];
            Ok(sniff_extension(prefix).unwrap_or_default().to_string())
        }
        Content::File { path, file_name } => {
            let declared = split_extension(file_name).1.map(sanitize_extension);
            match declared {
                Some(extension) if !extension.is_empty() => Ok(extension),
                _ => {
                    let prefix = read_prefix(path)?;
                    Ok(sniff_extension(&prefix).unwrap_or_default().to_string())
                }
            }
        }
    }
}

fn read_prefix(path: &std::path::Path) -> io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(SNIFF_PREFIX_LEN);
    File::open(path)?
        .take(SNIFF_PREFIX_LEN as u64)
        .read_to_end(&mut prefix)?;
    Ok(prefix)
}
