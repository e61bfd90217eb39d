/// Splits a file name into its stem and extension, following the usual
/// `extname` rules: the extension is whatever follows the last `.`, and a
/// leading dot (`.bashrc`) does not start an extension.
///
/// Examples:
/// - "a.png" -> ("a", Some("png"))
/// - "a.tar.gz" -> ("a.tar", Some("gz"))
/// - ".bashrc" -> (".bashrc", None)
/// - "plain" -> ("plain", None)
/// - "trailing." -> ("trailing.", None)
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => {
            (&file_name[..idx], Some(&file_name[idx + 1..]))
        }
        _ => (file_name, None),
    }
}

/// Restricts a caller-supplied name to `[A-Za-z0-9_-]`, replacing every
/// other character with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Strips path-traversal material from an extension.
///
/// Only `[A-Za-z0-9_-]` survive, so separators, dots and NUL bytes can never
/// smuggle a directory component into the final file name. A leading dot
/// (".png") is accepted and dropped.
pub fn sanitize_extension(extension: &str) -> String {
    extension
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Joins a stem and an optional extension into a stored file name.
pub fn join_file_name(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, extension)
    }
}

/// Normalizes an entry of a configured extension list for comparison:
/// no leading dot, lowercase.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
