/// Magic-byte signatures: (offset, bytes, extension).
const SIGNATURES: &[(usize, &[u8], &str)] = &[
    (0, b"\x89PNG\r\n\x1a\n", "png"),
    (0, b"\xff\xd8\xff", "jpg"),
    (0, b"GIF87a", "gif"),
    (0, b"GIF89a", "gif"),
    (0, b"\x00\x00\x01\x00", "ico"),
    (0, b"%PDF-", "pdf"),
    (0, b"PK\x03\x04", "zip"),
    (0, b"\x1f\x8b", "gz"),
    (0, b"7z\xbc\xaf\x27\x1c", "7z"),
    (0, b"Rar!\x1a\x07", "rar"),
    (0, b"BZh", "bz2"),
    (0, b"\xfd7zXZ\x00", "xz"),
    (0, b"ID3", "mp3"),
    (0, b"\xff\xfb", "mp3"),
    (0, b"OggS", "ogg"),
    (0, b"fLaC", "flac"),
    (0, b"\x1a\x45\xdf\xa3", "webm"),
    (0, b"\x00asm", "wasm"),
    (0, b"\x7fELF", "elf"),
];

/// Guesses an extension from the leading bytes of some content.
///
/// Returns `None` for anything unrecognized, including plain text.
pub fn sniff_extension(prefix: &[u8]) -> Option<&'static str> {
    // RIFF 容器需要看子类型
    if prefix.len() >= 12 && &prefix[..4] == b"RIFF" {
        return match &prefix[8..12] {
            b"WEBP" => Some("webp"),
            b"WAVE" => Some("wav"),
            b"AVI " => Some("avi"),
            _ => None,
        };
    }
    if prefix.len() >= 12 && &prefix[4..8] == b"ftyp" {
        return match &prefix[8..12] {
            b"qt  " => Some("mov"),
            b"M4A " => Some("m4a"),
            _ => Some("mp4"),
        };
    }
    SIGNATURES
        .iter()
        .find(|(offset, magic, _)| prefix.len() >= offset + magic.len() && &prefix[*offset..offset + magic.len()] == *magic)
        .map(|(_, _, extension)| *extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_signatures() {
        assert_eq!(sniff_extension(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), Some("png"));
        assert_eq!(sniff_extension(b"\xff\xd8\xff\xe0\0\x10JFIF"), Some("jpg"));
        assert_eq!(sniff_extension(b"GIF89a\x01\0"), Some("gif"));
        assert_eq!(sniff_extension(b"%PDF-1.7\n"), Some("pdf"));
        assert_eq!(sniff_extension(b"RIFF\0\0\0\0WEBPVP8 "), Some("webp"));
        assert_eq!(sniff_extension(b"RIFF\0\0\0\0WAVEfmt "), Some("wav"));
        assert_eq!(sniff_extension(b"\0\0\0\x20ftypisom\0\0"), Some("mp4"));
        assert_eq!(sniff_extension(b"\0\0\0\x14ftypqt  \0\0"), Some("mov"));
    }

    #[test]
    fn test_text_and_short_input_are_unknown() {
        assert_eq!(sniff_extension(b"hello text"), None);
        assert_eq!(sniff_extension(b""), None);
        assert_eq!(sniff_extension(b"\x89PN"), None);
        assert_eq!(sniff_extension(b"RIFF\0\0\0\0JUNK"), None);
    }
}
