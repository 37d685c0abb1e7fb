/// Detect the MIME type of an attachment from its file name, falling back
/// to magic bytes. Returns `None` when the format is unknown.
pub fn detect_mime_type(filename: &str, data: &[u8]) -> Option<&'static str> {
    let lower = filename.to_lowercase();
    let by_extension = match lower.rsplit_once('.').map(|(_, ext)| ext) {
        Some("pdf") => Some("application/pdf"),
        Some("png") => Some("image/png"),
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        Some("gif") => Some("image/gif"),
        Some("csv") => Some("text/csv"),
        Some("txt") => Some("text/plain"),
        Some("xml") => Some("application/xml"),
        Some("xlsx") => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        Some("ods") => Some("application/vnd.oasis.opendocument.spreadsheet"),
        Some("zip") => Some("application/zip"),
        _ => None,
    };
    if by_extension.is_some() {
        return by_extension;
    }

    if data.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("image/png");
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.starts_with(b"GIF8") {
        return Some("image/gif");
    }
    None
}
