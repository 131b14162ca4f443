// Hand-built `multipart/form-data` bodies.
//
// Encoding is a pure function of the text fields, the file part and the
// boundary, so tests can pin the boundary and inspect the exact bytes.

use std::path::Path;
use uuid::Uuid;

const CRLF: &[u8] = b"\r\n";

/// The single file carried by an upload.
#[derive(Debug, Clone)]
pub struct FilePart<'a> {
    pub field_name: &'a str,
    pub file_name: &'a str,
    pub mime_type: &'a str,
    pub bytes: &'a [u8],
}

/// A fresh boundary for every request. 128 random bits make a collision
/// with field or file content practically impossible.
pub fn new_boundary() -> String {
    format!("----FloridayMagicWand{}", Uuid::new_v4().simple())
}

/// Header value announcing a multipart body with `boundary`.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

/// Quote-safe form of a `Content-Disposition` parameter: `"` becomes `%22`
/// and CR/LF are dropped, the way browsers encode them.
pub fn disposition_param(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .replace('"', "%22")
}

/// Encode `fields` followed by `file` as a multipart body.
pub fn encode(boundary: &str, fields: &[(String, String)], file: &FilePart<'_>) -> Vec<u8> {
    let delimiter = format!("--{boundary}");
    let mut lines: Vec<Vec<u8>> = Vec::with_capacity(fields.len() * 4 + 7);

    for (name, value) in fields {
        lines.push(delimiter.clone().into_bytes());
        lines.push(
            format!(
                "Content-Disposition: form-data; name=\"{}\"",
                disposition_param(name)
            )
            .into_bytes(),
        );
        lines.push(Vec::new());
        lines.push(value.clone().into_bytes());
    }

    lines.push(delimiter.into_bytes());
    lines.push(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
            disposition_param(file.field_name),
            disposition_param(file.file_name)
        )
        .into_bytes(),
    );
    lines.push(format!("Content-Type: {}", file.mime_type).into_bytes());
    lines.push(Vec::new());
    lines.push(file.bytes.to_vec());
    lines.push(format!("--{boundary}--").into_bytes());
    lines.push(Vec::new());

    lines.join(CRLF)
}

/// MIME type for `path` based on its extension, `application/octet-stream`
/// when unknown.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") | Some("jpe") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("avif") => "image/avif",
        Some("pdf") => "application/pdf",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
