//! File-extension to MIME-type lookup.
//!
//! A thin collaborator used when tagging multipart form parts. Unknown
//! extensions fall back to `application/octet-stream`.

/// Default MIME type for unknown extensions.
pub const DEFAULT: &str = "application/octet-stream";

/// Look up the MIME type for a bare file extension (no leading dot).
#[must_use]
pub fn from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "json" => "application/json",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "js" => "text/javascript",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "wasm" => "application/wasm",
        _ => DEFAULT,
    }
}

/// Infer a MIME type from the last dot-delimited segment of a filename.
#[must_use]
pub fn from_filename(filename: &str) -> &'static str {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => from_extension(ext),
        _ => DEFAULT,
    }
}
