//! Image attachments for the composer.
//!
//! An attachment is an image held inline (base64), ready to be rendered
//! or forwarded without touching the filesystem again. Terminals deliver a
//! dropped file as its path, so this module also knows how to recognise a
//! pasted image path and read it.

use std::path::{Path, PathBuf};

use base64::Engine;
use serde::Serialize;
use thiserror::Error;

/// Max accepted image size.
pub const MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024;

/// An image held inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// MIME type (always `image/*`).
    pub media_type: String,
    /// Base64-encoded payload.
    #[serde(skip)]
    pub data: String,
    /// Size of the decoded payload in bytes.
    pub byte_len: usize,
    /// File the image was read from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
}

impl Attachment {
    /// Short human label, e.g. `[image: image/png, 12 KB]`.
    pub fn label(&self) -> String {
        format!("[image: {}, {}]", self.media_type, format_size(self.byte_len))
    }

    pub fn with_source(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

/// Errors from reading an image file for attachment.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a file")]
    NotAFile { path: PathBuf },
    #[error("{path} is too large ({size} bytes, max 20MB)")]
    TooLarge { path: PathBuf, size: u64 },
}

/// Raw file contents plus whatever media type could be determined.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub media_type: Option<String>,
}

/// Encodes `bytes` as an inline attachment.
///
/// With a declared media type, only `image/*` is accepted. Without one, the
/// type is sniffed from the payload's magic bytes. Anything that is not an
/// image yields `None`.
pub fn decode_image(bytes: &[u8], media_type: Option<&str>) -> Option<Attachment> {
    let media_type = match media_type {
        Some(declared) => declared.trim().to_ascii_lowercase(),
        None => sniff_media_type(bytes)?.to_string(),
    };
    if !is_image_media_type(&media_type) {
        return None;
    }

    Some(Attachment {
        media_type,
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        byte_len: bytes.len(),
        source_path: None,
    })
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Detects the media type from magic bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

/// Reads an image file, enforcing the size cap.
///
/// The media type comes from the extension, then from the content.
pub fn read_image_file(path: &Path) -> Result<ImageFile, AttachmentError> {
    let metadata = std::fs::metadata(path).map_err(|source| AttachmentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(AttachmentError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| AttachmentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let media_type = path
        .to_str()
        .and_then(mime_type_for_extension)
        .or_else(|| sniff_media_type(&bytes))
        .map(str::to_string);

    Ok(ImageFile {
        path: path.to_path_buf(),
        bytes,
        media_type,
    })
}

/// Normalizes user-provided file paths.
///
/// Handles drag-and-drop shell escaping (`\ `, `\(`, `\)`), surrounding
/// quotes, `file://` prefixes and `~/`.
pub fn normalize_input_path(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed);
    let unprefixed = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let unescaped = unprefixed
        .replace("\\ ", " ")
        .replace("\\(", "(")
        .replace("\\)", ")");

    if let Some(rest) = unescaped.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }

    PathBuf::from(unescaped)
}

/// Returns the path if pasted text looks like a dropped image file.
pub fn pasted_image_path(text: &str) -> Option<PathBuf> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }
    let path = normalize_input_path(trimmed);
    let has_image_ext = path.to_str().and_then(mime_type_for_extension).is_some();
    (has_image_ext && path.is_file()).then_some(path)
}

/// MIME type inferred from a file extension, for supported image formats.
pub fn mime_type_for_extension(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension().and_then(|e| e.to_str())?;

    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{} KB", bytes.div_ceil(KB))
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn declared_image_type_is_accepted() {
        let attachment = decode_image(b"abc", Some("image/png")).unwrap();
        assert_eq!(attachment.media_type, "image/png");
        assert_eq!(attachment.byte_len, 3);
        assert_eq!(attachment.data, "YWJj");
    }

    #[test]
    fn declared_non_image_type_is_rejected() {
        assert!(decode_image(&PNG_MAGIC, Some("text/plain")).is_none());
        assert!(decode_image(b"abc", Some("image/")).is_none());
    }

    #[test]
    fn undeclared_type_is_sniffed() {
        let attachment = decode_image(&PNG_MAGIC, None).unwrap();
        assert_eq!(attachment.media_type, "image/png");
        assert!(decode_image(b"plain text", None).is_none());
    }

    #[test]
    fn label_formats_size() {
        let attachment = decode_image(&vec![0u8; 2048], Some("image/jpeg")).unwrap();
        assert_eq!(attachment.label(), "[image: image/jpeg, 2 KB]");
    }

    #[test]
    fn normalize_unescapes_drag_and_drop_paths() {
        assert_eq!(
            normalize_input_path("'/tmp/my\\ shot (1).png'"),
            PathBuf::from("/tmp/my shot (1).png")
        );
        assert_eq!(
            normalize_input_path("file:///tmp/a.png"),
            PathBuf::from("/tmp/a.png")
        );
    }

    #[test]
    fn pasted_image_path_requires_existing_image_file() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("drop.png");
        fs::write(&image, PNG_MAGIC).unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, "hi").unwrap();

        assert_eq!(pasted_image_path(image.to_str().unwrap()), Some(image));
        assert_eq!(pasted_image_path(text.to_str().unwrap()), None);
        assert_eq!(pasted_image_path("/nope/missing.png"), None);
        assert_eq!(pasted_image_path("hello world"), None);
    }

    #[test]
    fn read_image_file_detects_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_extension");
        fs::write(&path, PNG_MAGIC).unwrap();

        let file = read_image_file(&path).unwrap();
        assert_eq!(file.media_type.as_deref(), Some("image/png"));
        assert_eq!(file.bytes.len(), PNG_MAGIC.len());
    }

    #[test]
    fn read_image_file_reports_missing_file() {
        let err = read_image_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AttachmentError::Io { .. }));
    }

    #[test]
    fn read_image_file_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_ATTACHMENT_BYTES + 1).unwrap();

        let err = read_image_file(&path).unwrap_err();
        match err {
            AttachmentError::TooLarge { size, .. } => assert_eq!(size, MAX_ATTACHMENT_BYTES + 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_image_file_accepts_file_at_cap() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edge.png");
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_ATTACHMENT_BYTES).unwrap();

        let image = read_image_file(&path).unwrap();
        assert_eq!(image.bytes.len() as u64, MAX_ATTACHMENT_BYTES);
        assert_eq!(image.media_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn read_image_file_rejects_directories() {
        let dir = tempdir().unwrap();
        let err = read_image_file(dir.path()).unwrap_err();
        assert!(matches!(err, AttachmentError::NotAFile { .. }));
    }
}
