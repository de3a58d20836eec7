//! Image card content: placeholder URI and `data:` URI handling for uploads.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Content of a freshly added image card.
pub const PLACEHOLDER_IMAGE_URI: &str = "https://via.placeholder.com/150";

/// Largest upload accepted, before base64 expansion.
///
/// Browser local storage quotas sit around 5 MiB for the whole board.
pub const MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Errors raised while turning an uploaded file into card content.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Image is too large ({0} bytes)")]
    TooLarge(usize),
    #[error("Image is empty")]
    Empty,
    #[error("Not a data URI")]
    NotDataUri,
    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// Image format for uploaded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/gif" => Some(ImageFormat::Gif),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Encode uploaded file bytes as an embeddable `data:` URI.
pub fn to_data_uri(data: &[u8]) -> Result<String, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Empty);
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ImageError::TooLarge(data.len()));
    }
    let format = ImageFormat::from_magic_bytes(data).ok_or(ImageError::UnsupportedFormat)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        STANDARD.encode(data)
    ))
}

/// Decode a base64 `data:` URI back into its format and bytes.
pub fn decode_data_uri(uri: &str) -> Result<(ImageFormat, Vec<u8>), ImageError> {
    let rest = uri.strip_prefix("data:").ok_or(ImageError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUri)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImageError::InvalidPayload("payload is not base64".to_string()))?;
    let format = ImageFormat::from_mime_type(mime).ok_or(ImageError::UnsupportedFormat)?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::InvalidPayload(e.to_string()))?;
    Ok((format, bytes))
}

/// Whether `content` is an embedded image rather than a remote URI.
pub fn is_data_uri(content: &str) -> bool {
    content.starts_with("data:")
}
