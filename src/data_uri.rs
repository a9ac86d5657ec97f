//! Image payloads as they travel between the page and the Gemini request.
//!
//! The page reads every selected file as a data URI
//! (`data:<mime-type>;base64,<payload>`). Gemini wants the two halves apart,
//! as an inline part without the `data:` prefix.

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use once_cell::sync::Lazy;
use regex::Regex;

/// Mime type assumed when an upload does not carry a recognisable prefix.
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

static DATA_URI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:(image/[A-Za-z0-9_]+);base64,(.+)$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum DataUriError {
    #[error("unrecognised image data: {0}")]
    UnknownFormat(#[from] image::ImageError),

    #[error("unsupported image format: {0:?}")]
    UnsupportedFormat(ImageFormat),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 text, never decoded on this side.
    pub data: String,
}

impl ImagePayload {
    /// Splits a data URI into mime type and payload.
    ///
    /// Anything that does not match is passed through whole as a JPEG payload
    /// and left for the model to reject.
    pub fn parse_lenient(input: &str) -> Self {
        match DATA_URI_PATTERN.captures(input) {
            Some(caps) => Self {
                mime_type: caps[1].to_string(),
                data: caps[2].to_string(),
            },
            None => Self {
                mime_type: FALLBACK_MIME_TYPE.to_string(),
                data: input.to_string(),
            },
        }
    }

    /// Builds a payload from raw file bytes, sniffing the format from its
    /// magic number rather than trusting the client's content type.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DataUriError> {
        let format = image::guess_format(bytes)?;
        let mime_type = mime_type_for(format).ok_or(DataUriError::UnsupportedFormat(format))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: general_purpose::STANDARD.encode(bytes),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

// Formats Gemini accepts as inline image data, plus the common ones a phone
// camera or browser may hand us.
fn mime_type_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        ImageFormat::Avif => Some("image/avif"),
        _ => None,
    }
}
