//! Inline image payloads
//!
//! Accepts bare base64 or a `data:<mime>;base64,<data>` URL.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::utils::{AppError, AppResult, ErrorCode};

/// MIME type used when neither the bytes nor the header tell us
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Validated image ready to be sent inline to the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload without the data-URL header
    pub data: String,
}

impl InlineImage {
    /// Validate a user supplied payload
    ///
    /// - must decode as standard base64
    /// - decoded size must not exceed `max_bytes`
    /// - MIME is sniffed from the bytes, then the data-URL header, then jpeg
    pub fn parse(payload: &str, max_bytes: usize) -> AppResult<Self> {
        let payload = payload.trim();
        let (header_mime, data) = split_data_url(payload);

        let bytes = STANDARD.decode(data).map_err(|e| {
            AppError::with_message(ErrorCode::ImageInvalid, format!("Image is not valid base64: {e}"))
        })?;
        if bytes.is_empty() {
            return Err(AppError::new(ErrorCode::ImageInvalid));
        }
        if bytes.len() > max_bytes {
            return Err(AppError::new(ErrorCode::ImageTooLarge)
                .with_detail("size", bytes.len())
                .with_detail("max", max_bytes));
        }

        let mime_type = image::guess_format(&bytes)
            .ok()
            .map(|f| f.to_mime_type().to_string())
            .or(header_mime)
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());

        Ok(Self {
            mime_type,
            data: data.to_string(),
        })
    }
}

/// Split `data:<mime>;base64,<data>` into (mime, data)
///
/// Payloads without a comma are treated as bare base64.
fn split_data_url(payload: &str) -> (Option<String>, &str) {
    match payload.split_once(',') {
        Some((header, data)) => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|h| h.split(';').next())
                .filter(|m| m.starts_with("image/"))
                .map(str::to_string);
            (mime, data)
        }
        None => (None, payload),
    }
}
