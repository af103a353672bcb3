//! Local image intake for the `analyze` command.
//!
//! Applies the same checks the browser uploader performs before sending:
//! the file must be an image and at most 20 MB.

use crate::ai::mime::detect_image_mime;
use crate::{Error, Result};
use base64::Engine as _;
use std::path::Path;

pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Read an image file and encode it as a `data:` URL.
pub fn load_image_data_url(path: &Path) -> Result<String> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(Error::Validation(format!(
            "{} is {} bytes; images must be 20MB or smaller",
            path.display(),
            size
        )));
    }

    let bytes = std::fs::read(path)?;
    encode_data_url(&bytes)
        .ok_or_else(|| Error::Validation(format!("{} is not an image file", path.display())))
}

/// Encode image bytes as a `data:` URL, or `None` when they are not an image.
pub fn encode_data_url(bytes: &[u8]) -> Option<String> {
    let mime = detect_image_mime(bytes)?;
    Some(format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}
