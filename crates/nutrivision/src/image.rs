//! Image references: remote URLs and base64 data URLs.

use std::path::Path;

use base64::Engine;

use crate::types::{VisionError, VisionResult};

/// Longest prefix of a remote URL kept in log output.
const MAX_LOGGED_URL: usize = 120;

/// MIME type for a supported image file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Read a local image and encode it as a `data:<mime>;base64,...` URL.
pub fn data_url_from_file(path: impl AsRef<Path>) -> VisionResult<String> {
    let path = path.as_ref();
    let mime = mime_for_path(path).ok_or_else(|| {
        VisionError::InvalidInput(format!(
            "Unsupported image format: {} (expected png, jpeg, webp or gif)",
            path.display()
        ))
    })?;

    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(VisionError::InvalidInput(format!(
            "Image file is empty: {}",
            path.display()
        )));
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

/// Short, log-safe description of an image reference.
///
/// Data URLs are reduced to their media type and payload size.
pub fn describe_image_ref(image_ref: &str) -> String {
    if let Some(rest) = image_ref.strip_prefix("data:") {
        let (header, payload) = rest.split_once(',').unwrap_or((rest, ""));
        let media_type = header.split(';').next().filter(|m| !m.is_empty()).unwrap_or("unknown");
        return format!("data URL ({media_type}, {} bytes)", payload.len());
    }

    if image_ref.chars().count() > MAX_LOGGED_URL {
        let head: String = image_ref.chars().take(MAX_LOGGED_URL).collect();
        format!("{head}...")
    } else {
        image_ref.to_string()
    }
}
