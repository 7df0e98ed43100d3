//! Loading images picked by the user from disk.

use promptchat_core::assistant::ImageUpload;
use promptchat_core::error::{ChatError, Result};
use std::fs;
use std::path::Path;

/// Reads `path` into an [`ImageUpload`], guessing the MIME type from the
/// file extension.
///
/// Files of any type are loaded; rejecting non-images is up to the caller.
pub fn load_image(path: &Path) -> Result<ImageUpload> {
    let bytes = fs::read(path)
        .map_err(|e| ChatError::io(format!("Failed to read {}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!(file = %file_name, mime = %mime_type, size = bytes.len(), "Loaded image file");
    Ok(ImageUpload::new(file_name, mime_type, bytes).with_source(path))
}
