use axum::extract::Multipart;
use tracing::debug;

use super::api_error::ApiError;
use crate::error::ColorError;

pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".tiff", ".bmp", ".gif"];

pub fn is_supported_filename(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Pulls the first field carrying a filename out of the multipart body.
///
/// The extension is checked before the content is buffered.
pub async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_owned) else {
            debug!("Skipping multipart field {:?} without a filename", field.name());
            continue;
        };

        if !is_supported_filename(&filename) {
            return Err(ColorError::UnsupportedFormat.into());
        }

        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::EmptyUpload);
        }

        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::MissingFile)
}
