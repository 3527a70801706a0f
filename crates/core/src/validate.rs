use crate::{
    error::{Result, UploadError},
    types::PendingFile,
};

/// Accept a declared media type of `audio/*` or `video/*`.
///
/// This only looks at the declared type string, never at the file contents.
pub fn validate_media_type(media_type: &str) -> Result<()> {
    if media_type.starts_with("audio/") || media_type.starts_with("video/") {
        Ok(())
    } else {
        Err(UploadError::UnsupportedMediaType {
            media_type: media_type.to_string(),
        })
    }
}

pub fn validate_file(file: &PendingFile) -> Result<()> {
    validate_media_type(&file.media_type)
}
