use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please select an audio or video file")]
    UnsupportedMediaType { media_type: String },

    #[error("Upload failed: {detail}")]
    ApplicationFailure { status: u16, detail: String },

    #[error("Upload failed: {reason}")]
    Transport { reason: String },
}

impl UploadError {
    pub fn transport(reason: impl ToString) -> Self {
        UploadError::Transport {
            reason: reason.to_string(),
        }
    }

    /// True for failures that happened after a request was issued
    pub fn is_exchange_failure(&self) -> bool {
        !matches!(self, UploadError::UnsupportedMediaType { .. })
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::transport(err)
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::transport(err)
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(err: serde_json::Error) -> Self {
        UploadError::transport(err)
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
