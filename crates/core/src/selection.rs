use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{
    error::Result,
    types::{FileHandle, PendingFile},
};

/// Input coming from the drop target or the file picker.
#[derive(Clone, Debug)]
pub enum SelectionEvent {
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Vec<PendingFile>),
    Pick(Vec<PendingFile>),
}

/// Normalizes both selection sources to "first item only" and tracks the
/// presentational dragging flag.
#[derive(Debug, Default)]
pub struct SelectionAdapter {
    dragging: bool,
}

impl SelectionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn apply(&mut self, event: SelectionEvent) -> Option<PendingFile> {
        match event {
            SelectionEvent::DragEnter | SelectionEvent::DragOver => {
                self.dragging = true;
                None
            }
            SelectionEvent::DragLeave => {
                self.dragging = false;
                None
            }
            SelectionEvent::Drop(items) => {
                self.dragging = false;
                items.into_iter().next()
            }
            SelectionEvent::Pick(items) => items.into_iter().next(),
        }
    }
}

/// Declared media type for a file, derived from its extension
pub fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

impl PendingFile {
    /// Describe a file on disk without reading its contents.
    pub async fn from_path(path: impl Into<PathBuf>, media_type: Option<String>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media_type.unwrap_or_else(|| guess_media_type(&path).to_string());

        Ok(Self {
            name,
            media_type,
            size: metadata.len(),
            handle: FileHandle::Path(path),
        })
    }
}
