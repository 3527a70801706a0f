//! Viralclip Core Library
//!
//! Selecting a podcast audio/video file, submitting it to the clip analysis
//! service, and rendering the detected clips.

pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod selection;
pub mod service;
pub mod submission;
pub mod types;
pub mod validate;

// Re-export commonly used items at crate root
pub use config::ServiceConfig;
pub use controller::{Transition, WorkflowController, WorkflowEvent};
pub use error::{Result, UploadError};
pub use render::{
    ClipView, ResultSummary, Status, format_result_readable, render_clip, render_clips, summarize,
};
pub use selection::{SelectionAdapter, SelectionEvent, guess_media_type};
pub use service::{AnalysisService, HttpAnalysisService};
pub use submission::Submission;
pub use types::{
    AnalysisResult, Clip, Configuration, FileHandle, HealthStatus, PendingFile, Platform,
    PlatformSet, Podcaster, WorkflowState,
};
pub use validate::{validate_file, validate_media_type};
