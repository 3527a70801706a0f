use std::fmt;

use crate::types::{AnalysisResult, Clip, Configuration};

pub const PREVIEW_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("Success"),
            Status::Failed => f.write_str("Failed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSummary {
    pub clip_count: u64,
    pub platform_count: usize,
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipView {
    pub label: String,
    pub confidence: String,
    pub time_range: String,
    pub duration: String,
    pub preview: String,
    pub keywords: Vec<String>,
    pub viral_indicators: Vec<String>,
}

/// Format with `digits` decimals, rounding the stored value to nearest.
/// Exact halves go up, matching JavaScript's `toFixed`.
fn fixed(value: f64, digits: i32) -> String {
    // An exact half at `digits` decimals is j / 2^(digits + 1) with j odd
    let halves = value * 2f64.powi(digits + 1);
    if halves.fract() == 0.0 && halves.rem_euclid(2.0) == 1.0 {
        let scale = 10f64.powi(digits);
        return format!("{:.*}", digits as usize, (value * scale).ceil() / scale);
    }
    format!("{:.*}", digits as usize, value)
}

/// Summary block for a result. The platform count comes from `config` as it
/// is now, which can differ from what was sent with the request.
pub fn summarize(result: &AnalysisResult, config: &Configuration) -> ResultSummary {
    ResultSummary {
        clip_count: result.clips_found,
        platform_count: config.platforms.len(),
        status: if result.success {
            Status::Success
        } else {
            Status::Failed
        },
    }
}

pub fn format_confidence(score: f64) -> String {
    format!("{}%", fixed(score * 100.0, 0))
}

pub fn format_seconds(seconds: f64) -> String {
    format!("{}s", fixed(seconds, 1))
}

/// First 150 characters of the transcript, always followed by `...`
pub fn transcript_preview(transcript: &str) -> String {
    let mut preview: String = transcript.chars().take(PREVIEW_CHARS).collect();
    preview.push_str(ELLIPSIS);
    preview
}

pub fn render_clip(index: usize, clip: &Clip) -> ClipView {
    ClipView {
        label: format!("Clip {}", index + 1),
        confidence: format_confidence(clip.confidence_score),
        time_range: format!(
            "{} - {}",
            format_seconds(clip.start_time),
            format_seconds(clip.end_time)
        ),
        duration: format_seconds(clip.duration),
        preview: transcript_preview(&clip.transcript),
        keywords: clip.keywords.clone().unwrap_or_default(),
        viral_indicators: clip.viral_indicators.clone().unwrap_or_default(),
    }
}

pub fn render_clips(result: &AnalysisResult) -> Vec<ClipView> {
    result
        .clips
        .iter()
        .enumerate()
        .map(|(i, clip)| render_clip(i, clip))
        .collect()
}

/// Format an analysis result as human-readable text
pub fn format_result_readable(result: &AnalysisResult, config: &Configuration) -> String {
    let summary = summarize(result, config);
    let mut output = String::new();

    output.push_str("# Analysis Complete!\n\n");

    if let Some(name) = &result.original_filename {
        output.push_str(&format!("**File:** {}\n\n", name));
    }

    output.push_str(&format!(
        "**Clips Detected:** {} | **Target Platforms:** {} | **Status:** {}\n\n",
        summary.clip_count, summary.platform_count, summary.status
    ));

    let clips = render_clips(result);
    if clips.is_empty() {
        return output;
    }

    output.push_str("## Detected Clips\n\n");
    for clip in clips {
        output.push_str(&format!("### {} (Score: {})\n\n", clip.label, clip.confidence));
        output.push_str(&format!(
            "{} ({} duration)\n\n",
            clip.time_range, clip.duration
        ));
        output.push_str(&format!("{}\n\n", clip.preview));
        if !clip.keywords.is_empty() {
            output.push_str(&format!("Keywords: {}\n\n", clip.keywords.join(", ")));
        }
        if !clip.viral_indicators.is_empty() {
            output.push_str(&format!(
                "Viral indicators: {}\n\n",
                clip.viral_indicators.join(", ")
            ));
        }
    }

    output
}
