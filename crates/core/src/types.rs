use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Podcaster {
    #[default]
    AndrewHuberman,
    JoeRogan,
    ChrisWilliamson,
    Unknown,
}

impl Podcaster {
    pub const ALL: [Podcaster; 4] = [
        Podcaster::AndrewHuberman,
        Podcaster::JoeRogan,
        Podcaster::ChrisWilliamson,
        Podcaster::Unknown,
    ];

    /// Identifier sent to the analysis service
    pub fn as_str(&self) -> &'static str {
        match self {
            Podcaster::AndrewHuberman => "andrew_huberman",
            Podcaster::JoeRogan => "joe_rogan",
            Podcaster::ChrisWilliamson => "chris_williamson",
            Podcaster::Unknown => "unknown",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Podcaster::AndrewHuberman => "Andrew Huberman",
            Podcaster::JoeRogan => "Joe Rogan",
            Podcaster::ChrisWilliamson => "Chris Williamson",
            Podcaster::Unknown => "Other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Tiktok,
    Instagram,
    YoutubeShorts,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Tiktok, Platform::Instagram, Platform::YoutubeShorts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::YoutubeShorts => "youtube_shorts",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Tiktok => "Tiktok",
            Platform::Instagram => "Instagram",
            Platform::YoutubeShorts => "Youtube Shorts",
        }
    }
}

/// Target platforms in selection order. Membership only changes through
/// [`PlatformSet::toggle`], so an entry can never appear twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformSet {
    selected: Vec<Platform>,
}

impl PlatformSet {
    pub fn empty() -> Self {
        Self {
            selected: Vec::new(),
        }
    }

    pub fn toggle(&mut self, platform: Platform) {
        if let Some(pos) = self.selected.iter().position(|p| *p == platform) {
            self.selected.remove(pos);
        } else {
            self.selected.push(platform);
        }
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.selected.contains(&platform)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Platform> + '_ {
        self.selected.iter().copied()
    }
}

impl Default for PlatformSet {
    fn default() -> Self {
        Self {
            selected: vec![Platform::Tiktok, Platform::Instagram],
        }
    }
}

impl FromIterator<Platform> for PlatformSet {
    fn from_iter<I: IntoIterator<Item = Platform>>(iter: I) -> Self {
        let mut set = PlatformSet::empty();
        for platform in iter {
            if !set.contains(platform) {
                set.toggle(platform);
            }
        }
        set
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    pub podcaster: Podcaster,
    pub platforms: PlatformSet,
}

/// Where the bytes of a selected file live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileHandle {
    /// Read when the request is built
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub handle: FileHandle,
}

impl PendingFile {
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            handle: FileHandle::Memory(bytes),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Submitting,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub clips_found: u64,
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub podcaster: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_id: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub confidence_score: f64,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viral_indicators: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}
