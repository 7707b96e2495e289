use serde::{Deserialize, Serialize};

use crate::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Video,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "1080p")]
    P1080,
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
}

impl VideoQuality {
    pub const ALL: [VideoQuality; 4] = [Self::P1080, Self::P720, Self::P480, Self::P360];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::P1080 => "1080p",
            Self::P720 => "720p",
            Self::P480 => "480p",
            Self::P360 => "360p",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|quality| quality.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    M4a,
    Wav,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 3] = [Self::Mp3, Self::M4a, Self::Wav];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Wav => "wav",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Body of `POST /api/jobs`. Unset options are omitted from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub url: String,
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<VideoQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_format: Option<AudioFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// The user's current choices on the download form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSelection {
    pub url: String,
    pub mode: Mode,
    pub quality: VideoQuality,
    pub audio_format: AudioFormat,
}

impl FormSelection {
    /// Builds the job request. `clip` is the active time range, if clip mode
    /// is on; bounds left at their full-length defaults are not sent.
    pub fn build_request(&self, clip: Option<&TimeRange>) -> JobRequest {
        let mode = self.mode;
        JobRequest {
            url: self.url.trim().to_owned(),
            mode,
            quality: (mode == Mode::Video).then_some(self.quality),
            audio_format: (mode == Mode::Audio).then_some(self.audio_format),
            start_time: clip.and_then(TimeRange::clip_start),
            end_time: clip.and_then(TimeRange::clip_end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Response of `GET /api/jobs/{job_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub state: JobState,
    pub progress: f64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
