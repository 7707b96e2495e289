use crate::time_range::format_clock;
use crate::{AudioFormat, Handle, Mode, SessionState, TimeRange, VideoQuality};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub url: String,
    pub media_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub mode: Mode,
    pub quality: VideoQuality,
    pub audio_format: AudioFormat,
    pub clip: ClipView,
    pub session: SessionState,
    /// Rounded percentage, 0-100.
    pub progress: u8,
    pub can_submit: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClipView {
    #[default]
    Off,
    Loading,
    Ready(RangeView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeView {
    pub start: u32,
    pub end: u32,
    pub total: u32,
    pub start_percent: f64,
    pub end_percent: f64,
    pub start_label: String,
    pub end_label: String,
    pub total_label: String,
    pub span_label: String,
}

impl ClipView {
    pub(crate) fn from_range(range: &TimeRange) -> Self {
        Self::Ready(RangeView {
            start: range.start(),
            end: range.end(),
            total: range.total(),
            start_percent: range.percent(Handle::Start),
            end_percent: range.percent(Handle::End),
            start_label: format_clock(range.start()),
            end_label: format_clock(range.end()),
            total_label: format_clock(range.total()),
            span_label: format_clock(range.span()),
        })
    }
}
