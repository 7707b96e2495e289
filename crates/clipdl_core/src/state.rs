use crate::media_id::{extract_media_id, MediaId, Thumbnail};
use crate::time_range::TimeRange;
use crate::view_model::{AppViewModel, ClipView};
use crate::{FormSelection, JobRequest, JobStatus};

/// Monotonic counter identifying the current submission or metadata lookup.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
    Polling {
        job_id: String,
    },
    Terminal(Terminal),
    /// The client failed to create or follow the job.
    Errored {
        message: String,
    },
}

impl SessionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting | Self::Polling { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Completed {
        filename: Option<String>,
        download_url: Option<String>,
    },
    Failed {
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClipState {
    #[default]
    Off,
    /// Waiting for the media duration.
    Loading { generation: Generation },
    Ready(TimeRange),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    form: FormSelection,
    media_id: Option<MediaId>,
    thumbnail: Option<Thumbnail>,
    clip: ClipState,
    session: SessionState,
    progress: f64,
    generation: Generation,
    metadata_generation: Generation,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let clip = match &self.clip {
            ClipState::Off => ClipView::Off,
            ClipState::Loading { .. } => ClipView::Loading,
            ClipState::Ready(range) => ClipView::from_range(range),
        };
        AppViewModel {
            url: self.form.url.clone(),
            media_id: self.media_id.as_ref().map(|id| id.as_str().to_owned()),
            thumbnail_url: self.thumbnail.as_ref().map(Thumbnail::url),
            mode: self.form.mode,
            quality: self.form.quality,
            audio_format: self.form.audio_format,
            clip,
            session: self.session.clone(),
            progress: self.progress.round() as u8,
            can_submit: !self.form.url.trim().is_empty(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn time_range(&self) -> Option<&TimeRange> {
        match &self.clip {
            ClipState::Ready(range) => Some(range),
            _ => None,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormSelection {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn clip(&self) -> &ClipState {
        &self.clip
    }

    pub(crate) fn set_url(&mut self, raw: String) {
        self.media_id = extract_media_id(&raw);
        self.thumbnail = self.media_id.clone().map(Thumbnail::new);
        self.form.url = raw;
        self.dirty = true;
    }

    pub(crate) fn has_url(&self) -> bool {
        !self.form.url.trim().is_empty()
    }

    pub(crate) fn thumbnail_failed(&mut self) -> bool {
        let changed = self
            .thumbnail
            .as_mut()
            .is_some_and(Thumbnail::on_load_failed);
        self.dirty |= changed;
        changed
    }

    /// Starts a metadata lookup for the current URL, superseding any other.
    pub(crate) fn begin_metadata(&mut self) -> (Generation, String) {
        self.metadata_generation += 1;
        self.clip = ClipState::Loading {
            generation: self.metadata_generation,
        };
        self.dirty = true;
        (self.metadata_generation, self.form.url.trim().to_owned())
    }

    pub(crate) fn disable_clip(&mut self) {
        // Drop any lookup still in flight.
        self.metadata_generation += 1;
        if self.clip != ClipState::Off {
            self.clip = ClipState::Off;
            self.dirty = true;
        }
    }

    pub(crate) fn is_current_metadata(&self, generation: Generation) -> bool {
        matches!(self.clip, ClipState::Loading { generation: current } if current == generation)
    }

    pub(crate) fn set_duration(&mut self, duration: u32) {
        self.clip = match TimeRange::new(duration) {
            Some(range) => ClipState::Ready(range),
            None => ClipState::Off,
        };
        self.dirty = true;
    }

    pub(crate) fn edit_range(&mut self, edit: impl FnOnce(&mut TimeRange) -> bool) {
        if let ClipState::Ready(range) = &mut self.clip {
            self.dirty |= edit(range);
        }
    }

    /// Opens a new submission generation and returns the request to send.
    pub(crate) fn begin_submission(&mut self) -> (Generation, JobRequest) {
        self.generation += 1;
        self.session = SessionState::Submitting;
        self.progress = 0.0;
        self.dirty = true;
        (self.generation, self.form.build_request(self.time_range()))
    }

    /// Reports from the engine only count for the newest in-flight submission.
    pub(crate) fn is_current_job(&self, generation: Generation) -> bool {
        generation == self.generation && self.session.is_in_flight()
    }

    pub(crate) fn job_created(&mut self, job_id: String) {
        self.session = SessionState::Polling { job_id };
        self.dirty = true;
    }

    /// Shown progress never moves backwards within one submission.
    pub(crate) fn apply_progress(&mut self, progress: f64) {
        if !progress.is_finite() {
            return;
        }
        let progress = progress.clamp(0.0, 100.0);
        if progress > self.progress {
            self.progress = progress;
            self.dirty = true;
        }
    }

    pub(crate) fn finish(&mut self, status: JobStatus, download_url: Option<String>) {
        self.apply_progress(status.progress);
        self.session = SessionState::Terminal(match status.state {
            crate::JobState::Completed => Terminal::Completed {
                filename: status.filename,
                download_url,
            },
            _ => Terminal::Failed {
                message: status.message,
            },
        });
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.session = SessionState::Errored { message };
        self.dirty = true;
    }
}
