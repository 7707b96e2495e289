use crate::{AudioFormat, Generation, Handle, JobStatus, Mode, VideoQuality};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL input.
    UrlChanged(String),
    ModeSelected(Mode),
    QualitySelected(VideoQuality),
    AudioFormatSelected(AudioFormat),
    /// User switched clip mode on or off.
    ClipToggled(bool),
    /// Media duration arrived for a metadata lookup.
    MetadataLoaded {
        generation: Generation,
        duration: u32,
    },
    /// Media duration lookup failed. Clip mode quietly turns off.
    MetadataFailed {
        generation: Generation,
        message: String,
    },
    /// Pointer moved while dragging a handle; `fraction` is the position
    /// across the track width.
    HandleDragged { handle: Handle, fraction: f64 },
    /// User typed a bound value.
    BoundEntered { handle: Handle, raw: String },
    /// The preview image failed to load.
    ThumbnailFailed,
    /// User clicked Download.
    DownloadClicked,
    /// Engine: the backend accepted the job.
    JobCreated {
        generation: Generation,
        job_id: String,
    },
    /// Engine: a non-terminal poll result.
    JobProgress {
        generation: Generation,
        progress: f64,
    },
    /// Engine: the job reached `completed` or `failed`. `download_url` is
    /// already absolute.
    JobFinished {
        generation: Generation,
        status: JobStatus,
        download_url: Option<String>,
    },
    /// Engine: submission or polling failed on the client side.
    JobErrored {
        generation: Generation,
        message: String,
    },
}
