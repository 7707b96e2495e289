use clipdl_core::{Generation, JobStatus};
use serde::Deserialize;
use thiserror::Error;

/// Shown when an error has no text of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The backend refused or failed the job-creation request.
    #[error("Failed to create job")]
    Submission,
    /// A status poll returned a non-success response.
    #[error("Job not found")]
    NotFound,
    #[error("Failed to fetch video info: {0}")]
    MetadataFetch(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("cancelled")]
    Cancelled,
    #[error("job still running after {polls} polls")]
    PollLimitExceeded { polls: u32 },
}

impl ClientError {
    /// The single message shown to the user for this error.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Response of the video-info endpoint. Only `duration` is relied upon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: String,
    pub duration: f64,
    #[serde(default)]
    pub thumbnail: String,
}

impl VideoInfo {
    /// Duration in whole seconds; negative or non-finite values read as 0.
    pub fn duration_secs(&self) -> u32 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration.round().min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateJobResponse {
    pub job_id: String,
}

/// Terminal result of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub status: JobStatus,
    /// Absolute download URL, set only for completed jobs that report a path.
    pub download_url: Option<String>,
}

/// Observations made while a job is followed.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Submitted { job_id: String },
    Progress { job_id: String, progress: f64 },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: JobEvent);
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    MetadataLoaded {
        generation: Generation,
        info: VideoInfo,
    },
    MetadataFailed {
        generation: Generation,
        error: ClientError,
    },
    Job {
        generation: Generation,
        event: JobEvent,
    },
    JobCompleted {
        generation: Generation,
        result: Result<JobOutcome, ClientError>,
    },
}
