use crate::{Generation, JobRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look up the media duration for clip mode.
    FetchMetadata { generation: Generation, url: String },
    /// Create a job and follow it to a terminal state. Supersedes any
    /// earlier submission.
    SubmitJob {
        generation: Generation,
        request: JobRequest,
    },
}
