//! Clipdl engine: HTTP transport, job polling and effect execution.
mod api;
mod client;
mod config;
mod engine;
mod poller;
mod sleep;
mod types;

pub use api::{JobApi, ReqwestJobApi};
pub use client::JobClient;
pub use config::{ApiConfig, HttpSettings, PollPolicy};
pub use engine::EngineHandle;
pub use poller::JobPoller;
pub use sleep::{Sleeper, TokioSleeper};
pub use types::{
    ClientError, EngineEvent, JobEvent, JobOutcome, ProgressSink, VideoInfo,
    DEFAULT_ERROR_MESSAGE,
};
