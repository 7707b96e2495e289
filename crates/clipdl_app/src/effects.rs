use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use clipdl_core::{Effect, Msg};
use clipdl_engine::{EngineEvent, EngineHandle, JobClient, JobEvent};
use clipdl_logging::{clip_info, clip_warn};

/// Executes core effects on the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(client: JobClient) -> Self {
        Self {
            engine: EngineHandle::new(client),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchMetadata { generation, url } => {
                    clip_info!("FetchMetadata generation={} url={}", generation, url);
                    self.engine.fetch_metadata(generation, url);
                }
                Effect::SubmitJob {
                    generation,
                    request,
                } => {
                    clip_info!(
                        "SubmitJob generation={} mode={:?} start={:?} end={:?} url={}",
                        generation,
                        request.mode,
                        request.start_time,
                        request.end_time,
                        request.url
                    );
                    self.engine.submit(generation, request);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine report.
    pub fn recv_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        match self.engine.recv_timeout(timeout) {
            Ok(event) => Ok(Some(map_event(event))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine stopped unexpectedly")]
pub struct EngineStopped;

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::MetadataLoaded { generation, info } => {
            let duration = info.duration_secs();
            if duration == 0 {
                clip_warn!(
                    "Video info reported no usable duration ({}), clip mode stays off",
                    info.duration
                );
            }
            Msg::MetadataLoaded {
                generation,
                duration,
            }
        }
        // Already logged by the engine. Not fatal: clip mode just stays off.
        EngineEvent::MetadataFailed { generation, error } => Msg::MetadataFailed {
            generation,
            message: error.user_message(),
        },
        EngineEvent::Job {
            generation,
            event: JobEvent::Submitted { job_id },
        } => Msg::JobCreated { generation, job_id },
        EngineEvent::Job {
            generation,
            event: JobEvent::Progress { progress, .. },
        } => Msg::JobProgress {
            generation,
            progress,
        },
        EngineEvent::JobCompleted { generation, result } => match result {
            Ok(outcome) => Msg::JobFinished {
                generation,
                status: outcome.status,
                download_url: outcome.download_url,
            },
            Err(error) => {
                clip_warn!("Job generation={} failed: {}", generation, error);
                Msg::JobErrored {
                    generation,
                    message: error.user_message(),
                }
            }
        },
    }
}
