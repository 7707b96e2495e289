use std::sync::Arc;

use clipdl_core::JobStatus;
use clipdl_logging::{clip_debug, clip_info};
use tokio_util::sync::CancellationToken;

use crate::{ClientError, JobApi, JobEvent, PollPolicy, ProgressSink, Sleeper};

/// Follows one job until the backend reports a terminal state.
///
/// Polls are strictly sequential: each response is fully handled, terminal
/// check included, before the next request is issued. The delay between
/// polls is fixed and not adjusted for request latency.
#[derive(Clone)]
pub struct JobPoller {
    api: Arc<dyn JobApi>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
}

impl JobPoller {
    pub fn new(api: Arc<dyn JobApi>, sleeper: Arc<dyn Sleeper>, policy: PollPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub async fn poll(
        &self,
        job_id: &str,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<JobStatus, ClientError> {
        let mut polls: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                status = self.api.job_status(job_id) => status?,
            };
            polls = polls.saturating_add(1);

            sink.emit(JobEvent::Progress {
                job_id: job_id.to_owned(),
                progress: status.progress,
            });

            if status.is_terminal() {
                clip_info!(
                    "Job {} finished state={:?} after {} polls",
                    job_id,
                    status.state,
                    polls
                );
                return Ok(status);
            }
            clip_debug!(
                "Job {} state={:?} progress={}",
                job_id,
                status.state,
                status.progress
            );

            if let Some(max_polls) = self.policy.max_polls {
                if polls >= max_polls {
                    return Err(ClientError::PollLimitExceeded { polls });
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = self.sleeper.sleep(self.policy.interval) => {}
            }
        }
    }
}
