use std::sync::Arc;

use clipdl_core::{JobRequest, JobState};
use clipdl_logging::clip_info;
use tokio_util::sync::CancellationToken;

use crate::{
    ApiConfig, ClientError, HttpSettings, JobApi, JobEvent, JobOutcome, JobPoller, PollPolicy,
    ProgressSink, ReqwestJobApi, Sleeper, TokioSleeper, VideoInfo,
};

/// Submits conversion jobs and follows them to completion.
#[derive(Clone)]
pub struct JobClient {
    api: Arc<dyn JobApi>,
    poller: JobPoller,
    config: ApiConfig,
}

impl JobClient {
    pub fn new(
        api: Arc<dyn JobApi>,
        sleeper: Arc<dyn Sleeper>,
        config: ApiConfig,
        policy: PollPolicy,
    ) -> Self {
        let poller = JobPoller::new(api.clone(), sleeper, policy);
        Self {
            api,
            poller,
            config,
        }
    }

    /// Client talking HTTP to the configured backend with real delays.
    pub fn connect(
        config: ApiConfig,
        settings: &HttpSettings,
        policy: PollPolicy,
    ) -> Result<Self, ClientError> {
        let api = ReqwestJobApi::new(config.clone(), settings)?;
        Ok(Self::new(
            Arc::new(api),
            Arc::new(TokioSleeper),
            config,
            policy,
        ))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Creates the job, then polls it until it completes or fails.
    ///
    /// A `failed` job is still `Ok`: the outcome carries the server message.
    pub async fn submit_and_await(
        &self,
        request: &JobRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<JobOutcome, ClientError> {
        let job_id = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            created = self.api.create_job(request) => created?,
        };
        clip_info!("Submitted job_id={} mode={:?}", job_id, request.mode);
        sink.emit(JobEvent::Submitted {
            job_id: job_id.clone(),
        });

        let status = self.poller.poll(&job_id, sink, cancel).await?;
        let download_url = match status.state {
            JobState::Completed => status
                .download_url
                .as_deref()
                .map(|path| self.config.to_absolute_url(path)),
            _ => None,
        };
        Ok(JobOutcome {
            status,
            download_url,
        })
    }

    pub async fn video_info(&self, url: &str) -> Result<VideoInfo, ClientError> {
        self.api.video_info(url).await
    }
}
