use clipdl_core::{JobRequest, JobStatus};
use clipdl_logging::{clip_debug, clip_warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::CreateJobResponse;
use crate::{ApiConfig, ClientError, HttpSettings, VideoInfo};

/// The backend job engine, as seen from the client.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// `POST /api/jobs`; returns the assigned job id.
    async fn create_job(&self, request: &JobRequest) -> Result<String, ClientError>;

    /// `GET /api/jobs/{job_id}`.
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ClientError>;

    /// `POST /api/video-info`.
    async fn video_info(&self, url: &str) -> Result<VideoInfo, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    config: ApiConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct VideoInfoRequest<'a> {
    url: &'a str,
}

impl ReqwestJobApi {
    pub fn new(config: ApiConfig, settings: &HttpSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        let endpoint = self.config.endpoint(path);
        reqwest::Url::parse(&endpoint)
            .map_err(|err| ClientError::InvalidUrl(format!("{endpoint}: {err}")))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.url(path)?;
        let body = serde_json::to_vec(body).map_err(|err| ClientError::Decode(err.to_string()))?;
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn create_job(&self, request: &JobRequest) -> Result<String, ClientError> {
        let response = self.post_json("/api/jobs", request).await?;
        let status = response.status();
        if !status.is_success() {
            // The error body is opaque to the client.
            clip_warn!("Job creation rejected with {}", status);
            return Err(ClientError::Submission);
        }
        let created: CreateJobResponse = decode_json(response).await?;
        clip_debug!("Job created job_id={}", created.job_id);
        Ok(created.job_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, ClientError> {
        let url = self.url(&format!("/api/jobs/{job_id}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            clip_warn!("Status poll for job_id={} returned {}", job_id, status);
            return Err(ClientError::NotFound);
        }
        decode_json(response).await
    }

    async fn video_info(&self, url: &str) -> Result<VideoInfo, ClientError> {
        let response = self
            .post_json("/api/video-info", &VideoInfoRequest { url })
            .await
            .map_err(|err| ClientError::MetadataFetch(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::MetadataFetch(format!("http status {status}")));
        }
        decode_json(response)
            .await
            .map_err(|err| ClientError::MetadataFetch(err.to_string()))
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Network(format!("request timed out: {err}"));
    }
    ClientError::Network(err.to_string())
}
