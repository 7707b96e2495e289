use std::sync::{Arc, Mutex};
use std::time::Duration;

use clipdl_core::{
    AudioFormat, FormSelection, Handle, JobRequest, JobState, Mode, TimeRange, VideoQuality,
};
use clipdl_engine::{
    ApiConfig, ClientError, HttpSettings, JobApi, JobClient, JobEvent, PollPolicy, ProgressSink,
    ReqwestJobApi, Sleeper,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<JobEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<JobEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    fn progress(events: &[JobEvent]) -> Vec<f64> {
        events
            .iter()
            .filter_map(|event| match event {
                JobEvent::Progress { progress, .. } => Some(*progress),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: JobEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Returns immediately and remembers what it was asked to wait for.
#[derive(Default)]
struct InstantSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn client_for(server: &MockServer, sleeper: Arc<InstantSleeper>) -> JobClient {
    let config = ApiConfig::new(Some(server.uri()), "https://site.y");
    let api = ReqwestJobApi::new(config.clone(), &HttpSettings::default()).unwrap();
    JobClient::new(Arc::new(api), sleeper, config, PollPolicy::default())
}

fn video_request(url: &str) -> JobRequest {
    let form = FormSelection {
        url: url.to_string(),
        mode: Mode::Video,
        quality: VideoQuality::P720,
        audio_format: AudioFormat::Mp3,
    };
    form.build_request(None)
}

#[tokio::test]
async fn submit_and_await_follows_job_to_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .and(body_json(json!({
            "url": "https://youtu.be/dQw4w9WgXcQ",
            "mode": "video",
            "quality": "720p"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j1",
            "state": "running",
            "progress": 40
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j1",
            "state": "completed",
            "progress": 100,
            "filename": "j1.mp4",
            "download_url": "/files/j1.mp4"
        })))
        .mount(&server)
        .await;

    let sleeper = Arc::new(InstantSleeper::default());
    let client = client_for(&server, sleeper.clone());
    let sink = TestSink::default();

    let outcome = client
        .submit_and_await(
            &video_request("https://youtu.be/dQw4w9WgXcQ"),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .expect("job completes");

    assert_eq!(outcome.status.state, JobState::Completed);
    assert_eq!(
        outcome.download_url,
        Some(format!("{}/files/j1.mp4", server.uri()))
    );

    let events = sink.take();
    assert_eq!(
        events.first(),
        Some(&JobEvent::Submitted {
            job_id: "j1".to_string()
        })
    );
    assert_eq!(TestSink::progress(&events), vec![40.0, 100.0]);
    assert_eq!(*sleeper.sleeps.lock().unwrap(), vec![Duration::from_secs(1)]);
}

#[tokio::test]
async fn failed_job_is_a_terminal_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j2" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/j2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j2",
            "state": "failed",
            "progress": 3.5,
            "message": "ERROR: Video unavailable"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(InstantSleeper::default()));
    let outcome = client
        .submit_and_await(
            &video_request("https://youtu.be/dQw4w9WgXcQ"),
            &TestSink::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status.state, JobState::Failed);
    assert_eq!(
        outcome.status.message.as_deref(),
        Some("ERROR: Video unavailable")
    );
    assert_eq!(outcome.download_url, None);
}

#[tokio::test]
async fn rejected_submission_is_opaque() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "bad mode" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(InstantSleeper::default()));
    let sink = TestSink::default();
    let err = client
        .submit_and_await(
            &video_request("https://youtu.be/dQw4w9WgXcQ"),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::Submission);
    assert_eq!(err.user_message(), "Failed to create job");
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn unknown_job_fails_with_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "gone" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Job not found" })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(InstantSleeper::default()));
    let err = client
        .submit_and_await(
            &video_request("https://youtu.be/dQw4w9WgXcQ"),
            &TestSink::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::NotFound);
    assert_eq!(err.user_message(), "Job not found");
}

#[tokio::test]
async fn unclipped_range_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .and(body_json(json!({
            "url": "https://youtu.be/dQw4w9WgXcQ",
            "mode": "audio",
            "audio_format": "mp3"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j3" })))
        .expect(1)
        .mount(&server)
        .await;

    let form = FormSelection {
        url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
        mode: Mode::Audio,
        ..FormSelection::default()
    };
    let range = TimeRange::new(212).unwrap();
    let request = form.build_request(Some(&range));

    let config = ApiConfig::new(Some(server.uri()), "https://site.y");
    let api = ReqwestJobApi::new(config, &HttpSettings::default()).unwrap();
    assert_eq!(api.create_job(&request).await.unwrap(), "j3");
}

#[tokio::test]
async fn clipped_range_is_sent_as_clock_strings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .and(body_json(json!({
            "url": "https://youtu.be/dQw4w9WgXcQ",
            "mode": "video",
            "quality": "1080p",
            "start_time": "0:42",
            "end_time": "1:00:00"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j4" })))
        .expect(1)
        .mount(&server)
        .await;

    let form = FormSelection {
        url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
        quality: VideoQuality::P1080,
        ..FormSelection::default()
    };
    let mut range = TimeRange::new(4000).unwrap();
    range.entry_update(Handle::Start, "42");
    range.entry_update(Handle::End, "3600");

    let config = ApiConfig::new(Some(server.uri()), "https://site.y");
    let api = ReqwestJobApi::new(config, &HttpSettings::default()).unwrap();
    assert_eq!(
        api.create_job(&form.build_request(Some(&range))).await.unwrap(),
        "j4"
    );
}

#[tokio::test]
async fn video_info_reads_duration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/video-info"))
        .and(body_json(json!({ "url": "https://youtu.be/dQw4w9WgXcQ" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Never Gonna Give You Up",
            "duration": 212,
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(InstantSleeper::default()));
    let info = client
        .video_info("https://youtu.be/dQw4w9WgXcQ")
        .await
        .unwrap();
    assert_eq!(info.duration_secs(), 212);
    assert_eq!(info.title, "Never Gonna Give You Up");
}

#[tokio::test]
async fn video_info_failure_is_metadata_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/video-info"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "nope" })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(InstantSleeper::default()));
    let err = client.video_info("not a url").await.unwrap_err();
    assert!(matches!(err, ClientError::MetadataFetch(_)), "{err:?}");
}

#[tokio::test]
async fn cancelled_before_submission_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j5" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(InstantSleeper::default()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .submit_and_await(
            &video_request("https://youtu.be/dQw4w9WgXcQ"),
            &TestSink::default(),
            &cancel,
        )
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Cancelled);
}
