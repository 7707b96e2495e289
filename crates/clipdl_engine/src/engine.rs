use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use clipdl_core::{Generation, JobRequest};
use clipdl_logging::{clip_debug, clip_error, clip_warn};
use tokio_util::sync::CancellationToken;

use crate::{ClientError, EngineEvent, JobClient, JobEvent, ProgressSink};

enum EngineCommand {
    FetchMetadata { generation: Generation, url: String },
    Submit {
        generation: Generation,
        request: JobRequest,
    },
    Cancel,
}

/// Runs client work on a background tokio runtime.
///
/// At most one job is followed at a time: a new submission cancels the
/// previous one, whose loop then stops issuing requests.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(client: JobClient) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(client);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    clip_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut active: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::FetchMetadata { generation, url } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            fetch_metadata(&client, generation, &url, event_tx).await;
                        });
                    }
                    EngineCommand::Submit {
                        generation,
                        request,
                    } => {
                        if let Some(previous) = active.take() {
                            clip_debug!("Superseding previous job for generation {}", generation);
                            previous.cancel();
                        }
                        let cancel = CancellationToken::new();
                        active = Some(cancel.clone());
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            run_job(&client, generation, &request, event_tx, &cancel).await;
                        });
                    }
                    EngineCommand::Cancel => {
                        if let Some(previous) = active.take() {
                            previous.cancel();
                        }
                    }
                }
            }

            if let Some(previous) = active.take() {
                previous.cancel();
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn fetch_metadata(&self, generation: Generation, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchMetadata {
            generation,
            url: url.into(),
        });
    }

    pub fn submit(&self, generation: Generation, request: JobRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            generation,
            request,
        });
    }

    /// Stops following the current job. No cancel call reaches the backend.
    ///
    /// The `clipdl` binary never calls this because a new submission already
    /// supersedes the previous one. It is kept for embedders that need to
    /// abandon a job without starting another.
    pub fn cancel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }
}

struct ChannelProgressSink {
    generation: Generation,
    tx: mpsc::Sender<EngineEvent>,
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: JobEvent) {
        let _ = self.tx.send(EngineEvent::Job {
            generation: self.generation,
            event,
        });
    }
}

async fn fetch_metadata(
    client: &JobClient,
    generation: Generation,
    url: &str,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match client.video_info(url).await {
        Ok(info) => EngineEvent::MetadataLoaded { generation, info },
        Err(error) => {
            clip_warn!("Video info lookup failed for {}: {}", url, error);
            EngineEvent::MetadataFailed { generation, error }
        }
    };
    let _ = event_tx.send(event);
}

async fn run_job(
    client: &JobClient,
    generation: Generation,
    request: &JobRequest,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: &CancellationToken,
) {
    let sink = ChannelProgressSink {
        generation,
        tx: event_tx.clone(),
    };
    let result = client.submit_and_await(request, &sink, cancel).await;
    if let Err(ClientError::Cancelled) = result {
        clip_debug!("Job for generation {} cancelled", generation);
    }
    let _ = event_tx.send(EngineEvent::JobCompleted { generation, result });
}
