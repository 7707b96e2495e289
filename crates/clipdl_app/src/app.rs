use std::time::Duration;

use clipdl_core::{update, AppState, ClipView, Handle, Mode, Msg, SessionState, Terminal};
use clipdl_engine::JobClient;
use clipdl_logging::{clip_info, clip_warn};

use crate::cli::JobArgs;
use crate::effects::{EffectRunner, EngineStopped};
use crate::render::Renderer;

const RECV_TIMEOUT: Duration = Duration::from_millis(250);

/// How a run ended, as far as the user is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { download_url: Option<String> },
    Failed { message: Option<String> },
    Errored { message: String },
}

pub struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    output: Vec<String>,
    echo: bool,
}

impl App {
    pub fn new(client: JobClient) -> Self {
        Self {
            state: AppState::new(),
            runner: EffectRunner::new(client),
            renderer: Renderer::default(),
            output: Vec::new(),
            echo: true,
        }
    }

    /// Runs one job from form entry to a terminal state.
    pub fn run(&mut self, job: &JobArgs) -> Result<RunOutcome, EngineStopped> {
        self.dispatch(Msg::UrlChanged(job.url.clone()));
        self.dispatch(Msg::ModeSelected(job.mode));
        match job.mode {
            Mode::Video => self.dispatch(Msg::QualitySelected(job.quality)),
            Mode::Audio => self.dispatch(Msg::AudioFormatSelected(job.audio_format)),
        }

        if job.wants_clip() {
            self.apply_clip(job)?;
        }

        self.dispatch(Msg::DownloadClicked);
        self.pump_until(|state| {
            !matches!(state.session(), SessionState::Submitting | SessionState::Polling { .. })
        })?;

        let outcome = match self.state.session().clone() {
            SessionState::Terminal(Terminal::Completed { download_url, .. }) => {
                RunOutcome::Completed { download_url }
            }
            SessionState::Terminal(Terminal::Failed { message }) => RunOutcome::Failed { message },
            SessionState::Errored { message } => RunOutcome::Errored { message },
            // Download was refused before anything was sent.
            SessionState::Idle | SessionState::Submitting | SessionState::Polling { .. } => {
                RunOutcome::Errored {
                    message: "Enter a media URL".to_string(),
                }
            }
        };
        clip_info!("Run finished: {:?}", outcome);
        Ok(outcome)
    }

    fn apply_clip(&mut self, job: &JobArgs) -> Result<(), EngineStopped> {
        self.dispatch(Msg::ClipToggled(true));
        self.pump_until(|state| state.view().clip != ClipView::Loading)?;

        if self.state.time_range().is_none() {
            clip_warn!("Clip range unavailable, converting the full media");
            return Ok(());
        }
        if let Some(raw) = &job.start {
            self.dispatch(Msg::BoundEntered {
                handle: Handle::Start,
                raw: raw.clone(),
            });
        }
        if let Some(raw) = &job.end {
            self.dispatch(Msg::BoundEntered {
                handle: Handle::End,
                raw: raw.clone(),
            });
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = update(state, msg);
        self.state = next;
        self.runner.enqueue(effects);

        if self.state.consume_dirty() {
            for line in self.renderer.render(&self.state.view()) {
                if self.echo {
                    println!("{line}");
                }
                self.output.push(line);
            }
        }
    }

    fn pump_until(&mut self, done: impl Fn(&AppState) -> bool) -> Result<(), EngineStopped> {
        while !done(&self.state) {
            if let Some(msg) = self.runner.recv_msg(RECV_TIMEOUT)? {
                self.dispatch(msg);
            }
        }
        Ok(())
    }
}
