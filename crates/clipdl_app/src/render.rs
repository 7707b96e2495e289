use clipdl_core::{AppViewModel, ClipView, SessionState, Terminal};
use clipdl_engine::DEFAULT_ERROR_MESSAGE;

/// Turns view model changes into terminal lines. Only what changed since the
/// previous frame is printed.
#[derive(Debug, Default)]
pub struct Renderer {
    last: Option<AppViewModel>,
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();
        let last = self.last.take();

        let thumbnail_changed = last
            .as_ref()
            .map_or(true, |last| last.thumbnail_url != view.thumbnail_url);
        if thumbnail_changed {
            if let Some(url) = &view.thumbnail_url {
                lines.push(format!("Preview: {url}"));
            }
        }

        let clip_changed = last.as_ref().map_or(view.clip != ClipView::Off, |last| {
            last.clip != view.clip
        });
        if clip_changed {
            lines.push(clip_line(&view.clip));
        }

        let progress_changed = last
            .as_ref()
            .map_or(true, |last| last.progress != view.progress);
        if progress_changed && view.session.is_in_flight() && view.progress > 0 {
            lines.push(format!("Progress: {}%", view.progress));
        }

        let session_changed = last
            .as_ref()
            .map_or(view.session != SessionState::Idle, |last| {
                last.session != view.session
            });
        if session_changed {
            if let Some(line) = session_line(view) {
                lines.push(line);
            }
        }

        self.last = Some(view.clone());
        lines
    }
}

fn clip_line(clip: &ClipView) -> String {
    match clip {
        ClipView::Off => "Clip: off".to_string(),
        ClipView::Loading => "Clip: fetching duration...".to_string(),
        ClipView::Ready(range) => format!(
            "Clip: {} - {} of {} (selected {})",
            range.start_label, range.end_label, range.total_label, range.span_label
        ),
    }
}

fn session_line(view: &AppViewModel) -> Option<String> {
    let line = match &view.session {
        SessionState::Idle => return None,
        SessionState::Submitting => "Submitting job...".to_string(),
        SessionState::Polling { job_id } => format!("Job {job_id} accepted, waiting for backend"),
        SessionState::Terminal(Terminal::Completed { download_url, .. }) => match download_url {
            Some(url) => format!("Ready: {url}"),
            None => "Completed".to_string(),
        },
        SessionState::Terminal(Terminal::Failed { message }) => format!(
            "Download failed: {}",
            message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE)
        ),
        SessionState::Errored { message } => format!("Error: {message}"),
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipdl_core::RangeView;
    use pretty_assertions::assert_eq;

    fn view() -> AppViewModel {
        AppViewModel {
            url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            thumbnail_url: Some(
                "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string(),
            ),
            can_submit: true,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn first_frame_shows_preview_only() {
        let mut renderer = Renderer::default();
        assert_eq!(
            renderer.render(&view()),
            vec!["Preview: https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"]
        );
        assert!(renderer.render(&view()).is_empty());
    }

    #[test]
    fn clip_range_is_described() {
        let mut renderer = Renderer::default();
        renderer.render(&view());

        let mut next = view();
        next.clip = ClipView::Ready(RangeView {
            start: 30,
            end: 105,
            total: 212,
            start_percent: 14.15,
            end_percent: 49.53,
            start_label: "0:30".to_string(),
            end_label: "1:45".to_string(),
            total_label: "3:32".to_string(),
            span_label: "1:15".to_string(),
        });
        assert_eq!(
            renderer.render(&next),
            vec!["Clip: 0:30 - 1:45 of 3:32 (selected 1:15)"]
        );
    }

    #[test]
    fn progress_then_result() {
        let mut renderer = Renderer::default();
        renderer.render(&view());

        let mut polling = view();
        polling.session = SessionState::Polling {
            job_id: "j1".to_string(),
        };
        polling.progress = 40;
        assert_eq!(
            renderer.render(&polling),
            vec!["Progress: 40%", "Job j1 accepted, waiting for backend"]
        );

        let mut done = polling.clone();
        done.progress = 100;
        done.session = SessionState::Terminal(Terminal::Completed {
            filename: None,
            download_url: Some("https://site.y/files/j1.mp4".to_string()),
        });
        assert_eq!(
            renderer.render(&done),
            vec!["Ready: https://site.y/files/j1.mp4"]
        );
    }

    #[test]
    fn failure_without_message_uses_default_text() {
        let mut renderer = Renderer::default();
        let mut failed = view();
        failed.session = SessionState::Terminal(Terminal::Failed { message: None });

        let lines = renderer.render(&failed);
        assert_eq!(lines.last().unwrap(), "Download failed: Something went wrong");
    }
}
