use crate::{AppState, ClipState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(raw) => {
            state.set_url(raw);
            // A new URL invalidates the old duration; refetch if clipping.
            if *state.clip() == ClipState::Off {
                Vec::new()
            } else {
                refresh_metadata(&mut state)
            }
        }
        Msg::ModeSelected(mode) => {
            state.form_mut().mode = mode;
            Vec::new()
        }
        Msg::QualitySelected(quality) => {
            state.form_mut().quality = quality;
            Vec::new()
        }
        Msg::AudioFormatSelected(format) => {
            state.form_mut().audio_format = format;
            Vec::new()
        }
        Msg::ClipToggled(true) => {
            if *state.clip() == ClipState::Off {
                refresh_metadata(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ClipToggled(false) => {
            state.disable_clip();
            Vec::new()
        }
        Msg::MetadataLoaded {
            generation,
            duration,
        } => {
            if state.is_current_metadata(generation) {
                state.set_duration(duration);
            }
            Vec::new()
        }
        Msg::MetadataFailed { generation, .. } => {
            if state.is_current_metadata(generation) {
                state.disable_clip();
            }
            Vec::new()
        }
        Msg::HandleDragged { handle, fraction } => {
            state.edit_range(|range| range.drag_update(handle, fraction));
            Vec::new()
        }
        Msg::BoundEntered { handle, raw } => {
            state.edit_range(|range| range.entry_update(handle, &raw));
            Vec::new()
        }
        Msg::ThumbnailFailed => {
            state.thumbnail_failed();
            Vec::new()
        }
        Msg::DownloadClicked => {
            if state.has_url() {
                let (generation, request) = state.begin_submission();
                vec![Effect::SubmitJob {
                    generation,
                    request,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::JobCreated { generation, job_id } => {
            if state.is_current_job(generation) {
                state.job_created(job_id);
            }
            Vec::new()
        }
        Msg::JobProgress {
            generation,
            progress,
        } => {
            if state.is_current_job(generation) {
                state.apply_progress(progress);
            }
            Vec::new()
        }
        Msg::JobFinished {
            generation,
            status,
            download_url,
        } => {
            if state.is_current_job(generation) && status.is_terminal() {
                state.finish(status, download_url);
            }
            Vec::new()
        }
        Msg::JobErrored {
            generation,
            message,
        } => {
            if state.is_current_job(generation) {
                state.fail(message);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn refresh_metadata(state: &mut AppState) -> Vec<Effect> {
    if !state.has_url() {
        state.disable_clip();
        return Vec::new();
    }
    let (generation, url) = state.begin_metadata();
    vec![Effect::FetchMetadata { generation, url }]
}
