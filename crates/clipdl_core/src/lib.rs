//! Clipdl core: pure state machine, time range model and request building.
mod effect;
mod job;
mod media_id;
mod msg;
mod state;
mod time_range;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{AudioFormat, FormSelection, JobRequest, JobState, JobStatus, Mode, VideoQuality};
pub use media_id::{extract_media_id, MediaId, Thumbnail, ThumbnailQuality};
pub use msg::Msg;
pub use state::{AppState, ClipState, Generation, SessionState, Terminal};
pub use time_range::{format_clock, Handle, TimeRange};
pub use update::update;
pub use view_model::{AppViewModel, ClipView, RangeView};
