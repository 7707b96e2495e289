use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use clipdl_core::{AudioFormat, Mode, VideoQuality};
use clipdl_logging::LogDestination;

/// Convert a media URL through a clipdl backend and print the download link.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Media URL to convert.
    pub url: String,

    /// Extract audio in this format (mp3, m4a, wav) instead of video.
    #[arg(long, value_name = "FORMAT", value_parser = parse_audio_format)]
    pub audio: Option<AudioFormat>,

    /// Video quality (1080p, 720p, 480p, 360p).
    #[arg(long, default_value = "720p", value_parser = parse_quality)]
    pub quality: VideoQuality,

    /// Clip start, in seconds.
    #[arg(long, value_name = "SECS")]
    pub start: Option<String>,

    /// Clip end, in seconds.
    #[arg(long, value_name = "SECS")]
    pub end: Option<String>,

    /// Backend base address. Overrides the config file.
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Origin used when no base address is set. Overrides the config file.
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,

    /// Config file (RON). Defaults to ./clipdl.ron when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Give up after this many status polls.
    #[arg(long, value_name = "N")]
    pub max_polls: Option<u32>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl LogTarget {
    pub fn destination(self, log_file: &Path) -> LogDestination {
        match self {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(log_file.to_path_buf()),
            LogTarget::Both => LogDestination::Both(log_file.to_path_buf()),
        }
    }
}

/// What to ask the backend for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobArgs {
    pub url: String,
    pub mode: Mode,
    pub quality: VideoQuality,
    pub audio_format: AudioFormat,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl JobArgs {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            url: cli.url.clone(),
            mode: if cli.audio.is_some() {
                Mode::Audio
            } else {
                Mode::Video
            },
            quality: cli.quality,
            audio_format: cli.audio.unwrap_or_default(),
            start: cli.start.clone(),
            end: cli.end.clone(),
        }
    }

    pub fn wants_clip(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

fn parse_audio_format(raw: &str) -> Result<AudioFormat, String> {
    AudioFormat::parse(raw).ok_or_else(|| format!("unsupported audio format {raw:?}"))
}

fn parse_quality(raw: &str) -> Result<VideoQuality, String> {
    VideoQuality::parse(raw).ok_or_else(|| format!("unsupported quality {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_video_at_720p() {
        let cli = Cli::try_parse_from(["clipdl", "https://youtu.be/dQw4w9WgXcQ"]).unwrap();
        let job = JobArgs::from_cli(&cli);

        assert_eq!(job.mode, Mode::Video);
        assert_eq!(job.quality, VideoQuality::P720);
        assert!(!job.wants_clip());
        assert_eq!(cli.log, LogTarget::File);
    }

    #[test]
    fn audio_flag_switches_mode() {
        let cli = Cli::try_parse_from([
            "clipdl",
            "https://youtu.be/dQw4w9WgXcQ",
            "--audio",
            "m4a",
            "--start",
            "30",
        ])
        .unwrap();
        let job = JobArgs::from_cli(&cli);

        assert_eq!(job.mode, Mode::Audio);
        assert_eq!(job.audio_format, AudioFormat::M4a);
        assert_eq!(job.start.as_deref(), Some("30"));
        assert!(job.wants_clip());
    }

    #[test]
    fn rejects_unknown_quality() {
        let err = Cli::try_parse_from(["clipdl", "https://youtu.be/x", "--quality", "4k"]);
        assert!(err.is_err());
    }
}
