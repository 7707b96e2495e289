//! Settings for the `clipdl` binary.
//!
//! Values come from an optional RON file and are then overridden by command
//! line flags. The result is handed to the engine explicitly; nothing reads
//! the environment later on.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clipdl_engine::{ApiConfig, HttpSettings, PollPolicy};
use clipdl_logging::clip_info;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

const DEFAULT_CONFIG_FILE: &str = "clipdl.ron";
const DEFAULT_LOG_FILE: &str = "./clipdl.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("max_polls must be at least 1")]
    ZeroMaxPolls,
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub origin: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_polls: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api: ApiConfig,
    pub poll: PollPolicy,
    pub http: HttpSettings,
    pub log_file: PathBuf,
}

/// Loads `explicit`, or `./clipdl.ron` if it exists. Only an explicitly
/// named file is required to exist.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if explicit.is_none() && err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    clip_info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Merges file values with command line overrides and validates the result.
pub fn resolve(file: FileConfig, cli: &Cli) -> Result<Settings, ConfigError> {
    let defaults = ApiConfig::default();

    let api_base = cli
        .api_base
        .clone()
        .or(file.api_base)
        .filter(|base| !base.trim().is_empty());
    if let Some(base) = api_base.as_deref() {
        validate_url("api_base", base)?;
    }
    let origin = cli
        .origin
        .clone()
        .or(file.origin)
        .unwrap_or_else(|| defaults.origin().to_string());
    validate_url("origin", &origin)?;

    let mut poll = PollPolicy::default();
    if let Some(ms) = file.poll_interval_ms {
        if ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        poll.interval = Duration::from_millis(ms);
    }
    poll.max_polls = cli.max_polls.or(file.max_polls);
    if poll.max_polls == Some(0) {
        return Err(ConfigError::ZeroMaxPolls);
    }

    let mut http = HttpSettings::default();
    if let Some(secs) = file.connect_timeout_secs {
        http.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.request_timeout_secs {
        http.request_timeout = Duration::from_secs(secs);
    }

    Ok(Settings {
        api: ApiConfig::new(api_base, origin),
        poll,
        http,
        log_file: file
            .log_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
    })
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme {scheme}"),
        }),
    }
}
