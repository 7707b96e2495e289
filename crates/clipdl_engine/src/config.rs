use std::time::Duration;

/// Where the backend lives.
///
/// All endpoints and completed-job download paths are rooted at `api_base`
/// when one is set, otherwise at `origin` (the same-origin case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_base: Option<String>,
    origin: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            origin: "http://localhost:8000".to_string(),
        }
    }
}

impl ApiConfig {
    /// A blank `api_base` counts as unset.
    pub fn new(api_base: Option<String>, origin: impl Into<String>) -> Self {
        Self {
            api_base: api_base.filter(|base| !base.trim().is_empty()),
            origin: origin.into(),
        }
    }

    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn root(&self) -> &str {
        self.api_base.as_deref().unwrap_or(&self.origin)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.root())
    }

    /// Turns a server-relative path such as `/downloads/clip.mp4` into a
    /// fetchable URL. Plain concatenation, no normalisation.
    pub fn to_absolute_url(&self, relative: &str) -> String {
        format!("{}{relative}", self.root())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between the end of one poll and the start of the next.
    pub interval: Duration,
    /// Optional ceiling on status fetches. `None` polls until terminal.
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_polls: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiConfig;

    #[test]
    fn base_takes_precedence_over_origin() {
        let config = ApiConfig::new(Some("https://api.x".to_string()), "https://site.y");
        assert_eq!(
            config.to_absolute_url("/files/a.mp3"),
            "https://api.x/files/a.mp3"
        );
        assert_eq!(config.endpoint("/api/jobs"), "https://api.x/api/jobs");
    }

    #[test]
    fn origin_used_without_base() {
        let config = ApiConfig::new(None, "https://site.y");
        assert_eq!(
            config.to_absolute_url("/files/a.mp3"),
            "https://site.y/files/a.mp3"
        );
    }

    #[test]
    fn blank_base_counts_as_unset() {
        let config = ApiConfig::new(Some("  ".to_string()), "https://site.y");
        assert_eq!(config.api_base(), None);
        assert_eq!(config.endpoint("/api/jobs/j1"), "https://site.y/api/jobs/j1");
    }

    #[test]
    fn concatenation_is_verbatim() {
        let config = ApiConfig::new(Some("https://api.x/".to_string()), "https://site.y");
        assert_eq!(config.to_absolute_url("/a"), "https://api.x//a");
        assert_eq!(config.to_absolute_url(""), "https://api.x/");
    }
}
