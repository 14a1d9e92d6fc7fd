use std::time::Duration;

/// Environment variable naming the backend base URL.
pub const API_URL_VAR: &str = "SHIELDAGENT_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Interval between job status polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

/// Controls are reference data; they are refetched at most hourly.
pub const CONTROLS_STALE_TIME: Duration = Duration::from_secs(60 * 60);

pub const DEFAULT_FRAMEWORK: &str = "soc2";

/// Runtime settings for the compliance client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL every request path is resolved against, without a trailing slash.
    pub base_url: String,
    pub poll_interval: Duration,
    pub default_stale_time: Duration,
    pub controls_stale_time: Duration,
    /// Framework sent with analysis requests and control queries.
    pub framework: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            poll_interval: POLL_INTERVAL,
            default_stale_time: DEFAULT_STALE_TIME,
            controls_stale_time: CONTROLS_STALE_TIME,
            framework: DEFAULT_FRAMEWORK.to_string(),
        }
    }
}

impl ApiConfig {
    /// Uses `value` as the base URL when it is set and non-blank, otherwise the
    /// local default.
    pub fn with_base_url(value: Option<&str>) -> Self {
        let base_url = value
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Reads `SHIELDAGENT_API_URL` from the process environment.
    pub fn from_env() -> Self {
        Self::with_base_url(std::env::var(API_URL_VAR).ok().as_deref())
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_blank_uses_local_default() {
        assert_eq!(ApiConfig::with_base_url(None).base_url, DEFAULT_API_URL);
        assert_eq!(ApiConfig::with_base_url(Some("  ")).base_url, DEFAULT_API_URL);
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ApiConfig::with_base_url(Some("https://shield.example.com/api//"));
        assert_eq!(config.base_url, "https://shield.example.com/api");
        assert_eq!(config.url("/jobs"), "https://shield.example.com/api/jobs");
        assert_eq!(config.url("jobs"), "https://shield.example.com/api/jobs");
    }

    #[test]
    fn defaults_match_polling_and_staleness_windows() {
        let config = ApiConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.controls_stale_time, Duration::from_secs(3600));
        assert_eq!(config.framework, "soc2");
    }
}
