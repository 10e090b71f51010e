use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Client configuration: where the backend lives plus the polling, retry and
/// highlight policy values the dashboard runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub max_connection_attempts: u32,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
    pub health_interval: Duration,
    pub highlight_ttl: Duration,
    pub poll_page_size: u32,
    pub shot_window_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout: Duration::from_secs(10),
            max_connection_attempts: 3,
            poll_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(5),
            health_interval: Duration::from_secs(10),
            highlight_ttl: Duration::from_secs(2),
            poll_page_size: 10,
            shot_window_cap: 50,
        }
    }
}

impl Config {
    /// Creates a config from environment variables (`.env` honored).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut api_base_url = std::env::var("HUNTWATCH_API_URL")
            .map_err(|_| anyhow!("HUNTWATCH_API_URL environment variable is required"))?;
        Url::parse(&api_base_url)
            .with_context(|| format!("HUNTWATCH_API_URL is not a valid URL: {}", api_base_url))?;

        // Ensure the URL carries the API base path and no trailing slash
        while api_base_url.ends_with('/') {
            api_base_url.pop();
        }
        if !api_base_url.ends_with("/api") {
            api_base_url.push_str("/api");
        }

        let mut config = Config {
            api_base_url,
            ..Config::default()
        };

        if let Ok(timeout) = std::env::var("HUNTWATCH_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .parse()
                .map_err(|_| anyhow!("HUNTWATCH_REQUEST_TIMEOUT_SECS must be a number"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(interval) = std::env::var("HUNTWATCH_POLL_INTERVAL_SECS") {
            let secs: u64 = interval
                .parse()
                .map_err(|_| anyhow!("HUNTWATCH_POLL_INTERVAL_SECS must be a number"))?;
            config.poll_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn get_api_base_url(&self) -> &str {
        &self.api_base_url
    }
}
