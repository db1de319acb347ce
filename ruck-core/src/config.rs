///! Configuration for the ingestion core: upstream bases plus fetch policy.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Base URL of the JSON site API (summary and scoreboard endpoints)
    #[serde(default = "default_site_api_base")]
    pub site_api_base: String,

    /// Base URL of the public website. Lineup pages live here, and it also
    /// serves as the Origin/Referer the JSON API expects.
    #[serde(default = "default_web_base")]
    pub web_base: String,

    /// Region query parameter forwarded to the JSON API
    #[serde(default = "default_region")]
    pub region: String,

    /// Fetch client policy
    #[serde(default)]
    pub fetch: FetchPolicy,
}

/// Pacing, retry, and transport knobs for the fetch client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Static User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Fixed delay before every attempt, in milliseconds
    #[serde(default = "default_rate_delay_ms")]
    pub rate_delay_ms: u64,

    /// Upper bound of the random addition to the pre-attempt delay
    #[serde(default = "default_pace_jitter_ms")]
    pub pace_jitter_ms: u64,

    /// Attempt budget per request. The client clamps this to a hard
    /// ceiling of five no matter what the file says.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Cap on the exponential backoff delay, in milliseconds
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,

    /// Upper bound of the random addition to each backoff delay
    #[serde(default = "default_backoff_jitter_ms")]
    pub backoff_jitter_ms: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_site_api_base() -> String {
    "https://site.web.api.espn.com/apis/site/v2/sports/rugby".to_string()
}

fn default_web_base() -> String {
    "https://www.espn.com".to_string()
}

fn default_region() -> String {
    "us".to_string()
}

fn default_user_agent() -> String {
    "ruck/0.1 (rugby-lineups)".to_string()
}

fn default_rate_delay_ms() -> u64 {
    600
}

fn default_pace_jitter_ms() -> u64 {
    50
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_cap_ms() -> u64 {
    10_000
}

fn default_backoff_jitter_ms() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            site_api_base: default_site_api_base(),
            web_base: default_web_base(),
            region: default_region(),
            fetch: FetchPolicy::default(),
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            rate_delay_ms: default_rate_delay_ms(),
            pace_jitter_ms: default_pace_jitter_ms(),
            max_attempts: default_max_attempts(),
            backoff_cap_ms: default_backoff_cap_ms(),
            backoff_jitter_ms: default_backoff_jitter_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;

        let config: IngestConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }
}
