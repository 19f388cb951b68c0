use crate::analytics::timeline::TrackerMetric;
use crate::error::{Error, Result};
use crate::model::MetricKey;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub team: TeamConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// GraphQL record store.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the env var holding the `x-api-key` value.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_season_limit")]
    pub season_limit: u32,
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            season_limit: default_season_limit(),
            history_limit: default_history_limit(),
        }
    }
}

impl StoreConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamConfig {
    /// Focus team; decides `@`/`vs` in opponent labels.
    #[serde(default = "default_team_name")]
    pub name: String,
    #[serde(default = "default_roster")]
    pub roster: Vec<String>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            name: default_team_name(),
            roster: default_roster(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_tracker_metric")]
    pub metric: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            metric: default_tracker_metric(),
        }
    }
}

impl TrackerConfig {
    pub fn tracker_metric(&self) -> Result<TrackerMetric> {
        let key: MetricKey = self.metric.parse()?;
        TrackerMetric::for_key(key)
            .ok_or_else(|| Error::config(format!("{key} is not a tracker metric")))
    }
}

// Defaults
fn default_endpoint() -> String {
    std::env::var("COURTSIDE_ENDPOINT").unwrap_or_default()
}
fn default_api_key_env() -> String {
    "COURTSIDE_API_KEY".into()
}
fn default_season_limit() -> u32 {
    2000
}
fn default_history_limit() -> u32 {
    82
}
fn default_team_name() -> String {
    "Nuggets".into()
}
fn default_roster() -> Vec<String> {
    [
        "Aaron Gordon",
        "Bruce Brown",
        "Cameron Johnson",
        "Christian Braun",
        "Curtis Jones",
        "DaRon Holmes II",
        "Hunter Tyson",
        "Jalen Pickett",
        "Jamal Murray",
        "Jonas Valanciunas",
        "Julian Strawther",
        "Nikola Jokic",
        "Peyton Watson",
        "Spencer Jones",
        "Tamar Bates",
        "Tim Hardaway Jr.",
        "Zeke Nnaji",
        "David Adelman",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_interval_ms() -> u64 {
    1500
}
fn default_tracker_metric() -> String {
    "ts".into()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    /// Checks that do not need the network. The API key is checked when the store is used.
    pub fn validate(&self) -> Result<()> {
        if self.store.endpoint.trim().is_empty() {
            return Err(Error::config(
                "store endpoint not set. Export COURTSIDE_ENDPOINT or set store.endpoint in config.toml",
            ));
        }
        if self.tracker.interval_ms == 0 {
            return Err(Error::config("tracker.interval_ms must be greater than 0"));
        }
        self.tracker.tracker_metric()?;
        Ok(())
    }
}
