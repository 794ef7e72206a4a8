use crate::error::{CoreError, Result as CoreResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://data.bmkg.go.id/DataMKG/TEWS/autogempa.json";
pub const DEFAULT_SHAKEMAP_BASE_URL: &str = "https://data.bmkg.go.id/DataMKG/TEWS/";

/// Configuration store interface
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage
    fn load(&self) -> Result<AppConfig>;

    /// Save configuration to storage
    fn save(&self, config: &AppConfig) -> Result<()>;
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub map: MapConfig,
}

/// Where and how often to poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub shakemap_base_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
}

/// Map view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Center of the default regional view
    pub home_lat: f64,
    pub home_lon: f64,
    pub home_zoom: f64,
    /// Zoom used when flying to a new event
    pub focus_zoom: f64,
    pub fly_duration_ms: u64,
    /// Start with the satellite base layer
    pub satellite: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            feed: FeedConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            shakemap_base_url: DEFAULT_SHAKEMAP_BASE_URL.to_string(),
            poll_interval_secs: 30,
            request_timeout_secs: 20,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            home_lat: -2.5,
            home_lon: 118.0,
            home_zoom: 5.0,
            focus_zoom: 8.0,
            fly_duration_ms: 2000,
            satellite: false,
        }
    }
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl MapConfig {
    pub fn fly_duration(&self) -> Duration {
        Duration::from_millis(self.fly_duration_ms)
    }
}

impl AppConfig {
    /// Reject settings the refresh cycle cannot run with
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: &str| {
            Err(CoreError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.feed.url.trim().is_empty() {
            return invalid("feed.url is empty");
        }
        if self.feed.shakemap_base_url.trim().is_empty() {
            return invalid("feed.shakemap_base_url is empty");
        }
        if self.feed.poll_interval_secs == 0 {
            return invalid("feed.poll_interval_secs must be at least 1");
        }
        if self.feed.request_timeout_secs == 0 {
            return invalid("feed.request_timeout_secs must be at least 1");
        }
        if !(self.map.home_lat.is_finite() && self.map.home_lon.is_finite()) {
            return invalid("map.home_lat and map.home_lon must be finite");
        }
        if !(self.map.home_zoom.is_finite() && self.map.focus_zoom.is_finite()) {
            return invalid("map zoom levels must be finite");
        }
        Ok(())
    }
}
