use clap::Parser;
use gempa_core::ports::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "gempa-watch")]
#[command(about = "Latest BMKG earthquake on a terminal map, refreshed every 30 seconds")]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Feed URL (overrides config)
    #[arg(long)]
    pub feed_url: Option<String>,

    /// Seconds between automatic refreshes (overrides config)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Start with the satellite base layer
    #[arg(long)]
    pub satellite: bool,

    /// Write logs to this file instead of the data directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.feed_url {
            config.feed.url = url.clone();
        }
        if let Some(interval) = self.interval {
            config.feed.poll_interval_secs = interval;
        }
        if let Some(timeout) = self.timeout {
            config.feed.request_timeout_secs = timeout;
        }
        if self.satellite {
            config.map.satellite = true;
        }
    }
}
