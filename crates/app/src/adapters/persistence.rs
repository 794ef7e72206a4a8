use anyhow::{Context, Result};
use directories::ProjectDirs;
use gempa_core::ports::{AppConfig, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE: &str = "gempa-watch.toml";

const HEADER: &str = "\
# gempa-watch configuration
# Command-line flags (--feed-url, --interval, --timeout, --satellite) override these values.

";

/// TOML config file store
pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    /// Store at `<platform config dir>/gempa-watch/gempa-watch.toml`
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::default_location()?))
    }

    pub fn with_path<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn default_location() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "gempa-watch")
            .context("Failed to determine project directories")?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.config_path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ConfigStore for FileConfigStore {
    /// Read the config. A missing file is created with defaults.
    fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("No config at {}, writing defaults", self.config_path.display());
            let config = AppConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let path = self.config_path.display();
        let contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Write through a sibling temp file and rename it into place
    fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let body = toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
        let staging = self.staging_path();

        fs::write(&staging, format!("{HEADER}{body}"))
            .with_context(|| format!("Failed to write config file: {}", staging.display()))?;
        fs::rename(&staging, &self.config_path).with_context(|| {
            format!("Failed to replace config file: {}", self.config_path.display())
        })?;

        debug!("Saved config to {}", self.config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let store = FileConfigStore::with_path(&config_path);
        assert_eq!(store.load()?, AppConfig::default());
        assert!(config_path.exists());

        // and reads back the same
        assert_eq!(store.load()?, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_saved_file_has_header_and_no_leftovers() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileConfigStore::with_path(temp_dir.path().join(CONFIG_FILE));

        let mut config = AppConfig::default();
        config.feed.url = "http://localhost:8080/autogempa.json".to_string();
        config.feed.poll_interval_secs = 60;
        config.map.satellite = true;
        store.save(&config)?;

        let text = fs::read_to_string(store.path())?;
        assert!(text.starts_with("# gempa-watch configuration"));
        assert!(!store.staging_path().exists());
        assert_eq!(store.load()?, config);
        Ok(())
    }

    #[test]
    fn test_partial_config_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(
            &config_path,
            r#"
version = 1

[feed]
poll_interval_secs = 10
"#,
        )?;

        let config = FileConfigStore::with_path(&config_path).load()?;
        assert_eq!(config.feed.poll_interval_secs, 10);
        assert_eq!(config.feed.request_timeout_secs, 20);
        assert_eq!(config.map.home_zoom, 5.0);
        Ok(())
    }

    #[test]
    fn test_malformed_config_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "version = \"one\"")?;

        let err = FileConfigStore::with_path(&config_path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }

    #[test]
    fn test_default_location() -> Result<()> {
        let path = FileConfigStore::default_location()?;
        assert!(path.ends_with(CONFIG_FILE));
        Ok(())
    }
}
