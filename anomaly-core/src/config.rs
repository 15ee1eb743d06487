use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::retry::{DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS, RetryPolicy};

/// Environment variable holding the weather API credential.
pub const API_KEY_VAR: &str = "API_KEY";
/// Environment variable overriding the weather API base URL.
pub const API_URL_VAR: &str = "WEATHER_API_URL";

pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Process-wide configuration, stored on disk as TOML.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// api_url = "https://api.openweathermap.org/data/2.5/onecall"
/// timeout_ms = 3000
/// retries = 3
/// retry_delay_ms = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout_ms: u64,
    pub retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Config file merged with `API_KEY` / `WEATHER_API_URL` from the process environment.
    pub fn from_environment() -> Result<Self> {
        Ok(Self::load()?.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Apply environment overrides, using `lookup` to read variables.
    ///
    /// Empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_VAR) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty(API_URL_VAR) {
            self.api_url = url;
        }

        self
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "temp-anomaly", "anomaly")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Returns the API key, if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Returns the API key or an error explaining how to configure one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured for the weather API.\n\
                 Hint: set {API_KEY_VAR} or run `anomaly configure` and enter your API key."
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.timeout(), Duration::from_millis(3000));
        assert_eq!(cfg.retry_policy(), RetryPolicy::new(3, 1000));
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn require_api_key_errors_when_missing() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: set API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.set_api_key("FROM_FILE".into());

        let cfg = cfg.with_env_overrides(env(&[
            (API_KEY_VAR, "FROM_ENV"),
            (API_URL_VAR, "http://localhost:9999/onecall"),
        ]));

        assert_eq!(cfg.api_key(), Some("FROM_ENV"));
        assert_eq!(cfg.api_url, "http://localhost:9999/onecall");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("FROM_FILE".into());

        let cfg = cfg.with_env_overrides(env(&[(API_KEY_VAR, ""), (API_URL_VAR, " ")]));

        assert_eq!(cfg.api_key(), Some("FROM_FILE"));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.retries = 1;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key(), Some("abc"));
        assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
