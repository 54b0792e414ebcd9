//! WanderGuide configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main WanderGuide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Planning backend connection
    pub api: ApiConfig,

    /// Client-local storage
    pub storage: StorageConfig,

    /// Wizard validation behavior
    pub wizard: WizardConfig,

    /// Trip assistant behavior
    pub chat: ChatConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .wanderguide.yml
        let local_config = PathBuf::from(".wanderguide.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/wanderguide/wanderguide.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("wanderguide").join("wanderguide.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply `WANDERGUIDE_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WANDERGUIDE_API_URL").filter(|u| !u.trim().is_empty()) {
            tracing::debug!(%url, "apply_env_overrides: base url override");
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("WANDERGUIDE_TIMEOUT_MS") {
            match raw.trim().parse() {
                Ok(ms) => self.api.timeout_ms = ms,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid WANDERGUIDE_TIMEOUT_MS"),
            }
        }
    }
}

/// Planning backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are relative to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Timeout for trip assistant calls in milliseconds
    #[serde(rename = "chat-timeout-ms")]
    pub chat_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_ms: 120_000,
            chat_timeout_ms: 30_000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_millis(self.chat_timeout_ms)
    }
}

/// Client-local storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the key-value store file
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/wanderguide on Linux)
        let path = dirs::data_local_dir()
            .map(|d| d.join("wanderguide"))
            .unwrap_or_else(|| PathBuf::from(".wanderguide"))
            .join("store.json");

        Self { path }
    }
}

/// Wizard validation behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Refuse to leave the destination step when the return date precedes departure
    #[serde(rename = "strict-dates")]
    pub strict_dates: bool,

    /// Trip length sent when the dates do not yield one
    #[serde(rename = "default-duration")]
    pub default_duration: u32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            strict_dates: false,
            default_duration: crate::api::DEFAULT_TRIP_DURATION,
        }
    }
}

/// Trip assistant behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of prior messages sent as conversational context
    #[serde(rename = "history-window")]
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_window: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(120));
        assert_eq!(config.api.chat_timeout(), Duration::from_secs(30));
        assert_eq!(config.chat.history_window, 5);
        assert!(!config.wizard.strict_dates);
        assert_eq!(config.wizard.default_duration, 5);
        assert!(config.storage.path.ends_with("store.json"));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
api:
  base-url: https://planner.example.com/api
  timeout-ms: 60000
  chat-timeout-ms: 15000

storage:
  path: /tmp/wg/store.json

wizard:
  strict-dates: true
  default-duration: 7

chat:
  history-window: 3

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.api.base_url, "https://planner.example.com/api");
        assert_eq!(config.api.timeout_ms, 60_000);
        assert_eq!(config.api.chat_timeout_ms, 15_000);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/wg/store.json"));
        assert!(config.wizard.strict_dates);
        assert_eq!(config.wizard.default_duration, 7);
        assert_eq!(config.chat.history_window, 3);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
api:
  timeout-ms: 5000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.api.timeout_ms, 5000);

        // Defaults for unspecified
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.chat.history_window, 5);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("WANDERGUIDE_API_URL", " http://10.0.0.5:5000/api "),
            ("WANDERGUIDE_TIMEOUT_MS", "9000"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.5:5000/api");
        assert_eq!(config.api.timeout_ms, 9000);
    }

    #[test]
    fn test_invalid_timeout_override_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| (key == "WANDERGUIDE_TIMEOUT_MS").then(|| "soon".to_string()));
        assert_eq!(config.api.timeout_ms, 120_000);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wg.yml");
        fs::write(&path, "chat:\n  history-window: 8\n").unwrap();

        let config = Config::load_file_chain(Some(&path)).unwrap();
        assert_eq!(config.chat.history_window, 8);

        let missing = dir.path().join("missing.yml");
        assert!(Config::load_file_chain(Some(&missing)).is_err());
    }
}
