//! Persistent extract settings and file-backed manager.

use sdp_api::auth::DEFAULT_ACCOUNTS_URL;
use sdp_api::config::{DEFAULT_ACCEPT, DEFAULT_API_BASE, DEFAULT_API_PATH};
use sdp_api::AuthScheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "sdp_requests_latest.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "sdp_task_worklogs.csv";

/// Authorization scheme as spelled in the settings file and on the command line.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AuthSchemeSetting {
    #[default]
    ZohoOauthtoken,
    Bearer,
}

impl From<AuthSchemeSetting> for AuthScheme {
    fn from(value: AuthSchemeSetting) -> Self {
        match value {
            AuthSchemeSetting::ZohoOauthtoken => AuthScheme::ZohoOAuthToken,
            AuthSchemeSetting::Bearer => AuthScheme::Bearer,
        }
    }
}

/// Settings persisted on disk. Every field has a default so partial files load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub api_path: String,
    pub accounts_url: String,
    pub accept: String,
    pub auth_scheme: AuthSchemeSetting,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub concurrency: usize,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            auth_scheme: AuthSchemeSetting::default(),
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            concurrency: 1,
            timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

/// Loads and saves [`Settings`] as JSON, by default in the platform config directory.
pub struct SettingsManager {
    path: PathBuf,
}

impl SettingsManager {
    /// Manager bound to `<config dir>/config.json`, or `None` when the platform
    /// has no home directory.
    pub fn new() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("com", "regalcream", "sdp-worklogs")?;
        Some(Self {
            path: dirs.config_dir().join("config.json"),
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring invalid settings file {}: {}",
                    self.path.display(),
                    err
                );
                Settings::default()
            }),
            Err(err) => {
                log::warn!("Cannot read settings file {}: {}", self.path.display(), err);
                Settings::default()
            }
        }
    }

    /// Persists settings, creating parent directories when needed.
    pub fn save(&self, settings: &Settings) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthSchemeSetting, Settings, SettingsManager};
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        env::temp_dir().join(format!("sdp-worklogs-tests-{name}-{nanos}/config.json"))
    }

    #[test]
    fn default_settings_have_expected_values() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "https://sdpondemand.manageengine.com");
        assert_eq!(settings.api_path, "app/itdesk/api/v3");
        assert_eq!(settings.accept, "application/vnd.manageengine.v3+json");
        assert_eq!(settings.auth_scheme, AuthSchemeSetting::ZohoOauthtoken);
        assert_eq!(settings.output_path, PathBuf::from("sdp_task_worklogs.csv"));
        assert_eq!(settings.concurrency, 1);
        assert!(settings.timeout_secs.is_none());
    }

    #[test]
    fn load_missing_file_returns_default() {
        let manager = SettingsManager::with_path(unique_path("missing"));
        assert_eq!(manager.load(), Settings::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = unique_path("roundtrip");
        let parent = path.parent().map(ToOwned::to_owned);

        let manager = SettingsManager::with_path(path.clone());
        let settings = Settings {
            base_url: "https://desk.example.com".to_string(),
            auth_scheme: AuthSchemeSetting::Bearer,
            concurrency: 4,
            timeout_secs: Some(20),
            ..Settings::default()
        };

        manager.save(&settings).expect("save should succeed");
        assert_eq!(manager.load(), settings);

        if let Some(parent) = parent {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = unique_path("partial");
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(&path, r#"{"base_url": "https://desk.example.com", "auth_scheme": "bearer"}"#)
            .expect("write partial settings");

        let loaded = SettingsManager::with_path(path.clone()).load();
        assert_eq!(loaded.base_url, "https://desk.example.com");
        assert_eq!(loaded.auth_scheme, AuthSchemeSetting::Bearer);
        assert_eq!(loaded.api_path, "app/itdesk/api/v3");

        let _ = fs::remove_dir_all(parent);
    }

    #[test]
    fn load_invalid_json_falls_back_to_default() {
        let path = unique_path("invalid");
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(&path, "not-valid-json").expect("write invalid settings");

        let loaded = SettingsManager::with_path(path.clone()).load();
        assert_eq!(loaded, Settings::default());

        let _ = fs::remove_dir_all(parent);
    }
}
