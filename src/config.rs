use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::Deserialize;

use crate::default_config_path;
use crate::domain::notification::NotificationTimings;
use crate::domain::schema::RoleOverrides;

pub const CONFIG_PATH_ENV: &str = "SERVICES_ADMIN_CONFIG";
pub const SHEET_ID_ENV: &str = "SERVICES_SHEET_ID";
pub const SHEET_NAME_ENV: &str = "SERVICES_SHEET_NAME";
pub const SCRIPT_URL_ENV: &str = "SERVICES_SCRIPT_URL";

const DEFAULT_SHEET_ID: &str = "1Kb-fhC1yiFJCyPO7TJDqnu-lQ1n1H6mLErlkSPc6yHc";
const DEFAULT_SHEET_NAME: &str = "Service DB";
const DEFAULT_SCRIPT_URL: &str = "https://script.google.com/macros/s/AKfycbyhmDsXWRThVsJCfAirTsI3o9EGE-oCcw2HKz1ERe4qxNWfcVoxMUr3sGa6yHJm-ckt/exec";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub success_secs: u64,
    pub error_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_secs: 3,
            error_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sheet_id: String,
    pub sheet_name: String,
    pub script_url: String,
    pub request_timeout_secs: u64,
    pub notifications: NotificationConfig,
    /// Column label -> role, for sheets whose headers do not carry the
    /// usual keywords.
    pub roles: RoleOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            request_timeout_secs: 30,
            notifications: NotificationConfig::default(),
            roles: RoleOverrides::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => default_config_path(),
    }
}

impl AppConfig {
    /// `.env` first, then the TOML file if present, then environment
    /// overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let path = config_path()?;
        let mut config = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(sheet_id) = non_empty(SHEET_ID_ENV) {
            self.sheet_id = sheet_id;
        }
        if let Some(sheet_name) = non_empty(SHEET_NAME_ENV) {
            self.sheet_name = sheet_name;
        }
        if let Some(script_url) = non_empty(SCRIPT_URL_ENV) {
            self.script_url = script_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sheet_id.trim().is_empty() {
            return Err(anyhow!("sheet_id is empty; set it in config.toml or {SHEET_ID_ENV}"));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(anyhow!("sheet_name is empty; set it in config.toml or {SHEET_NAME_ENV}"));
        }
        self.script_url()?;
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be >= 1"));
        }
        Ok(())
    }

    pub fn script_url(&self) -> Result<Url> {
        let url = Url::parse(&self.script_url)
            .with_context(|| format!("invalid script_url: {}", self.script_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("script_url must use http or https"));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_timings(&self) -> NotificationTimings {
        NotificationTimings {
            success: Duration::from_secs(self.notifications.success_secs),
            error: Duration::from_secs(self.notifications.error_secs),
        }
    }
}
