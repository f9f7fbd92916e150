//! Application configuration.
//!
//! Sources, lowest to highest priority: built-in defaults, the global
//! `<config dir>/poll-desktop/config.toml`, a project `./poll-desktop.toml`,
//! then `POLL_DESKTOP_*` environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "poll-desktop";
const PROJECT_CONFIG: &str = "poll-desktop.toml";
const ENV_PREFIX: &str = "POLL_DESKTOP_";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Mocha,
    Latte,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base address of the poll API, e.g. `http://127.0.0.1:8000/api`.
    pub api_base: String,
    /// Directory holding the persisted session. Defaults to the platform data dir.
    pub session_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub theme: Theme,
    pub window_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000/api".to_owned(),
            session_dir: None,
            request_timeout_secs: 10,
            theme: Theme::Mocha,
            window_title: "The Witcher".to_owned(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::layered(Self::global_config_path().as_deref(), Path::new(PROJECT_CONFIG))
            .extract()
            .map_err(Box::new)
    }

    fn layered(global: Option<&Path>, project: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(global) = global {
            figment = figment.merge(Toml::file(global));
        }
        figment
            .merge(Toml::file(project))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
    }

    pub fn session_dir(&self) -> PathBuf {
        self.session_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_NAME)))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
