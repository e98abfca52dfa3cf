//! Settings that survive restarts.
//!
//! Stores user preferences in ~/.datadeck/config.json. The API address and
//! session can be overridden with `DATADECK_API_URL` and `DATADECK_SESSION`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::theme::AppTheme;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const ENV_API_URL: &str = "DATADECK_API_URL";
pub const ENV_SESSION: &str = "DATADECK_SESSION";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: AppTheme,
    /// Base URL of the data API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Cookie header value carrying the session
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            theme: AppTheme::default(),
            api_base: default_api_base(),
            session_cookie: None,
        }
    }
}

impl Config {
    /// Get the config directory path (~/.datadeck)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".datadeck"))
    }

    /// Get the config file path (~/.datadeck/config.json)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load config from file (or defaults), then apply environment overrides
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_overrides(env::var(ENV_API_URL).ok(), env::var(ENV_SESSION).ok());
        config
    }

    fn load_file() -> Self {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    /// Non-blank values replace what the file said
    pub fn apply_overrides(&mut self, api_base: Option<String>, session: Option<String>) {
        if let Some(api_base) = api_base.filter(|v| !v.trim().is_empty()) {
            self.api_base = api_base.trim().to_string();
        }
        if let Some(session) = session.filter(|v| !v.trim().is_empty()) {
            self.session_cookie = Some(session.trim().to_string());
        }
    }

    /// Write the config back, creating ~/.datadeck on first save
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path()
            .ok_or_else(|| "Could not determine home directory".to_string())?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}
