// Import necessary libraries and modules for file I/O and serialization.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::imager::DEFAULT_MEDIA_TIMEOUT;
use crate::narrator::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

pub const DEFAULT_SETTINGS_PATH: &str = "./data/settings.json";

// Environment variables that override values read from the settings file.
pub const SETTINGS_PATH_ENV: &str = "DM_NARRATOR_SETTINGS";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BIND_ENV: &str = "DM_NARRATOR_BIND";
pub const MODEL_ENV: &str = "DM_NARRATOR_MODEL";

// Server settings, stored as JSON. Missing fields fall back to their defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>, // API key for the hosted model provider.
    pub model: String,                  // Chat model used for narration.
    pub bind_address: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64, // Longest silence tolerated between streamed fragments.
    pub media_timeout_secs: u64,
    pub history_limit: usize,
    pub log_level: String,
    pub log_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            connect_timeout_secs: 10,
            idle_timeout_secs: 30,
            media_timeout_secs: DEFAULT_MEDIA_TIMEOUT.as_secs(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_level: "info".to_string(),
            log_dir: "./data/logs".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // Load from the configured path, then apply environment overrides.
    pub fn load() -> io::Result<Self> {
        let path =
            std::env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        let mut settings = Self::load_or_default(&path)?;
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    // A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> io::Result<Self> {
        match Self::load_settings_from_file(path) {
            Ok(settings) => Ok(settings),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.openai_api_key = Some(key);
        }
        if let Some(bind) = get(BIND_ENV) {
            self.bind_address = bind;
        }
        if let Some(model) = get(MODEL_ENV) {
            self.model = model;
        }
    }
}
