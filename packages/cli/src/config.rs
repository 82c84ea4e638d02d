// ABOUTME: Application configuration and credential storage
// ABOUTME: Explicit config object merged from file, environment, and flags

use std::env;
use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PMS_URL: &str = "https://pms.cisin.com";
const DEFAULT_MODEL: &str = "gemini-2.5-pro";

const ENV_PMS_URL: &str = "NAPE_PMS_URL";
const ENV_PMS_API_KEY: &str = "NAPE_PMS_API_KEY";
const ENV_GEMINI_API_KEY: &str = "NAPE_GEMINI_API_KEY";
const ENV_MODEL: &str = "NAPE_MODEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk credential store, the stand-in for the browser's local storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub pms_url: Option<String>,
    pub pms_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub model: Option<String>,
}

impl ConfigFile {
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("nape").join("config.toml"))
    }

    /// Loads the config file, treating a missing file as empty.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.clone(),
                source,
            })?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(&path, text).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Per-invocation settings given as flags; the last word over the config
/// file and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Base URL of the PMS
    #[arg(long, value_name = "URL")]
    pub pms_url: Option<String>,

    /// PMS API key
    #[arg(long, value_name = "KEY")]
    pub pms_api_key: Option<String>,

    /// Model API key
    #[arg(long, value_name = "KEY")]
    pub gemini_api_key: Option<String>,

    /// Model name
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,
}

/// The resolved configuration handed through the composition root.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pms_url: String,
    pub pms_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub model: String,
}

impl AppConfig {
    /// Config file first, environment variables over it.
    pub fn load() -> Result<Self, ConfigError> {
        let file = ConfigFile::load()?;
        Ok(Self::from_sources(file, |name| env::var(name).ok()))
    }

    /// Applies flag-level overrides on top of the resolved configuration.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(overrides.pms_url) {
            self.pms_url = url;
        }
        if let Some(key) = non_empty(overrides.pms_api_key) {
            self.pms_api_key = Some(key);
        }
        if let Some(key) = non_empty(overrides.gemini_api_key) {
            self.gemini_api_key = Some(key);
        }
        if let Some(model) = non_empty(overrides.model) {
            self.model = model;
        }
        self
    }

    fn from_sources(file: ConfigFile, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let pms_url = non_empty(lookup(ENV_PMS_URL))
            .or(file.pms_url)
            .unwrap_or_else(|| DEFAULT_PMS_URL.to_string());
        let model = non_empty(lookup(ENV_MODEL))
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            pms_url,
            pms_api_key: non_empty(lookup(ENV_PMS_API_KEY)).or(file.pms_api_key),
            gemini_api_key: non_empty(lookup(ENV_GEMINI_API_KEY)).or(file.gemini_api_key),
            model,
        }
    }
}

/// Masks key material for display: enough to recognize, not enough to leak.
pub fn mask_key(key: &str) -> String {
    if key.len() > 12 {
        format!("{}…{}", &key[..4], &key[key.len() - 4..])
    } else {
        "•".repeat(key.len())
    }
}
