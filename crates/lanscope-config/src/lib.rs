//! Shared configuration for the lanscope dashboard.
//!
//! TOML profiles with `LANSCOPE_`-prefixed env overrides, resolved into a
//! `lanscope_core::StoreConfig`. The TUI binary layers its CLI flags on
//! top; flags always win over file and env.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use lanscope_core::StoreConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global defaults applied to every profile.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Scan-request timeout in seconds (scans can run for minutes).
    #[serde(default = "default_scan_timeout")]
    pub scan_timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            scan_timeout: default_scan_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_scan_timeout() -> u64 {
    300
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g. "http://localhost:8080").
    pub backend: String,

    /// Override the default request timeout.
    pub timeout: Option<u64>,

    /// Override the default scan timeout.
    pub scan_timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "lanscope", "lanscope").map_or_else(
        || PathBuf::from(".lanscope/config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load configuration from the default path plus `LANSCOPE_` env vars.
pub fn load() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

/// Load configuration from an explicit file path plus env vars.
///
/// Precedence, lowest to highest: built-in defaults, TOML file,
/// environment (`LANSCOPE_DEFAULT_PROFILE`, nested keys via `__`).
pub fn load_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LANSCOPE_").split("__"))
        .extract()?;
    Ok(config)
}

impl Config {
    /// Resolve a profile (by name, or the default) into a `StoreConfig`.
    pub fn resolve(&self, profile_name: Option<&str>) -> Result<StoreConfig, ConfigError> {
        let name = profile_name
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());

        let profile = self
            .profiles
            .get(&name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.clone(),
            })?;

        let url = Url::parse(&profile.backend).map_err(|e| ConfigError::Validation {
            field: format!("profiles.{name}.backend"),
            reason: e.to_string(),
        })?;

        let mut store = StoreConfig::new(url);
        store.transport.timeout =
            Duration::from_secs(profile.timeout.unwrap_or(self.defaults.timeout));
        store.transport.scan_timeout =
            Duration::from_secs(profile.scan_timeout.unwrap_or(self.defaults.scan_timeout));
        Ok(store)
    }

    /// Resolve a bare URL (from a CLI flag) into a `StoreConfig`, applying
    /// the configured default timeouts.
    pub fn resolve_url(&self, raw: &str) -> Result<StoreConfig, ConfigError> {
        let url = Url::parse(raw).map_err(|e| ConfigError::Validation {
            field: "backend URL".into(),
            reason: e.to_string(),
        })?;

        let mut store = StoreConfig::new(url);
        store.transport.timeout = Duration::from_secs(self.defaults.timeout);
        store.transport.scan_timeout = Duration::from_secs(self.defaults.scan_timeout);
        Ok(store)
    }
}
