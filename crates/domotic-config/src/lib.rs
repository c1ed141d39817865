//! Shared configuration for the domotic CLI.
//!
//! TOML profiles merged with `DOMOTIC_*` environment variables, profile
//! resolution into transport settings, and the on-disk locations of the
//! durable and volatile session stores.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use domotic_api::TlsMode;
use domotic_api::endpoints::DEFAULT_BASE_URL;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Overrides where session and widget data live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
            storage_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause between a device write and the re-fetch, in milliseconds.
    #[serde(default = "default_courtesy_delay_ms")]
    pub courtesy_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            courtesy_delay_ms: default_courtesy_delay_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_courtesy_delay_ms() -> u64 {
    500
}

/// A named API server profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API origin (e.g., "http://localhost:8080").
    pub base_url: String,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,

    /// Override the write/re-fetch pause, in milliseconds.
    pub courtesy_delay_ms: Option<u64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: None,
            courtesy_delay_ms: None,
            ca_cert: None,
            insecure: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "domotic", "domotic")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("domotic");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then layer `DOMOTIC_*` variables on top.
///
/// Nested keys use a double underscore: `DOMOTIC_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DOMOTIC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// A profile with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub name: String,
    pub base_url: String,
    pub timeout: Duration,
    pub courtesy_delay: Duration,
    pub tls: TlsMode,
}

/// Pick the named profile, else the default one, else built-in defaults.
///
/// Naming a profile that does not exist is an error; a missing default
/// profile is not.
pub fn resolve_profile(cfg: &Config, name: Option<&str>) -> Result<ResolvedProfile, ConfigError> {
    let (name, profile) = match name {
        Some(name) => {
            let profile = cfg
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })?;
            (name.to_owned(), profile)
        }
        None => {
            let name = cfg.default_profile.clone().unwrap_or_else(|| "default".into());
            let profile = cfg.profiles.get(&name).cloned().unwrap_or_default();
            (name, profile)
        }
    };

    url::Url::parse(&profile.base_url).map_err(|e| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("{e}: {}", profile.base_url),
    })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca) = profile.ca_cert.clone() {
        TlsMode::CustomCa(ca)
    } else {
        TlsMode::System
    };

    Ok(ResolvedProfile {
        name,
        base_url: profile.base_url,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(cfg.defaults.timeout)),
        courtesy_delay: Duration::from_millis(
            profile
                .courtesy_delay_ms
                .unwrap_or(cfg.defaults.courtesy_delay_ms),
        ),
        tls,
    })
}

// ── Storage locations ───────────────────────────────────────────────

/// Files backing the two session tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    /// Survives restarts: remembered token, selected home id, widgets.
    pub durable: PathBuf,
    /// Cleared with the OS session: one-off token, cached selections.
    pub volatile: PathBuf,
}

/// Where the durable and volatile stores live.
///
/// `storage_dir` puts both side by side. Otherwise the durable file goes in
/// the platform data dir and the volatile one in the runtime dir, falling
/// back to the temp dir where no runtime dir exists.
pub fn storage_paths(cfg: &Config) -> StoragePaths {
    if let Some(dir) = &cfg.storage_dir {
        return StoragePaths {
            durable: dir.join("local.json"),
            volatile: dir.join("session.json"),
        };
    }

    let dirs = project_dirs();
    let durable_dir = dirs
        .as_ref()
        .map_or_else(|| dirs_fallback().join("data"), |d| d.data_dir().to_path_buf());
    let volatile_dir = dirs
        .as_ref()
        .and_then(|d| d.runtime_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::temp_dir().join("domotic"));

    StoragePaths {
        durable: durable_dir.join("local.json"),
        volatile: volatile_dir.join("session.json"),
    }
}
