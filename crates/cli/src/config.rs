//! Configuration loading from turnstile.toml.

use facts::host::{DEFAULT_BATTERY_PATH, DEFAULT_RFKILL_ROOT};
use facts::{Fact, Permission};
use gate::Policy;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Gate policy (threshold, time window, required permissions).
    #[serde(default)]
    pub policy: Policy,

    /// Answers given by the permission subsystem.
    #[serde(default)]
    pub permissions: PermissionsConfig,

    /// Where host facts are read from.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Fixed facts that replace host readings.
    #[serde(default)]
    pub facts: BTreeMap<String, Fact>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PermissionsConfig {
    /// Permissions granted when requested.
    #[serde(default)]
    pub granted: BTreeSet<Permission>,
}

#[derive(Debug, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_battery")]
    pub battery: PathBuf,

    #[serde(default = "default_rfkill")]
    pub rfkill: PathBuf,

    /// Defaults to `$HOME/.local/share/contacts`.
    pub contacts_dir: Option<PathBuf>,

    #[serde(default = "default_contact_extensions")]
    pub contact_extensions: Vec<String>,

    /// Defaults to `$HOME/Pictures`.
    pub images_dir: Option<PathBuf>,

    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            battery: default_battery(),
            rfkill: default_rfkill(),
            contacts_dir: None,
            contact_extensions: default_contact_extensions(),
            images_dir: None,
            image_extensions: default_image_extensions(),
        }
    }
}

fn default_battery() -> PathBuf {
    PathBuf::from(DEFAULT_BATTERY_PATH)
}

fn default_rfkill() -> PathBuf {
    PathBuf::from(DEFAULT_RFKILL_ROOT)
}

fn default_contact_extensions() -> Vec<String> {
    vec!["vcf".to_string()]
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp", "heic"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl SourcesConfig {
    pub fn contacts_dir(&self) -> PathBuf {
        self.contacts_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".local/share/contacts"))
    }

    pub fn images_dir(&self) -> PathBuf {
        self.images_dir
            .clone()
            .unwrap_or_else(|| home_dir().join("Pictures"))
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.policy.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error(transparent)]
    Policy(#[from] gate::Error),
}
