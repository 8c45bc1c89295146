//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars.
//!
//! Config lives at `~/.hnjobs/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::client::DEFAULT_API_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HnjobsConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub save_file: Option<String>,
    pub persistent_cache: Option<bool>,
    pub colors: Option<bool>,
    pub required_author: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SAVE_FILE: &str = "hnjobs.json";
pub const DEFAULT_REQUIRED_AUTHOR: &str = "whoishiring";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub save_file: PathBuf,
    /// Write fetched items into the save file so they survive restarts.
    pub persistent_cache: bool,
    pub colors: bool,
    /// Author every bulk-fetch root post must have.
    pub required_author: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&HnjobsConfig::default())
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.hnjobs/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hnjobs").join("config.toml"))
}

/// Load config from `~/.hnjobs/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HnjobsConfig::default()`.
pub fn load_config() -> Result<HnjobsConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HnjobsConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HnjobsConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<HnjobsConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HnjobsConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# hnjobs configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars.

# [general]
# save_file = "hnjobs.json"          # Or set HNJOBS_SAVE_FILE
# persistent_cache = true            # Keep fetched items across restarts
# colors = true
# required_author = "whoishiring"    # Author of accepted root posts

# [api]
# base_url = "https://hacker-news.firebaseio.com/v0"   # Or set HNJOBS_API_BASE_URL
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars.
pub fn resolve(config: &HnjobsConfig) -> ResolvedConfig {
    // API base URL: env → config → default
    let api_base_url = std::env::var("HNJOBS_API_BASE_URL")
        .ok()
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    // Save file: env → config → default (relative to the working directory)
    let save_file = std::env::var("HNJOBS_SAVE_FILE")
        .ok()
        .or_else(|| config.general.save_file.clone())
        .unwrap_or_else(|| DEFAULT_SAVE_FILE.to_string());

    ResolvedConfig {
        api_base_url,
        save_file: PathBuf::from(save_file),
        persistent_cache: config.general.persistent_cache.unwrap_or(true),
        colors: config.general.colors.unwrap_or(true),
        required_author: config
            .general
            .required_author
            .clone()
            .unwrap_or_else(|| DEFAULT_REQUIRED_AUTHOR.to_string()),
    }
}
