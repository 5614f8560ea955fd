//! Configuration loading and credential resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `MVG_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/mvg/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing or unreadable config file is never fatal: the loader logs a
//! warning and continues with defaults.

use crate::params::{AnalysisParams, ClipParams};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MVG_CONFIG";

/// Environment variable carrying the Pexels API key
pub const PEXELS_KEY_ENV_VAR: &str = "MVG_PEXELS_API_KEY";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder receiving render manifests and exports
    pub output_folder: Option<PathBuf>,
    /// Pexels stock-footage API key
    pub pexels_api_key: Option<String>,
    pub logging: LoggingConfig,
    pub analysis: AnalysisParams,
    pub clips: ClipParams,
}

impl TomlConfig {
    /// Validate nested parameter sections
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.clips.validate()
    }

    /// Output folder, defaulting to the platform video directory
    pub fn output_folder(&self) -> PathBuf {
        self.output_folder
            .clone()
            .or_else(dirs::video_dir)
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Determine which config file to read, if any
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    dirs::config_dir()
        .map(|d| d.join("mvg").join("config.toml"))
        .filter(|p| p.exists())
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration with graceful degradation
///
/// Returns defaults (with a warning) when the file is missing, unreadable,
/// or fails validation.
pub fn load_or_default(cli_arg: Option<&Path>) -> TomlConfig {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No config file found, using compiled defaults");
        return TomlConfig::default();
    };

    match load_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config {}: {}. Using defaults.", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Write TOML config atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the Pexels API key
///
/// **Priority:** ENV → TOML
pub fn resolve_pexels_api_key(config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(PEXELS_KEY_ENV_VAR)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = config
        .pexels_api_key
        .as_ref()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Pexels API key found in both environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Pexels API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("Pexels API key loaded from TOML config");
        return Ok(key.clone());
    }

    Err(Error::Config(format!(
        "Pexels API key not configured. Set {} or pexels_api_key in the TOML config",
        PEXELS_KEY_ENV_VAR
    )))
}
