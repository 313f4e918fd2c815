//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/probtree/probtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `PROBTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::Mode;

/// Unified configuration for probtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for saved distributions (default: ~/.probtree)
    pub base_dir: PathBuf,
    /// Identity that keys saved distributions (default: $USER or "local")
    pub user: String,
    /// Prefix of share links
    pub share_base_url: String,
    /// Mode of newly created documents
    pub default_mode: Mode,
}

impl Default for Settings {
    fn default() -> Self {
        let user = std::env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "local".into());

        Self {
            base_dir: dirs_default_base_dir(),
            user,
            share_base_url: "http://localhost:3000".into(),
            default_mode: Mode::default(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub share_base_url: Option<String>,
    pub default_mode: Option<Mode>,
}

/// Get the default base directory (~/.probtree).
fn dirs_default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".probtree"))
        .unwrap_or_else(|| PathBuf::from("~/.probtree"))
}

/// Get the XDG config directory for probtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "probtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("probtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; falls back to the input on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Directory holding saved distributions (base_dir/distributions).
    pub fn distributions_dir(&self) -> PathBuf {
        self.base_dir.join("distributions")
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.base_dir.to_string_lossy().as_ref());
        self.base_dir = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay
                .base_dir
                .clone()
                .unwrap_or_else(|| self.base_dir.clone()),
            user: overlay.user.clone().unwrap_or_else(|| self.user.clone()),
            share_base_url: overlay
                .share_base_url
                .clone()
                .unwrap_or_else(|| self.share_base_url.clone()),
            default_mode: overlay.default_mode.unwrap_or(self.default_mode),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit TOML file, applied after the global one
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply PROBTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("PROBTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_dir") {
            settings.base_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("user") {
            settings.user = val;
        }
        if let Ok(val) = config.get_string("share_base_url") {
            settings.share_base_url = val;
        }
        if let Ok(val) = config.get_string("default_mode") {
            settings.default_mode = val.parse().map_err(|message| ApplicationError::Config {
                message: format!("PROBTREE_DEFAULT_MODE: {message}"),
            })?;
        }

        Ok(settings)
    }

    /// Render effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
