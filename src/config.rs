//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coltree/coltree.toml`
//! 3. Explicit config: `--config <FILE>`
//! 4. Environment variables: `COLTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::ColumnType;

/// How new column ids are produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    /// Random hex ids
    #[default]
    Random,
    /// `col-1`, `col-2`, ... (predictable, for scripts)
    Sequential,
}

/// Error parsing an id style name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown id style '{input}' (expected random or sequential)")]
pub struct IdStyleParseError {
    pub input: String,
}

impl std::str::FromStr for IdStyle {
    type Err = IdStyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(IdStyle::Random),
            "sequential" => Ok(IdStyle::Sequential),
            _ => Err(IdStyleParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// Unified configuration for coltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Level assigned to columns added at the top of the forest.
    /// Seeded columns are level 0; new roots have historically been level 1.
    pub new_root_level: u32,
    /// Keep the last root pinned at the end when adding roots
    pub reserve_last_root: bool,
    /// Type pre-selected in new column forms
    pub default_type: ColumnType,
    /// Id generation strategy
    pub id_style: IdStyle,
    /// Length of random ids
    pub id_length: usize,
    /// Interactive prompt
    pub prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            new_root_level: 1,
            reserve_last_root: true,
            default_type: ColumnType::Customize,
            id_style: IdStyle::Random,
            id_length: 13,
            prompt: "coltree>".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub new_root_level: Option<u32>,
    pub reserve_last_root: Option<bool>,
    pub default_type: Option<ColumnType>,
    pub id_style: Option<IdStyle>,
    pub id_length: Option<usize>,
    pub prompt: Option<String>,
}

/// Get the XDG config directory for coltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coltree.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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

impl Settings {
    /// Merge overlay config onto self (base): overlay wins if specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            new_root_level: overlay.new_root_level.unwrap_or(self.new_root_level),
            reserve_last_root: overlay.reserve_last_root.unwrap_or(self.reserve_last_root),
            default_type: overlay.default_type.unwrap_or(self.default_type),
            id_style: overlay.id_style.unwrap_or(self.id_style),
            id_length: overlay.id_length.unwrap_or(self.id_length),
            prompt: overlay
                .prompt
                .clone()
                .unwrap_or_else(|| self.prompt.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/coltree/coltree.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `COLTREE_*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(config_file, env_source())
    }

    /// Layered load with an explicit environment source.
    fn load_with_env(
        config_file: Option<&Path>,
        env: Environment,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let path = expand_path(path);
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current, env)?;
        current.validate()?;

        Ok(current)
    }

    /// Apply COLTREE_* environment variables as explicit overrides.
    pub fn apply_env_overrides(
        mut settings: Self,
        env: Environment,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("new_root_level") {
            settings.new_root_level = u32::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("new_root_level out of range: {val}"),
            })?;
        }
        if let Ok(val) = config.get_bool("reserve_last_root") {
            settings.reserve_last_root = val;
        }
        if let Ok(val) = config.get_string("default_type") {
            settings.default_type = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("default_type: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("id_style") {
            settings.id_style = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("id_style: {e}"),
            })?;
        }
        if let Ok(val) = config.get_int("id_length") {
            settings.id_length = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("id_length out of range: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("prompt") {
            settings.prompt = val;
        }

        Ok(settings)
    }

    /// Reject settings the editor cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.default_type.is_fixed() {
            return Err(ApplicationError::Config {
                message: "default_type cannot be FIXED".into(),
            });
        }
        if !(4..=32).contains(&self.id_length) {
            return Err(ApplicationError::Config {
                message: format!("id_length must be between 4 and 32, got {}", self.id_length),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/coltree/coltree.toml
#   Explicit: coltree --config <FILE>
#   Env:      COLTREE_* environment variables (e.g. COLTREE_NEW_ROOT_LEVEL=0)

# Level given to new top-level columns (seeded columns are level 0)
# new_root_level = 1

# Keep the last column pinned at the end when adding top-level columns
# reserve_last_root = true

# Type pre-selected in new column forms: CUSTOMIZE, REMARK or USER_FILL
# default_type = "CUSTOMIZE"

# Id generation: "random" or "sequential" (col-1, col-2, ...)
# id_style = "random"

# Length of random ids (4..=32)
# id_length = 13

# prompt = "coltree>"
"#
        .to_string()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("COLTREE")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
