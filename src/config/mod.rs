//! Configuration management for scoutline
//!
//! Handles loading, validation, profile and environment overrides of the
//! engine settings: merge policy and interpreter tuning.

use crate::error::{Result, ScoutlineError};
use crate::patterns::BUILTIN_RULES;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub merge: MergeConfig,
    pub interpreter: InterpreterConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Checks applied to every section patch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    pub reject_unknown_fields: bool,
    pub validate_ranges: bool,
}

/// Query interpreter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Custom rule table; the built-in table is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
    pub confidence: f64,
    /// Relative width of the follower band around a parsed count
    pub follower_tolerance: f64,
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_unknown_fields: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_ranges: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScoutlineError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ScoutlineError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ScoutlineError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| ScoutlineError::Config(format!("Unknown profile '{}'", profile)))?;

        if let Some(reject) = overrides.reject_unknown_fields {
            self.merge.reject_unknown_fields = reject;
        }
        if let Some(validate) = overrides.validate_ranges {
            self.merge.validate_ranges = validate;
        }
        if let Some(confidence) = overrides.confidence {
            self.interpreter.confidence = confidence;
        }

        ConfigValidator::validate(self)
    }

    /// Apply environment variable overrides
    /// Environment variables in format: SCOUTLINE_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("SCOUTLINE_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "MERGE__REJECT_UNKNOWN_FIELDS" => {
                self.merge.reject_unknown_fields = parse_env(path, value)?;
            }
            "MERGE__VALIDATE_RANGES" => {
                self.merge.validate_ranges = parse_env(path, value)?;
            }
            "INTERPRETER__CONFIDENCE" => {
                self.interpreter.confidence = parse_env(path, value)?;
            }
            "INTERPRETER__FOLLOWER_TOLERANCE" => {
                self.interpreter.follower_tolerance = parse_env(path, value)?;
            }
            "INTERPRETER__RULES_FILE" => {
                self.interpreter.rules_file = Some(PathBuf::from(value));
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Write the default configuration to `path` with the built-in rule table
    /// installed next to it and referenced by `interpreter.rules_file`
    ///
    /// An existing rule table is kept unless `force` is set. Returns the rule
    /// table path.
    pub fn init_files(path: &Path, force: bool) -> Result<PathBuf> {
        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&config_dir).map_err(|e| ScoutlineError::Io {
            source: e,
            context: format!("Failed to create config directory: {:?}", config_dir),
        })?;

        let rules_path = config_dir.join("rules.toml");
        if force || !rules_path.exists() {
            std::fs::write(&rules_path, BUILTIN_RULES).map_err(|e| ScoutlineError::Io {
                source: e,
                context: format!("Failed to write rules.toml: {:?}", rules_path),
            })?;
            tracing::debug!("Installed rule table at {:?}", rules_path);
        }

        let mut config = Self::default();
        config.interpreter.rules_file = Some(rules_path.clone());
        config.save(path)?;

        Ok(rules_path)
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ScoutlineError::Config("Cannot determine config directory".to_string())
        })?;

        Ok(config_dir.join("scoutline").join("config.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(path: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScoutlineError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}'", value),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            merge: MergeConfig {
                reject_unknown_fields: true,
                validate_ranges: true,
            },
            interpreter: InterpreterConfig {
                rules_file: None,
                confidence: 0.8,
                follower_tolerance: 0.2,
            },
            profiles: HashMap::from([(
                "lenient".to_string(),
                ProfileOverrides {
                    reject_unknown_fields: Some(false),
                    validate_ranges: Some(false),
                    confidence: None,
                },
            )]),
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| ScoutlineError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| ScoutlineError::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}
