use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scoutline
#[derive(Error, Debug)]
pub enum ScoutlineError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Weight outside the discrete step set
    #[error("Invalid weight {value}: expected one of 0.1, 0.2, 0.3, 0.5, 0.7, 1.0")]
    InvalidWeight { value: f64 },

    /// Two weighted entries share an id
    #[error("Duplicate weighted entry id: {id}")]
    DuplicateEntry { id: String },

    /// Patch carries keys the section does not define
    #[error("Unknown fields for section {section}: {fields:?}")]
    UnknownFields { section: String, fields: Vec<String> },

    /// Patch value does not fit the section schema
    #[error("Invalid patch for section {section}: {message}")]
    InvalidPatch { section: String, message: String },

    /// Unknown section name
    #[error("Unknown filter section: {0}")]
    UnknownSection(String),

    /// One or more ranges with min > max
    #[error("Invalid range: {errors:?}")]
    InvalidRange { errors: Vec<ValidationError> },

    /// Interpreter rule table errors
    #[error("Rule table error: {0}")]
    Rules(String),

    /// Downstream candidate search failures
    #[error("Search error: {0}")]
    Search(String),
}

/// Validation error for a single configuration key or filter path
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path to the offending key
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result type for scoutline operations
pub type Result<T> = std::result::Result<T, ScoutlineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScoutlineError::InvalidRange {
            errors: vec![ValidationError::new(
                "creator.ageRange",
                "min (40) is greater than max (20)",
            )],
        };
        assert!(err.to_string().contains("creator.ageRange"));

        let err = ScoutlineError::Toml(toml::from_str::<toml::Value>("= broken").unwrap_err());
        assert!(err.to_string().starts_with("TOML error"));
    }
}
