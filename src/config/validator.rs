use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{Result, ScoutlineError, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_interpreter(config, &mut errors);
        Self::validate_profiles(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScoutlineError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_interpreter(config: &Config, errors: &mut Vec<ValidationError>) {
        let confidence = config.interpreter.confidence;
        if !(0.0..=1.0).contains(&confidence) {
            errors.push(ValidationError::new(
                "interpreter.confidence",
                format!("Confidence must be between 0.0 and 1.0, got {}", confidence),
            ));
        }

        // a tolerance of 1.0 would produce a band starting at zero followers
        let tolerance = config.interpreter.follower_tolerance;
        if !(0.0..1.0).contains(&tolerance) {
            errors.push(ValidationError::new(
                "interpreter.follower_tolerance",
                format!("Follower tolerance must be in [0.0, 1.0), got {}", tolerance),
            ));
        }

        if let Some(path) = &config.interpreter.rules_file {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::new(
                    "interpreter.rules_file",
                    "Rules file path cannot be empty",
                ));
            }
        }
    }

    fn validate_profiles(config: &Config, errors: &mut Vec<ValidationError>) {
        for (name, overrides) in &config.profiles {
            if let Some(confidence) = overrides.confidence {
                if !(0.0..=1.0).contains(&confidence) {
                    errors.push(ValidationError::new(
                        format!("profiles.{}.confidence", name),
                        format!("Confidence must be between 0.0 and 1.0, got {}", confidence),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_rules_path() {
        let mut config = Config::default();
        config.interpreter.rules_file = Some(PathBuf::new());
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = Config::default();
        config.meta.schema_version = "0.9.0".to_string();
        config.interpreter.confidence = 1.5;
        config.interpreter.follower_tolerance = 1.0;

        match ConfigValidator::validate(&config) {
            Err(ScoutlineError::ConfigValidation { errors }) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
