//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, PageBackend};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
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

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_engine(config, &mut result);
        Self::validate_session(config, &mut result);
        Self::validate_page(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        let engine = &config.engine;
        if !(0.0..=1.0).contains(&engine.min_command_confidence) {
            result.add_error(ValidationError::new(
                "engine.min_command_confidence",
                "min_command_confidence must be between 0 and 1",
            ));
        }

        if !(0.0..=1.0).contains(&engine.model_margin) {
            result.add_error(ValidationError::new(
                "engine.model_margin",
                "model_margin must be between 0 and 1",
            ));
        }

        if engine.max_candidates == Some(0) {
            result.add_error(ValidationError::new(
                "engine.max_candidates",
                "max_candidates must be greater than 0",
            ));
        }
    }

    fn validate_session(config: &Config, result: &mut ValidationResult) {
        let timeout_ms = config.session.timeout_ms;
        if timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "session.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        } else if !(5000..=10000).contains(&timeout_ms) {
            result.add_warning(ValidationWarning::new(
                "session.timeout_ms",
                format!(
                    "timeout_ms is {}, outside the recommended 5000-10000 range",
                    timeout_ms
                ),
            ));
        }
    }

    fn validate_page(config: &Config, result: &mut ValidationResult) {
        let page = &config.page;
        match page.backend {
            PageBackend::Cdp => {
                let endpoint = &page.cdp_endpoint;
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        "page.cdp_endpoint",
                        "cdp_endpoint must start with http:// or https://",
                    ));
                }
            }
            PageBackend::Snapshot => match page.snapshot_path {
                None => result.add_error(ValidationError::new(
                    "page.snapshot_path",
                    "snapshot_path is required for the snapshot backend",
                )),
                Some(ref path) if !path.exists() => {
                    result.add_warning(ValidationWarning::new(
                        "page.snapshot_path",
                        format!("Snapshot file does not exist: {:?}", path),
                    ));
                }
                Some(_) => {}
            },
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }

        if config.logging.log_dir.is_empty() {
            result.add_error(ValidationError::new(
                "logging.log_dir",
                "log_dir cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
