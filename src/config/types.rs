use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    EntityKind,
    validate_identifier,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "excludePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accepted range of `autoSaveInterval`, in seconds.
const AUTO_SAVE_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 5..=600;
/// Accepted range of `statusTimeout`, in seconds.
const STATUS_TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HubSettings {
    /// Directory holding the union-of-keys template.
    pub schema_dir_name: String,

    /// Write minified JSON instead of the pretty, diff-friendly layout.
    pub compress_json: bool,

    /// Read by the editing front end; the core only exposes `save`.
    pub auto_save: bool,
    /// Seconds between auto-saves of the open buffer.
    pub auto_save_interval: u64,
    /// Seconds a status message stays visible.
    pub status_timeout: u64,

    /// Directories under the root matching any of these globs are not languages.
    pub exclude_patterns: Vec<String>,
}

impl HubSettings {
    /// # Errors
    /// - Invalid schema directory name
    /// - Interval out of range
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if validate_identifier(EntityKind::Language, &self.schema_dir_name).is_err() {
            errors.push(ValidationError::new(
                "schemaDirName",
                "Must be a single directory name without path separators. Example: \"_schema\"",
            ));
        }

        if !AUTO_SAVE_INTERVAL_RANGE.contains(&self.auto_save_interval) {
            errors.push(ValidationError::new(
                "autoSaveInterval",
                format!(
                    "Must be between {} and {} seconds, got {}",
                    AUTO_SAVE_INTERVAL_RANGE.start(),
                    AUTO_SAVE_INTERVAL_RANGE.end(),
                    self.auto_save_interval
                ),
            ));
        }

        if !STATUS_TIMEOUT_RANGE.contains(&self.status_timeout) {
            errors.push(ValidationError::new(
                "statusTimeout",
                format!(
                    "Must be between {} and {} seconds, got {}",
                    STATUS_TIMEOUT_RANGE.start(),
                    STATUS_TIMEOUT_RANGE.end(),
                    self.status_timeout
                ),
            ));
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            schema_dir_name: "_schema".to_string(),
            compress_json: false,
            auto_save: true,
            auto_save_interval: 30,
            status_timeout: 5,
            exclude_patterns: vec![".*".to_string()],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = HubSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"schemaDirName": "_template", "compressJson": true}"#;

        let settings: HubSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.schema_dir_name, eq("_template"));
        assert_that!(settings.compress_json, eq(true));
        assert_that!(settings.auto_save_interval, eq(30));
        assert_that!(settings.exclude_patterns, elements_are![eq(".*")]);
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: HubSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings, eq(&HubSettings::default()));
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    #[case("..")]
    fn validate_invalid_schema_dir_name(#[case] name: &str) {
        let settings =
            HubSettings { schema_dir_name: name.to_string(), ..HubSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("schemaDirName"))])
        );
    }

    #[rstest]
    #[case(4, false)]
    #[case(5, true)]
    #[case(600, true)]
    #[case(601, false)]
    fn validate_auto_save_interval_range(#[case] interval: u64, #[case] valid: bool) {
        let settings = HubSettings { auto_save_interval: interval, ..HubSettings::default() };

        assert_eq!(settings.validate().is_ok(), valid);
    }

    #[rstest]
    fn validate_invalid_exclude_pattern() {
        let settings = HubSettings {
            exclude_patterns: vec![".*".to_string(), "invalid[pattern".to_string()],
            ..HubSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("excludePatterns[1]")),
                field!(ValidationError.message, contains_substring("invalid[pattern"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = HubSettings {
            schema_dir_name: String::new(),
            status_timeout: 0,
            ..HubSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let error_message = format!("{}", ConfigError::ValidationErrors(errors));

        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. schemaDirName"));
        assert_that!(error_message, contains_substring("2. statusTimeout"));
    }
}
