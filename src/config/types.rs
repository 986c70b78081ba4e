use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::syntax::is_valid_name;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "loading.numThreads")
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

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradSettings {
    /// Directory holding one file per locale, relative to the workspace root.
    pub lang_dir: String,

    /// Glob matched against file names in `lang_dir`.
    pub file_pattern: String,

    /// Load a locale on first selection instead of loading every file up front.
    pub lazy_loading: bool,

    /// Locale selected right after initialization.
    pub default_locale: Option<String>,

    pub loading: LoadingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadingConfig {
    /// Parallel thread count for eager loading.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl LoadingConfig {
    /// Number of worker threads used to parse locale files.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.num_threads.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

impl TradSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Invalid locale name or thread count
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.lang_dir.is_empty() {
            errors.push(ValidationError::new(
                "langDir",
                "The directory cannot be empty. Example: \"lang\"",
            ));
        }

        if self.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "filePattern",
                "The pattern cannot be empty. Example: \"*.trad\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.file_pattern) {
            errors.push(ValidationError::new(
                "filePattern",
                format!("Invalid glob pattern '{}': {e}", self.file_pattern),
            ));
        }

        if let Some(locale) = &self.default_locale
            && !is_valid_name(locale)
        {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!(
                    "Invalid locale '{locale}'. Only letters, digits, '_' and '-' are allowed"
                ),
            ));
        }

        if self.loading.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "loading.numThreads",
                "At least one thread is required. Remove this field to use the default",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for TradSettings {
    fn default() -> Self {
        Self {
            lang_dir: "lang".to_string(),
            file_pattern: "*.trad".to_string(),
            lazy_loading: true,
            default_locale: None,
            loading: LoadingConfig::default(),
        }
    }
}
