//! Core error types for cycleplan-core.
//!
//! This module defines the error hierarchy using thiserror. Configuration
//! and template-load failures are fatal at startup; `TemplateError::NotFound`
//! and the profile errors are per-call failures the caller can recover from.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cycleplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Decision table errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Profile lookup and conversion errors
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors raised while loading or querying the per-day decision table.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The source contained no data rows
    #[error("cycle template is empty")]
    Empty,

    /// The source could not be read or is not valid CSV
    #[error("cycle template is unreadable: {0}")]
    Unreadable(String),

    /// A row has no usable cycle-day key
    #[error("row {line}: missing Cycle_Day value")]
    MissingCycleDay { line: u64 },

    /// A cell could not be interpreted
    #[error("row {line}: invalid {column}: {message}")]
    InvalidField {
        line: u64,
        column: &'static str,
        message: String,
    },

    /// A row is keyed outside 1..=cycle_length
    #[error("cycle day {day} is outside 1..={cycle_length}")]
    DayOutOfRange { day: i64, cycle_length: u32 },

    /// Two rows share the same cycle day
    #[error("cycle day {0} appears more than once")]
    DuplicateDay(u32),

    /// Strict tables must cover every day of the cycle
    #[error("cycle template has no rows for days {0:?}")]
    MissingDays(Vec<u32>),

    /// The built-in table cannot serve a configured cycle length
    #[error("configured template cycle length {configured} needs template.path; the built-in table covers {builtin} days")]
    BuiltinLengthMismatch { configured: u32, builtin: u32 },

    /// No row exists for the normalized cycle day
    #[error("No template data for cycle_day={cycle_day}")]
    NotFound { cycle_day: u32 },
}

/// Errors raised when a stored profile cannot drive the engine.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// No profile stored for the user
    #[error("Profile not found for user {user_id}")]
    NotFound { user_id: String },

    /// The profile has no last-period anchor
    #[error("Profile incomplete for user {user_id}")]
    Incomplete { user_id: String },

    /// The anchor is not an ISO calendar date
    #[error("Invalid last_period_start '{value}' in profile of user {user_id}")]
    InvalidAnchor { user_id: String, value: String },
}

/// Validation errors for caller-supplied values.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Not an ISO-8601 date-time
    #[error("Invalid datetime: {value}")]
    InvalidDateTime { value: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_day() {
        let err = TemplateError::NotFound { cycle_day: 12 };
        assert_eq!(err.to_string(), "No template data for cycle_day=12");
    }

    #[test]
    fn profile_error_converts_into_core_error() {
        let err: CoreError = ProfileError::NotFound {
            user_id: "u1".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Profile(ProfileError::NotFound { .. })));
        assert!(err.to_string().contains("u1"));
    }
}
