//! TOML-based application configuration.
//!
//! Stores engine settings including:
//! - Defaults substituted for non-positive cycle lengths and bleed days
//! - Decision table source and strictness
//! - Strong-pain symptom markers
//! - The alternate-slot search window
//!
//! Configuration is stored at `~/.config/cycleplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, TemplateError};
use crate::phase::{CoercionPolicy, DEFAULT_BLEED_DAYS, DEFAULT_CYCLE_LENGTH};
use crate::planning::SearchWindow;
use crate::template::{CycleTemplate, TemplateOptions, WorkoutRules};

/// Cycle defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(default = "default_cycle_length")]
    pub default_cycle_length: u32,
    #[serde(default = "default_bleed_days")]
    pub default_bleed_days: u32,
}

/// Decision table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// CSV source; the built-in table is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
    #[serde(default = "default_true")]
    pub require_complete: bool,
}

/// Workout override configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default = "default_strong_pain_markers")]
    pub strong_pain_markers: Vec<String>,
}

/// Plan evaluation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    #[serde(default = "default_search_before_days")]
    pub search_before_days: u32,
    #[serde(default = "default_search_after_days")]
    pub search_after_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cycleplan/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub workout: WorkoutConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
}

// Default functions
fn default_cycle_length() -> u32 {
    DEFAULT_CYCLE_LENGTH
}
fn default_bleed_days() -> u32 {
    DEFAULT_BLEED_DAYS
}
fn default_true() -> bool {
    true
}
fn default_strong_pain_markers() -> Vec<String> {
    WorkoutRules::default().strong_pain_markers
}
fn default_search_before_days() -> u32 {
    SearchWindow::default().before_days
}
fn default_search_after_days() -> u32 {
    SearchWindow::default().after_days
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: default_cycle_length(),
            default_bleed_days: default_bleed_days(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: None,
            cycle_length: default_cycle_length(),
            require_complete: true,
        }
    }
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            strong_pain_markers: default_strong_pain_markers(),
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            search_before_days: default_search_before_days(),
            search_after_days: default_search_after_days(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn coercion_policy(&self) -> CoercionPolicy {
        CoercionPolicy::new(self.cycle.default_cycle_length, self.cycle.default_bleed_days)
    }

    pub fn template_options(&self) -> TemplateOptions {
        TemplateOptions {
            cycle_length: self.template.cycle_length,
            require_complete: self.template.require_complete,
        }
    }

    pub fn workout_rules(&self) -> WorkoutRules {
        WorkoutRules {
            strong_pain_markers: self.workout.strong_pain_markers.clone(),
        }
    }

    pub fn search_window(&self) -> SearchWindow {
        SearchWindow {
            before_days: self.planning.search_before_days,
            after_days: self.planning.search_after_days,
        }
    }

    /// Load the configured decision table, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns a template error if the source is unreadable or malformed, or
    /// if a non-default cycle length is configured without a table path.
    pub fn load_template(&self) -> Result<CycleTemplate, TemplateError> {
        let template = match &self.template.path {
            Some(path) => CycleTemplate::from_path(path, self.template_options())?,
            None => {
                let builtin = CycleTemplate::builtin()?;
                if self.template.cycle_length != builtin.cycle_length() {
                    return Err(TemplateError::BuiltinLengthMismatch {
                        configured: self.template.cycle_length,
                        builtin: builtin.cycle_length(),
                    });
                }
                if !self.template.require_complete {
                    tracing::debug!("built-in template is complete; require_complete=false has no effect");
                }
                builtin
            }
        };
        Ok(template.with_rules(self.workout_rules()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.cycle.default_cycle_length, 28);
        assert_eq!(parsed.planning.search_after_days, 7);
        assert!(parsed.template.require_complete);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[planning]\nsearch_after_days = 10\n").unwrap();
        assert_eq!(cfg.planning.search_before_days, 3);
        assert_eq!(cfg.planning.search_after_days, 10);
        assert_eq!(cfg.cycle.default_bleed_days, 5);
        assert_eq!(
            cfg.workout.strong_pain_markers,
            vec!["strong_cramps".to_string(), "migraine".to_string()]
        );
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("cycle.default_cycle_length").as_deref(), Some("28"));
        assert_eq!(cfg.get("template.require_complete").as_deref(), Some("true"));
        assert!(cfg.get("cycle.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("planning.search_before_days", "1").unwrap();
        cfg.set("template.require_complete", "false").unwrap();
        cfg.set("workout.strong_pain_markers", r#"["migraine"]"#).unwrap();
        assert_eq!(cfg.search_window().before_days, 1);
        assert!(!cfg.template.require_complete);
        assert_eq!(cfg.workout_rules().strong_pain_markers, vec!["migraine"]);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("cycle.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("cycle.default_cycle_length", "many"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.cycle.default_cycle_length = 31;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.coercion_policy().default_cycle_length, 31);
    }

    #[test]
    fn load_template_uses_builtin_by_default() {
        let template = Config::default().load_template().unwrap();
        assert_eq!(template.len(), 28);
    }

    #[test]
    fn load_template_reports_unreadable_path() {
        let mut cfg = Config::default();
        cfg.template.path = Some(PathBuf::from("/nonexistent/cycle.csv"));
        assert!(matches!(
            cfg.load_template(),
            Err(TemplateError::Unreadable(_))
        ));
    }

    #[test]
    fn builtin_table_rejects_other_configured_lengths() {
        let mut cfg = Config::default();
        cfg.template.cycle_length = 35;
        assert!(matches!(
            cfg.load_template(),
            Err(TemplateError::BuiltinLengthMismatch {
                configured: 35,
                builtin: 28
            })
        ));

        cfg.template.cycle_length = 28;
        cfg.template.require_complete = false;
        assert_eq!(cfg.load_template().unwrap().len(), 28);
    }
}
