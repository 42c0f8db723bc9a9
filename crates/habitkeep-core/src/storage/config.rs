//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Calendar settings (where the day boundary falls)
//! - Schedule lookahead for "next task day"
//! - CLI output format
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::SystemClock;
use crate::error::{ConfigError, CoreError, Result};

/// Calendar configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Fixed offset east of UTC for day boundaries. Unset means the
    /// system local timezone.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Schedule-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// How many days ahead to search for the next task day.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_lookahead_days() -> u32 {
    366
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            lookahead_days: default_lookahead_days(),
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = if value == "null" {
            serde_json::Value::Null
        } else {
            match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                // Unset optional: take any JSON scalar, the field type decides.
                serde_json::Value::Null => serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            }
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::Config(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Same as [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| {
            CoreError::Config(ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message,
            })
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by dot-separated key, without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not fit
    /// the field's type, or the UTC offset is a day or more away.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let next: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        SystemClock::from_config(&next.calendar)?;
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.schedule.lookahead_days, 366);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: Config = toml::from_str("[calendar]\nutc_offset_minutes = 540\n").unwrap();
        assert_eq!(parsed.calendar.utc_offset_minutes, Some(540));
        assert_eq!(parsed.schedule.lookahead_days, 366);
        assert!(!parsed.display.json);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("schedule.lookahead_days").as_deref(), Some("366"));
        assert_eq!(cfg.get("display.json").as_deref(), Some("false"));
        assert_eq!(cfg.get("calendar.utc_offset_minutes").as_deref(), Some("null"));
        assert!(cfg.get("display.missing_key").is_none());
    }

    #[test]
    fn set_updates_number_and_bool() {
        let mut cfg = Config::default();
        cfg.set("schedule.lookahead_days", "30").unwrap();
        cfg.set("display.json", "true").unwrap();
        assert_eq!(cfg.schedule.lookahead_days, 30);
        assert!(cfg.display.json);
    }

    #[test]
    fn set_optional_offset_and_clear_it() {
        let mut cfg = Config::default();
        cfg.set("calendar.utc_offset_minutes", "-300").unwrap();
        assert_eq!(cfg.calendar.utc_offset_minutes, Some(-300));
        cfg.set("calendar.utc_offset_minutes", "120").unwrap();
        assert_eq!(cfg.calendar.utc_offset_minutes, Some(120));
        cfg.set("calendar.utc_offset_minutes", "null").unwrap();
        assert_eq!(cfg.calendar.utc_offset_minutes, None);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("display.colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("nope.json", "true"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("display.json", "not_a_bool").is_err());
        assert!(cfg.set("schedule.lookahead_days", "-1").is_err());
        assert!(cfg.set("calendar.utc_offset_minutes", "soon").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_out_of_range_offset() {
        let mut cfg = Config::default();
        cfg.set("calendar.utc_offset_minutes", "60").unwrap();
        assert!(matches!(
            cfg.set("calendar.utc_offset_minutes", "100000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("calendar.utc_offset_minutes", "-1440").is_err());
        assert_eq!(cfg.calendar.utc_offset_minutes, Some(60));
        cfg.set("calendar.utc_offset_minutes", "-1439").unwrap();
        assert_eq!(cfg.calendar.utc_offset_minutes, Some(-1439));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("calendar.utc_offset_minutes", "330").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "schedule = 5").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
