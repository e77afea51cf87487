//! Recognizer configuration, loadable from TOML.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default flick tolerance, halfway between the relaxed and precise presets.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Ticks a pen must stay in the air before a hover is reported.
pub const DEFAULT_HOVER_DELAY_TICKS: u32 = 275;

/// Distance in inches a manipulation must travel on either axis to count as a drag.
pub const DEFAULT_DRAG_THRESHOLD_INCHES: f64 = 0.106_299;

/// Tunables for the gesture engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Flick tolerance in the open interval (0, 1); 0 is lenient, 1 is strict.
    pub tolerance: f64,
    /// Allow flicks that start from a stationary press.
    pub allow_press_flicks: bool,
    /// Run flick detection at all.
    pub flicks_enabled: bool,
    /// Ticks in the air before `HoverEnter`.
    pub hover_delay_ticks: u32,
    /// Drag threshold in inches.
    pub drag_threshold_inches: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            allow_press_flicks: true,
            flicks_enabled: true,
            hover_delay_ticks: DEFAULT_HOVER_DELAY_TICKS,
            drag_threshold_inches: DEFAULT_DRAG_THRESHOLD_INCHES,
        }
    }
}

impl GestureConfig {
    /// Default config file name.
    pub const CONFIG_FILE: &'static str = "quill.toml";

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "tolerance",
                message: format!("{} is outside (0, 1)", self.tolerance),
            });
        }
        if !(self.drag_threshold_inches.is_finite() && self.drag_threshold_inches >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "drag_threshold_inches",
                message: format!("{} is not a non-negative distance", self.drag_threshold_inches),
            });
        }
        Ok(())
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a config from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Save the config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load from the default config file in the current directory.
    ///
    /// Returns the default config if the file is missing or invalid.
    #[must_use]
    pub fn load_default() -> Self {
        let path = Path::new(Self::CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        Self::load_from_file(path).unwrap_or_else(|e| {
            log::warn!("ignoring {}: {e}", Self::CONFIG_FILE);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GestureConfig::default();
        assert_eq!(config.tolerance, 0.5);
        assert!(config.allow_press_flicks);
        assert!(config.flicks_enabled);
        assert_eq!(config.hover_delay_ticks, 275);
        assert!((config.drag_threshold_inches - 0.106_299).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_tolerance_bounds() {
        for t in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let config = GestureConfig {
                tolerance: t,
                ..Default::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidValue {
                        field: "tolerance",
                        ..
                    })
                ),
                "tolerance {t} should be rejected"
            );
        }
    }

    #[test]
    fn test_config_rejects_negative_drag_threshold() {
        let config = GestureConfig {
            drag_threshold_inches: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_partial_toml_uses_defaults() {
        let config = GestureConfig::from_toml("tolerance = 0.75\nallow_press_flicks = false\n")
            .expect("valid toml");
        assert_eq!(config.tolerance, 0.75);
        assert!(!config.allow_press_flicks);
        assert_eq!(config.hover_delay_ticks, DEFAULT_HOVER_DELAY_TICKS);
    }

    #[test]
    fn test_config_toml_out_of_range() {
        let err = GestureConfig::from_toml("tolerance = 2.0").unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_config_toml_malformed() {
        let err = GestureConfig::from_toml("tolerance = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_to_toml_reparses() {
        let config = GestureConfig {
            tolerance: 0.25,
            hover_delay_ticks: 300,
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("tolerance = 0.25"));
        assert_eq!(GestureConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_config_file_io() {
        let dir = std::env::temp_dir().join(format!("quill-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quill.toml");

        let config = GestureConfig {
            flicks_enabled: false,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(GestureConfig::load_from_file(&path).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_missing_file() {
        let err = GestureConfig::load_from_file(Path::new("/nonexistent/quill.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
