//! Configuration Management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Host detection settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Tab switching settings
    #[serde(default)]
    pub actuator: ActuatorConfig,
}

/// Host detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// How many non-tab elements to remember before evicting old ones
    pub skip_cache_capacity: usize,
}

/// Tab switching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Delay around the synthetic Tab keystroke pair (ms)
    pub keystroke_gap_ms: u64,
    /// Don't switch while the user is physically holding Ctrl
    pub suppress_when_ctrl_held: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            skip_cache_capacity: crate::classify::skip_cache::DEFAULT_CAPACITY,
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            keystroke_gap_ms: 100,
            suppress_when_ctrl_held: true,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.classifier.skip_cache_capacity == 0 {
            return Err(crate::Error::Config(
                "skip_cache_capacity must be > 0".to_string(),
            ));
        }
        if self.actuator.keystroke_gap_ms > 1000 {
            return Err(crate::Error::Config(format!(
                "keystroke_gap_ms must be at most 1000, got {}",
                self.actuator.keystroke_gap_ms
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".wheeltab").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
