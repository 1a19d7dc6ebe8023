use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::{MAX_SPEED, MIN_SPEED};
use crate::mood::Mood;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between ticks at speed 1.0, in milliseconds
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
    /// Initial speed multiplier (clamped by the engine to 0.1..=3.0)
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Mood preset; takes precedence over `speed` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay(),
            speed: default_speed(),
            mood: None,
        }
    }
}

impl PlaybackConfig {
    /// Tick delay at speed 1.0. A zero delay falls back to the default.
    pub fn base_delay(&self) -> Duration {
        if self.base_delay_ms == 0 {
            Duration::from_millis(default_base_delay())
        } else {
            Duration::from_millis(self.base_delay_ms)
        }
    }

    /// Speed an engine should start with
    pub fn initial_speed(&self) -> f64 {
        match self.mood {
            Some(mood) => mood.speed(),
            None if self.speed.is_nan() => default_speed(),
            None => self.speed.clamp(MIN_SPEED, MAX_SPEED),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print comparison/swap counters under each frame
    #[serde(default = "default_true")]
    pub show_metrics: bool,
    /// Print the step description above each frame
    #[serde(default = "default_true")]
    pub show_description: bool,
    /// Terminal columns reserved per array element
    #[serde(default = "default_cell_width")]
    pub cell_width: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_metrics: default_true(),
            show_description: default_true(),
            cell_width: default_cell_width(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_delay() -> u64 {
    1000
}

fn default_speed() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_cell_width() -> u16 {
    4
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/algoviz/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("algoviz")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.playback.base_delay(), Duration::from_millis(1000));
        assert_eq!(config.playback.initial_speed(), 1.0);
        assert!(config.display.show_metrics);
        assert_eq!(config.display.cell_width, 4);
    }

    #[test]
    fn test_mood_overrides_speed() {
        let config = AppConfig::from_toml(
            r#"
[playback]
speed = 2.5
mood = "CHILL"
"#,
        )
        .unwrap();
        assert_eq!(config.playback.mood, Some(Mood::Chill));
        assert_eq!(config.playback.initial_speed(), 0.5);
    }

    #[test]
    fn test_speed_is_clamped() {
        let config = AppConfig::from_toml("[playback]\nspeed = 9.0\n").unwrap();
        assert_eq!(config.playback.initial_speed(), MAX_SPEED);

        let config = AppConfig::from_toml("[playback]\nspeed = 0.0\n").unwrap();
        assert_eq!(config.playback.initial_speed(), MIN_SPEED);
    }

    #[test]
    fn test_zero_base_delay_falls_back() {
        let config = AppConfig::from_toml("[playback]\nbase_delay_ms = 0\n").unwrap();
        assert_eq!(config.playback.base_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[playback\nspeed = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = AppConfig::default();
        config.playback.mood = Some(Mood::Rush);
        config.display.cell_width = 6;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.playback.mood, Some(Mood::Rush));
        assert_eq!(parsed.display.cell_width, 6);
    }
}
