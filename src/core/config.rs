use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::DistanceUnit;
use super::proximity::model::ProximityConfig;

pub const DEFAULT_GPS_INTERVAL_SECS: u64 = 300;
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Rider settings. Any field missing from settings.json falls back to its default.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Absent means disabled
    pub alerts_enabled: bool,
    pub distance_unit: DistanceUnit,
    /// Seconds between location polls; 0 turns polling off
    pub gps_update_interval_secs: u64,
    pub proximity: ProximityConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alerts_enabled: false,
            distance_unit: DistanceUnit::Miles,
            gps_update_interval_secs: DEFAULT_GPS_INTERVAL_SECS,
            proximity: ProximityConfig::default(),
        }
    }
}

impl Settings {
    /// Polling period, or None when polling is disabled.
    pub fn gps_update_interval(&self) -> Option<Duration> {
        match self.gps_update_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write settings: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Owns `settings.json` inside the app's config directory.
pub struct ConfigManager {
    settings_file: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_file: config_dir.as_ref().join(SETTINGS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings_file
    }

    /// Current settings. A missing file is a first run; an unreadable one is
    /// logged. Both yield the defaults.
    pub fn load(&self) -> Settings {
        let content = match fs::read_to_string(&self.settings_file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Settings::default(),
            Err(e) => {
                warn!("Failed to read {:?}: {}", self.settings_file, e);
                return Settings::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable {:?}: {}", self.settings_file, e);
            Settings::default()
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(settings)?;
        if let Some(dir) = self.settings_file.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.settings_file, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("nested"));

        let default = manager.load();
        assert_eq!(default, Settings::default());
        assert!(!default.alerts_enabled);
        assert_eq!(default.gps_update_interval_secs, 300);

        let new_settings = Settings {
            alerts_enabled: true,
            distance_unit: DistanceUnit::Kilometers,
            gps_update_interval_secs: 60,
            proximity: ProximityConfig::default(),
        };

        manager.save(&new_settings).unwrap();
        let loaded = manager.load();

        assert_eq!(loaded, new_settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());
        fs::write(manager.path(), r#"{"distance_unit": "kilometers"}"#).unwrap();

        let loaded = manager.load();
        assert_eq!(loaded.distance_unit, DistanceUnit::Kilometers);
        assert!(!loaded.alerts_enabled, "Absent flag means disabled");
        assert_eq!(loaded.gps_update_interval_secs, DEFAULT_GPS_INTERVAL_SECS);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());
        fs::write(manager.path(), "{ not json").unwrap();
        assert_eq!(manager.load(), Settings::default());

        // A directory where the file should be is an unreadable file, not a crash
        let blocked = ConfigManager::new(dir.path().join("blocked"));
        fs::create_dir_all(blocked.path()).unwrap();
        assert_eq!(blocked.load(), Settings::default());
        assert!(matches!(
            blocked.save(&Settings::default()),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_gps_interval() {
        let mut settings = Settings::default();
        assert_eq!(settings.gps_update_interval(), Some(Duration::from_secs(300)));
        settings.gps_update_interval_secs = 0;
        assert_eq!(settings.gps_update_interval(), None);
    }
}
