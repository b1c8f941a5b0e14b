//! User-preference persistence.
//!
//! Preferences cover cross-session defaults (home zone, favorite
//! zones); timeline state itself is session-only and never written out.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Error type for preference persistence
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    NoConfigDir,
    /// IO error while reading/writing the preference file
    Io(io::Error),
    /// Failed to parse the preference file
    Parse(toml::de::Error),
    /// Failed to serialize preferences
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Cross-session defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Zone id used for the home row when a session starts; None means
    /// detect from the system
    pub home_zone: Option<String>,
    /// Zone ids added as rows when a session starts
    pub favorites: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            home_zone: None,
            favorites: vec![
                "America/New_York".to_string(),
                "Europe/London".to_string(),
                "Asia/Tokyo".to_string(),
            ],
        }
    }
}

/// Get the preference file path
pub fn preferences_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "zonegrid", "zonegrid")
        .map(|dirs| dirs.config_dir().join("preferences.toml"))
}

/// Load saved preferences.
///
/// Returns `None` if no preference file exists yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_preferences() -> Result<Option<Preferences>, ConfigError> {
    let path = preferences_path().ok_or(ConfigError::NoConfigDir)?;

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let preferences: Preferences = toml::from_str(&contents)?;
    Ok(Some(preferences))
}

/// Save preferences, creating the config directory as needed.
pub fn save_preferences(preferences: &Preferences) -> Result<(), ConfigError> {
    let path = preferences_path().ok_or(ConfigError::NoConfigDir)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(preferences)?;
    fs::write(&path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_path() {
        let path = preferences_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("preferences.toml"));
    }

    #[test]
    fn test_preferences_toml_round_trip() {
        let preferences = Preferences {
            home_zone: Some("Europe/Berlin".to_string()),
            favorites: vec!["Asia/Kolkata".to_string(), "Pacific/Auckland".to_string()],
        };
        let encoded = toml::to_string_pretty(&preferences).unwrap();
        let decoded: Preferences = toml::from_str(&encoded).unwrap();
        assert_eq!(preferences, decoded);
    }

    #[test]
    fn test_default_preferences_detect_home() {
        let preferences = Preferences::default();
        assert!(preferences.home_zone.is_none());
        assert!(!preferences.favorites.is_empty());
    }
}
