// Configuration management for SoundTurner
// Optional TOML file, sensible defaults when it's missing, CLI flags win over both

use crate::audio::DEFAULT_VOLUME;
use crate::error::ConfigError;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub music_directory: PathBuf,
    pub volume: f32,
    pub autoplay: bool,
    pub log_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_directory: default_music_directory(),
            volume: DEFAULT_VOLUME,
            autoplay: true,
            log_directory: default_log_directory(),
        }
    }
}

impl Config {
    /// Load from the standard location, or defaults if there is no file.
    /// Nothing is ever written back; the player keeps no state between runs.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.set_volume(config.volume);
        Ok(config)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() { DEFAULT_VOLUME } else { volume.clamp(0.0, 1.0) };
    }

    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("soundturner").join("config.toml"))
    }
}

/// Platform music folder + "SoundTurner"
pub fn default_music_directory() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .unwrap_or_else(|| PathBuf::from("Music"))
        .join("SoundTurner")
}

fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("soundturner").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.autoplay);
        assert!(config.music_directory.ends_with("SoundTurner"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "music_directory = \"/srv/music\"\nautoplay = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.music_directory, PathBuf::from("/srv/music"));
        assert!(!config.autoplay);
        assert_eq!(config.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn test_volume_is_clamped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "volume = 3.5\n").unwrap();

        assert_eq!(Config::load_from(&path).unwrap().volume, 1.0);

        let mut config = Config::default();
        config.set_volume(-1.0);
        assert_eq!(config.volume, 0.0);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "volume = \"loud\"").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse { .. })));
    }
}
