// Error types for SoundTurner
// Playback and config get their own enums; the app edge just uses anyhow

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between `play()` and sound coming out
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No output device could be opened at startup
    #[error("No audio output device available")]
    NoDevice,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File exists but couldn't be opened for reading
    #[error("Failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported audio format or corrupted file '{}': {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The output device refused to create a sink
    #[error("Audio device error: {0}")]
    Device(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
