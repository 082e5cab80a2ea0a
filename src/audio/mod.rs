pub mod monitor;
pub mod output;
pub mod player;
pub mod queue;
pub mod scanner;
pub mod song;

pub use output::{AudioOutput, LoadedTrack, RodioOutput};
pub use player::{PlaybackEngine, PlaybackState, PlayerEvent, SessionId};
pub use queue::SongQueue;
pub use scanner::LibraryScanner;
pub use song::Song;

use std::time::Duration;

/// Volume a fresh engine starts at before config or the user touch it
pub const DEFAULT_VOLUME: f32 = 0.7;

/// How often the monitor checks whether the device ran out of audio
pub const MONITOR_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Upper bound on how long stop() waits for the monitor thread to exit
pub const MONITOR_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Aac,
    Wma,
    M4a,
    Unknown,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "wav" => AudioFormat::Wav,
            "aac" => AudioFormat::Aac,
            "wma" => AudioFormat::Wma,
            "m4a" => AudioFormat::M4a,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AudioFormat::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching_ignores_case() {
        assert_eq!(AudioFormat::from_extension("MP3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_extension("M4a"), AudioFormat::M4a);
        assert_eq!(AudioFormat::from_extension("wma"), AudioFormat::Wma);
        assert!(!AudioFormat::from_extension("flac").is_supported());
        assert!(!AudioFormat::from_extension("").is_supported());
    }
}
