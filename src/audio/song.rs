use super::AudioFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const UNKNOWN_ARTIST: &str = "Unknown";

/// A playable song. Plain value: two songs with the same fields are the same
/// song, and the queue happily holds duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    title: String,
    artist: String,
    file_path: PathBuf,
    duration: Duration,
}

impl Song {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        file_path: impl Into<PathBuf>,
        duration: Duration,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            file_path: file_path.into(),
            duration,
        }
    }

    /// Song named after its file stem, artist unknown
    pub fn from_path(file_path: impl Into<PathBuf>, duration: Duration) -> Self {
        let file_path = file_path.into();
        let title = file_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Unknown")
            .to_string();

        Self::new(title, UNKNOWN_ARTIST, file_path, duration)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn format(&self) -> AudioFormat {
        self.file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(AudioFormat::from_extension)
            .unwrap_or(AudioFormat::Unknown)
    }

    /// "Artist - Title", used all over the UI and in status messages
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    pub fn display_duration(&self) -> String {
        format_duration(self.duration)
    }

    /// Case-insensitive substring match over title and artist
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.artist.to_lowercase().contains(&query)
    }
}

/// m:ss, or h:mm:ss once we go past the hour
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_uses_file_stem() {
        let song = Song::from_path("/music/Daft Punk - One More Time.mp3", Duration::from_secs(320));
        assert_eq!(song.title(), "Daft Punk - One More Time");
        assert_eq!(song.artist(), UNKNOWN_ARTIST);
        assert_eq!(song.format(), AudioFormat::Mp3);
        assert_eq!(song.display_duration(), "5:20");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let song = Song::new("Heavy Is the Crown", "Linkin Park", "/x.m4a", Duration::ZERO);
        assert!(song.matches("crown"));
        assert!(song.matches("LINKIN"));
        assert!(song.matches(""));
        assert!(!song.matches("blink"));
    }

    #[test]
    fn test_value_equality() {
        let a = Song::new("A", "B", "/a.wav", Duration::from_secs(1));
        assert_eq!(a, a.clone());
        assert_ne!(a, Song::new("A", "B", "/a.wav", Duration::from_secs(2)));
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(Duration::from_secs(3725)), "1:02:05");
        assert_eq!(format_duration(Duration::ZERO), "0:00");
    }
}
