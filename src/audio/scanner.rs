use super::{AudioFormat, Song};
use rodio::{Decoder, Source};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Walks the music folder and turns every supported file into a `Song`
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    root: PathBuf,
}

impl LibraryScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the music folder if it isn't there yet
    pub fn ensure_root(&self) -> std::io::Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            info!("Created music directory: {}", self.root.display());
        }
        Ok(())
    }

    /// Full recursive scan. Unreadable entries are skipped, never reported.
    /// Order follows the directory walk and is not guaranteed.
    pub fn scan(&self) -> Vec<Song> {
        let mut songs = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            // Skip hidden files (dotfiles)
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with('.'))
            {
                continue;
            }

            if !is_supported_file(path) {
                continue;
            }

            if let Some(song) = song_from_file(path) {
                songs.push(song);
            }
        }

        info!("Scanned {}: {} songs", self.root.display(), songs.len());
        songs
    }

    /// Fresh scan filtered by `query` over title and artist
    pub fn search(&self, query: &str) -> Vec<Song> {
        Self::filter(&self.scan(), query)
    }

    /// Case-insensitive substring filter over an already scanned list
    pub fn filter(songs: &[Song], query: &str) -> Vec<Song> {
        songs.iter().filter(|song| song.matches(query)).cloned().collect()
    }
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AudioFormat::from_extension(ext).is_supported())
        .unwrap_or(false)
}

fn song_from_file(path: &Path) -> Option<Song> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };

    let duration = probe_duration(path, file);
    Some(Song::from_path(path, duration))
}

/// Ask the decoder how long the file is; zero when nobody can tell
fn probe_duration(path: &Path, file: File) -> Duration {
    match Decoder::new(BufReader::new(file)) {
        Ok(decoder) => {
            if let Some(duration) = decoder.total_duration() {
                return duration;
            }
        }
        Err(e) => debug!("Could not decode {} for duration: {}", path.display(), e),
    }

    #[cfg(feature = "probe")]
    {
        match probe_duration_with_symphonia(path) {
            Ok(duration) => return duration,
            Err(e) => debug!("Symphonia probe failed for {}: {}", path.display(), e),
        }
    }

    Duration::ZERO
}

/// Feature-gated duration probing using symphonia codec
#[cfg(feature = "probe")]
fn probe_duration_with_symphonia(path: &Path) -> anyhow::Result<Duration> {
    use symphonia::core::codecs::CODEC_TYPE_NULL;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow::anyhow!("No supported audio tracks found"))?;

    match (track.codec_params.time_base, track.codec_params.n_frames) {
        (Some(time_base), Some(n_frames)) => {
            let time = time_base.calc_time(n_frames);
            Ok(Duration::from_secs_f64(time.seconds as f64 + time.frac))
        }
        _ => Err(anyhow::anyhow!("Could not determine duration from file")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::song::UNKNOWN_ARTIST;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"junk bytes, not a real stream").unwrap();
    }

    fn titles(songs: &[Song]) -> Vec<String> {
        let mut titles: Vec<String> = songs.iter().map(|s| s.title().to_string()).collect();
        titles.sort();
        titles
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        for file in [
            "alpha.mp3",
            "Bravo.MP3",
            "charlie.Wav",
            "nested/deeper/delta.m4a",
            "echo.aac",
            "foxtrot.wma",
            "notes.txt",
            "cover.jpg",
            "golf.flac",
            ".hidden.mp3",
        ] {
            touch(dir.path(), file);
        }

        let songs = LibraryScanner::new(dir.path()).scan();

        assert_eq!(
            titles(&songs),
            vec!["Bravo", "alpha", "charlie", "delta", "echo", "foxtrot"]
        );
        for song in &songs {
            assert_eq!(song.artist(), UNKNOWN_ARTIST);
            // Garbage bytes can't be probed
            assert_eq!(song.duration(), Duration::ZERO);
            assert!(song.file_path().starts_with(dir.path()));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unopenable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "ok.mp3");
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken.mp3"))
            .unwrap();

        let songs = LibraryScanner::new(dir.path()).scan();

        assert_eq!(titles(&songs), vec!["ok"]);
    }

    #[test]
    fn test_missing_root_scans_empty() {
        let dir = TempDir::new().unwrap();
        let scanner = LibraryScanner::new(dir.path().join("nope"));
        assert!(scanner.scan().is_empty());
    }

    #[test]
    fn test_ensure_root_creates_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Music").join("SoundTurner");
        let scanner = LibraryScanner::new(&root);

        scanner.ensure_root().unwrap();
        assert!(root.is_dir());
        // Second call is a no-op
        scanner.ensure_root().unwrap();
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Midnight City.mp3");
        touch(dir.path(), "midnight train.wav");
        touch(dir.path(), "Daylight.m4a");

        let scanner = LibraryScanner::new(dir.path());
        assert_eq!(
            titles(&scanner.search("MIDNIGHT")),
            vec!["Midnight City", "midnight train"]
        );
        // Every scanned song has the same artist, so this matches all of them
        assert_eq!(scanner.search("unknown").len(), 3);
        assert!(scanner.search("sunrise").is_empty());
    }

    #[test]
    fn test_filter_on_existing_list() {
        let songs = vec![
            Song::new("Paranoid Android", "Radiohead", "/a.mp3", Duration::ZERO),
            Song::new("Android Lust", "Unknown", "/b.mp3", Duration::ZERO),
            Song::new("Karma Police", "Radiohead", "/c.mp3", Duration::ZERO),
        ];

        assert_eq!(LibraryScanner::filter(&songs, "android").len(), 2);
        assert_eq!(LibraryScanner::filter(&songs, "RADIO").len(), 2);
        assert_eq!(LibraryScanner::filter(&songs, "").len(), 3);
    }
}
