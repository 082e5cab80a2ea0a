//! The boundary between the playback engine and the sound card.
//!
//! `AudioOutput` opens files into `LoadedTrack`s; a loaded track is the
//! per-file transport handle the engine drives and the monitor polls. The
//! real implementation sits on a rodio `Sink`; tests swap in `fake`.

use crate::error::PlaybackError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Transport controls for one opened file. Shared between the engine and the
/// monitor thread, hence `Send + Sync`.
pub trait LoadedTrack: Send + Sync {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn set_volume(&self, volume: f32);
    fn position(&self) -> Duration;
    fn total_duration(&self) -> Option<Duration>;
    /// True once the device has run out of audio for this file
    fn is_finished(&self) -> bool;
}

pub trait AudioOutput {
    /// Open and decode `path`. The returned track must be paused; the engine
    /// sets volume before starting output.
    fn load(&self, path: &Path) -> Result<Arc<dyn LoadedTrack>, PlaybackError>;
}

pub struct RodioOutput {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioOutput {
    /// Grab the default output device
    pub fn try_default() -> Result<Self, PlaybackError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn load(&self, path: &Path) -> Result<Arc<dyn LoadedTrack>, PlaybackError> {
        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Symphonia handles the M4A/AAC side of things
        let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let total = source.total_duration();

        let sink = Sink::try_new(&self.stream_handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        sink.pause();
        sink.append(source);

        Ok(Arc::new(RodioTrack { sink, total }))
    }
}

struct RodioTrack {
    sink: Sink,
    total: Option<Duration>,
}

impl LoadedTrack for RodioTrack {
    fn play(&self) {
        self.sink.play();
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn stop(&self) {
        self.sink.stop();
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.total
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}
