use super::monitor::PlaybackMonitor;
use super::output::{AudioOutput, LoadedTrack};
use super::{Song, DEFAULT_VOLUME, MONITOR_POLL_INTERVAL, MONITOR_SHUTDOWN_TIMEOUT};
use crate::error::PlaybackError;
use std::fs::File;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Identifies one playback session, from a successful `play()` to the next
/// `stop()`. Never reused within a run.
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Started { session: SessionId, song: Song },
    Paused,
    Resumed,
    Stopped,
    /// The device reached the end of the song on its own. Sent once per
    /// session, from the monitor thread.
    Finished { session: SessionId, song: Song },
    VolumeChanged(f32),
    Error(String),
}

/// Session fields shared with the monitor thread
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub current_song: Option<Song>,
    pub is_playing: bool,
    pub session: Option<SessionId>,
}

/// Poisoning only means a panic elsewhere; the fields stay consistent
pub(crate) fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

struct ActiveSession {
    id: SessionId,
    song: Song,
    track: Arc<dyn LoadedTrack>,
    monitor: Option<PlaybackMonitor>,
}

/// Owns the output device and whatever song is loaded on it
pub struct PlaybackEngine {
    output: Option<Box<dyn AudioOutput>>,
    active: Option<ActiveSession>,
    state: Arc<Mutex<SessionState>>,
    volume: f32,
    next_session: SessionId,
    poll_interval: Duration,
    event_sender: Option<mpsc::UnboundedSender<PlayerEvent>>,
}

impl PlaybackEngine {
    pub fn with_output(output: Box<dyn AudioOutput>) -> Self {
        Self::build(Some(output))
    }

    /// Engine for when the device failed to open. Everything is a safe
    /// no-op and every `play()` reports `NoDevice`.
    pub fn without_output() -> Self {
        Self::build(None)
    }

    fn build(output: Option<Box<dyn AudioOutput>>) -> Self {
        Self {
            output,
            active: None,
            state: Arc::new(Mutex::new(SessionState::default())),
            volume: DEFAULT_VOLUME,
            next_session: 1,
            poll_interval: MONITOR_POLL_INTERVAL,
            event_sender: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<PlayerEvent>) {
        self.event_sender = Some(sender);
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&mut self, song: Song) -> Result<(), PlaybackError> {
        // Validate before touching the current session
        let path = song.file_path();
        if !path.is_file() {
            return Err(PlaybackError::FileNotFound(path.to_path_buf()));
        }
        File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        if self.output.is_none() {
            return Err(PlaybackError::NoDevice);
        }

        self.stop();

        let loaded = match self.output.as_ref() {
            Some(output) => output.load(song.file_path()),
            None => Err(PlaybackError::NoDevice),
        };
        let track = match loaded {
            Ok(track) => track,
            Err(e) => {
                self.report_error(&e);
                return Err(e);
            }
        };

        track.set_volume(self.volume);
        track.play();

        let id = self.next_session;
        self.next_session += 1;

        {
            let mut state = lock_state(&self.state);
            state.current_song = Some(song.clone());
            state.is_playing = true;
            state.session = Some(id);
        }

        let monitor = match PlaybackMonitor::spawn(
            id,
            song.clone(),
            track.clone(),
            self.state.clone(),
            self.event_sender.clone(),
            self.poll_interval,
        ) {
            Ok(monitor) => monitor,
            Err(e) => {
                track.stop();
                self.clear_state();
                self.report_error(&e);
                return Err(e);
            }
        };

        info!("Playing {} (session {})", song.display_name(), id);
        self.active = Some(ActiveSession {
            id,
            song: song.clone(),
            track,
            monitor: Some(monitor),
        });
        self.emit(PlayerEvent::Started { session: id, song });

        Ok(())
    }

    pub fn pause(&mut self) {
        let Some(active) = &self.active else {
            return;
        };

        {
            let mut state = lock_state(&self.state);
            if !state.is_playing {
                return;
            }
            // Already ran dry: leave is_playing set so the monitor reports it
            if active.track.is_finished() {
                return;
            }
            active.track.pause();
            state.is_playing = false;
        }

        debug!("Paused session {}", active.id);
        self.emit(PlayerEvent::Paused);
    }

    pub fn resume(&mut self) {
        let Some(active) = &self.active else {
            return;
        };

        // Nothing left to resume once the device has played it all
        if active.track.is_finished() {
            return;
        }

        {
            let mut state = lock_state(&self.state);
            if state.is_playing || state.current_song.is_none() {
                return;
            }
            active.track.play();
            state.is_playing = true;
        }

        debug!("Resumed session {}", active.id);
        self.emit(PlayerEvent::Resumed);
    }

    /// Tear down the current session. Safe to call with nothing playing.
    pub fn stop(&mut self) {
        let Some(mut active) = self.active.take() else {
            self.clear_state();
            return;
        };

        // Settle the monitor before touching shared state
        if let Some(monitor) = active.monitor.take() {
            monitor.shutdown(MONITOR_SHUTDOWN_TIMEOUT);
        }

        active.track.stop();
        self.clear_state();
        debug!("Stopped session {}", active.id);

        // Dropping the session releases the sink and the file with it
        drop(active);
        self.emit(PlayerEvent::Stopped);
    }

    pub fn set_volume(&mut self, volume: f32) {
        let clamped = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume = clamped;

        if let Some(active) = &self.active {
            active.track.set_volume(clamped);
        }

        self.emit(PlayerEvent::VolumeChanged(clamped));
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn position(&self) -> Duration {
        self.active
            .as_ref()
            .map(|active| active.track.position())
            .unwrap_or(Duration::ZERO)
    }

    /// Decoder's idea of the length, falling back to what the scanner probed
    pub fn total_duration(&self) -> Duration {
        self.active
            .as_ref()
            .map(|active| active.track.total_duration().unwrap_or(active.song.duration()))
            .unwrap_or(Duration::ZERO)
    }

    /// Progress through the current song, 0-100
    pub fn percentage(&self) -> f64 {
        let total = self.total_duration();
        if total.is_zero() {
            return 0.0;
        }

        (self.position().as_secs_f64() / total.as_secs_f64() * 100.0).min(100.0)
    }

    pub fn current_song(&self) -> Option<Song> {
        lock_state(&self.state).current_song.clone()
    }

    pub fn is_playing(&self) -> bool {
        lock_state(&self.state).is_playing
    }

    pub fn session_id(&self) -> Option<SessionId> {
        lock_state(&self.state).session
    }

    pub fn is_current_session(&self, session: SessionId) -> bool {
        self.session_id() == Some(session)
    }

    pub fn state(&self) -> PlaybackState {
        let Some(active) = &self.active else {
            return PlaybackState::Stopped;
        };

        if self.is_playing() {
            PlaybackState::Playing
        } else if active.track.is_finished() {
            PlaybackState::Stopped
        } else {
            PlaybackState::Paused
        }
    }

    fn clear_state(&self) {
        let mut state = lock_state(&self.state);
        state.current_song = None;
        state.is_playing = false;
        state.session = None;
    }

    fn report_error(&self, e: &PlaybackError) {
        error!("Playback failed: {}", e);
        self.emit(PlayerEvent::Error(e.to_string()));
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
