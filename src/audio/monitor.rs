//! Watches one playback session for the moment the device runs dry.
//!
//! One monitor per session. It polls the loaded track, and when the device is
//! done while the engine still thinks it is playing, it flips `is_playing`,
//! sends `PlayerEvent::Finished` once, and exits. Cancellation is a channel:
//! the poll sleep is a `recv_timeout` on it, so dropping the sender wakes the
//! thread straight away.

use super::output::LoadedTrack;
use super::player::{lock_state, PlayerEvent, SessionId, SessionState};
use super::song::Song;
use crate::error::PlaybackError;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

pub struct PlaybackMonitor {
    session: SessionId,
    cancel_tx: Option<mpsc::Sender<()>>,
    done_rx: mpsc::Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

/// Everything the polling thread needs, moved in at spawn time
struct Watch {
    session: SessionId,
    song: Song,
    track: Arc<dyn LoadedTrack>,
    state: Arc<Mutex<SessionState>>,
    events: Option<UnboundedSender<PlayerEvent>>,
}

impl PlaybackMonitor {
    pub(crate) fn spawn(
        session: SessionId,
        song: Song,
        track: Arc<dyn LoadedTrack>,
        state: Arc<Mutex<SessionState>>,
        events: Option<UnboundedSender<PlayerEvent>>,
        poll_interval: Duration,
    ) -> Result<Self, PlaybackError> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let watch = Watch {
            session,
            song,
            track,
            state,
            events,
        };

        let handle = thread::Builder::new()
            .name(format!("playback-monitor-{}", session))
            .spawn(move || {
                // Dropped on exit, which is what shutdown() waits for
                let _done = done_tx;
                watch.run(cancel_rx, poll_interval);
            })
            .map_err(|e| PlaybackError::Device(format!("failed to start playback monitor: {}", e)))?;

        debug!("Playback monitor started for session {}", session);

        Ok(Self {
            session,
            cancel_tx: Some(cancel_tx),
            done_rx,
            handle: Some(handle),
        })
    }

    /// Cancel the monitor and wait up to `timeout` for the thread to exit.
    /// Returns false if it had to be left behind; a straggler can no longer
    /// fire because its session is not current anymore.
    pub fn shutdown(mut self, timeout: Duration) -> bool {
        self.cancel_tx.take();

        match self.done_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Playback monitor for session {} did not exit within {:?}, detaching",
                    self.session, timeout
                );
                false
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                debug!("Playback monitor for session {} shut down", self.session);
                true
            }
        }
    }
}

impl Drop for PlaybackMonitor {
    fn drop(&mut self) {
        // Signal only; never block in drop
        self.cancel_tx.take();
    }
}

impl Watch {
    fn run(self, cancel_rx: mpsc::Receiver<()>, poll_interval: Duration) {
        loop {
            match cancel_rx.recv_timeout(poll_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            }

            if self.check() {
                return;
            }
        }
    }

    /// One poll. Returns true when the monitor is done for good.
    fn check(&self) -> bool {
        let mut state = lock_state(&self.state);

        if state.session != Some(self.session) {
            // Superseded or stopped underneath us
            return true;
        }

        if state.is_playing && self.track.is_finished() {
            state.is_playing = false;
            info!("Finished naturally: {}", self.song.display_name());

            if let Some(sender) = &self.events {
                let _ = sender.send(PlayerEvent::Finished {
                    session: self.session,
                    song: self.song.clone(),
                });
            }
            return true;
        }

        false
    }
}
