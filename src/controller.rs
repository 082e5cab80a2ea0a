//! Menu-side orchestration: the queue, the library and the engine, glued
//! together. Player events arrive on a channel and are only ever handled on
//! the foreground thread through `pump_events`, so auto-advance can't race a
//! user action into two playbacks.

use crate::audio::{LibraryScanner, PlaybackEngine, PlaybackState, PlayerEvent, Song, SongQueue};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Volume step for the up/down menu entries
pub const VOLUME_STEP: f32 = 0.1;

pub struct MenuController {
    queue: SongQueue,
    scanner: LibraryScanner,
    engine: PlaybackEngine,
    library: Vec<Song>,
    autoplay: bool,
    events: mpsc::UnboundedReceiver<PlayerEvent>,
    status: Option<String>,
}

impl MenuController {
    pub fn new(mut engine: PlaybackEngine, scanner: LibraryScanner, autoplay: bool) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        engine.set_event_sender(event_tx);

        Self {
            queue: SongQueue::new(),
            scanner,
            engine,
            library: Vec::new(),
            autoplay,
            events,
            status: None,
        }
    }

    pub fn refresh_library(&mut self) -> &[Song] {
        self.library = self.scanner.scan();
        if self.library.is_empty() {
            self.set_status(format!("No music found in {}", self.scanner.root().display()));
        }
        &self.library
    }

    pub fn library(&self) -> &[Song] {
        &self.library
    }

    /// Search the last full scan
    pub fn search(&self, query: &str) -> Vec<Song> {
        LibraryScanner::filter(&self.library, query)
    }

    pub fn queue(&self) -> &SongQueue {
        &self.queue
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn enqueue(&mut self, song: Song) {
        self.set_status(format!("'{}' has been added to the queue", song.display_name()));
        self.queue.enqueue(song);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Song> {
        match self.queue.remove_at(index) {
            Some(song) => {
                self.set_status(format!("'{}' has been removed from the queue", song.display_name()));
                Some(song)
            }
            None => {
                self.set_status("Nothing to remove there".to_string());
                None
            }
        }
    }

    pub fn clear_queue(&mut self) {
        let dropped = self.queue.len();
        self.queue.clear();
        self.set_status(format!("Cleared {} songs from the queue", dropped));
    }

    /// Take the front of the queue and play it
    pub fn play_next(&mut self) -> bool {
        match self.queue.dequeue() {
            Some(song) => self.start(song),
            None => {
                self.set_status("The queue is empty!".to_string());
                false
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.engine.state() {
            PlaybackState::Playing => {
                self.engine.pause();
                self.set_status("Paused".to_string());
            }
            PlaybackState::Paused => {
                self.engine.resume();
                self.set_status("Resumed".to_string());
            }
            PlaybackState::Stopped => {
                self.play_next();
            }
        }
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.set_status("Stopped".to_string());
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.engine.volume() + delta);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.engine.set_volume(volume);
        self.set_status(format!("Volume: {}%", (self.engine.volume() * 100.0).round() as u32));
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn toggle_autoplay(&mut self) -> bool {
        self.autoplay = !self.autoplay;
        self.set_status(format!("Autoplay {}", if self.autoplay { "on" } else { "off" }));
        self.autoplay
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Handle everything the engine has sent since the last call
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_player_event(event);
            handled += 1;
        }
        handled
    }

    fn handle_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Finished { session, song } => {
                // A stop or a newer play got there first
                if !self.engine.is_current_session(session) {
                    debug!("Ignoring finish from stale session {}", session);
                    return;
                }

                if !self.autoplay {
                    self.set_status(format!("Finished: {}", song.display_name()));
                    return;
                }

                match self.queue.dequeue() {
                    Some(next) => {
                        info!("Autoplay: {} -> {}", song.display_name(), next.display_name());
                        self.start(next);
                    }
                    None => {
                        self.set_status(format!("Finished: {} (queue is empty)", song.display_name()));
                    }
                }
            }
            PlayerEvent::Started { session, song } => {
                // start() already set the status; this may be long superseded
                debug!("Session {} started: {}", session, song.display_name());
            }
            PlayerEvent::Error(message) => {
                // Only play() reports these, and start() already put the failure in the status
                debug!("Engine reported: {}", message);
            }
            PlayerEvent::Paused
            | PlayerEvent::Resumed
            | PlayerEvent::Stopped
            | PlayerEvent::VolumeChanged(_) => {}
        }
    }

    fn start(&mut self, song: Song) -> bool {
        let name = song.display_name();
        match self.engine.play(song) {
            Ok(()) => {
                self.set_status(format!("Playing: {}", name));
                true
            }
            Err(e) => {
                warn!("Could not play {}: {}", name, e);
                self.set_status(format!("Could not play {}: {}", name, e));
                false
            }
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }
}
