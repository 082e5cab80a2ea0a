use std::collections::VecDeque;
use tracing::debug;

use super::song::Song;

/// Play queue: first in, first out, with the escape hatch of removing any
/// entry by index. Only the foreground loop touches it, so no locking.
#[derive(Debug, Clone, Default)]
pub struct SongQueue {
    songs: VecDeque<Song>,
}

impl SongQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a song to the back of the queue
    pub fn enqueue(&mut self, song: Song) {
        debug!("Queued '{}' at position {}", song.display_name(), self.songs.len());
        self.songs.push_back(song);
    }

    /// Take the song at the front. `None` means the queue is empty.
    pub fn dequeue(&mut self) -> Option<Song> {
        self.songs.pop_front()
    }

    /// Remove the song at `index`. Out-of-range indices are ignored and
    /// leave the queue untouched.
    pub fn remove_at(&mut self, index: usize) -> Option<Song> {
        let removed = self.songs.remove(index);
        if removed.is_none() {
            debug!("Ignoring remove at {} (queue length {})", index, self.songs.len());
        }
        removed
    }

    /// Owned copy of the current contents, front first
    pub fn snapshot(&self) -> Vec<Song> {
        self.songs.iter().cloned().collect()
    }

    pub fn peek(&self) -> Option<&Song> {
        self.songs.front()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn clear(&mut self) {
        debug!("Clearing {} queued songs", self.songs.len());
        self.songs.clear();
    }
}
