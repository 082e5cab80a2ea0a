// SoundTurner Library - Core modules for the terminal music queue
// Queue + playback engine + library scanning, with a thin menu UI on top

pub mod audio; // playback, monitoring, queue, scanning
pub mod config; // settings and defaults
pub mod controller; // menu actions + autoplay
pub mod error; // playback/config error types
pub mod ui; // terminal interface

// Export the stuff other modules actually use
pub use audio::{LibraryScanner, PlaybackEngine, PlayerEvent, Song, SongQueue};
pub use config::Config;
pub use controller::MenuController;
pub use error::{ConfigError, PlaybackError};
