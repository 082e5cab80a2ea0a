use soundturner::{
    audio::RodioOutput, config::default_music_directory, LibraryScanner, PlaybackEngine, PlayerEvent,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("SoundTurner Playback Test");
    println!("=========================");

    let music_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_music_directory);

    println!("Scanning {:?}...", music_dir);
    let songs = LibraryScanner::new(&music_dir).scan();

    // Shortest known song, so the finish check doesn't take forever
    let song = songs
        .into_iter()
        .filter(|s| !s.duration().is_zero())
        .min_by_key(|s| s.duration())
        .ok_or_else(|| anyhow::anyhow!("No songs with a known duration in {:?}", music_dir))?;

    println!("Testing playback with:");
    println!("   Title: {}", song.title());
    println!("   Duration: {}", song.display_duration());
    println!("   Path: {:?}", song.file_path());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = PlaybackEngine::with_output(Box::new(RodioOutput::try_default()?));
    engine.set_event_sender(tx);

    println!("\nStarting playback...");
    engine.play(song.clone())?;
    sleep(Duration::from_secs(3)).await;

    println!("Pausing...");
    engine.pause();
    sleep(Duration::from_secs(1)).await;

    println!("Resuming...");
    engine.resume();

    println!("Volume to 30%...");
    engine.set_volume(0.3);
    println!("   Position: {:?} ({:.1}%)", engine.position(), engine.percentage());

    println!("Waiting for the finished notification...");
    let wait = song.duration() + Duration::from_secs(5);
    let finished = timeout(wait, async {
        while let Some(event) = rx.recv().await {
            if let PlayerEvent::Finished { session, .. } = event {
                return Some(session);
            }
        }
        None
    })
    .await;

    match finished {
        Ok(Some(session)) => println!("Finished fired for session {}", session),
        _ => println!("No finished notification within {:?}", wait),
    }

    println!("Stopping (twice, should be harmless)...");
    engine.stop();
    engine.stop();

    println!("Playback test completed");
    Ok(())
}
