use soundturner::{config::default_music_directory, LibraryScanner};
use std::collections::HashMap;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    println!("SoundTurner Library Scanner Test");
    println!("================================");

    let music_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_music_directory);

    if !music_dir.exists() {
        println!("Music directory not found: {:?}", music_dir);
        return Ok(());
    }

    println!("Scanning music directory: {:?}", music_dir);

    let scanner = LibraryScanner::new(&music_dir);
    let songs = scanner.scan();
    println!("Found {} songs", songs.len());
    println!();

    // Show first 10 songs
    for (i, song) in songs.iter().take(10).enumerate() {
        println!("{}. {}", i + 1, song.title());
        println!("   Artist: {}", song.artist());
        println!("   Format: {:?}", song.format());
        println!("   Duration: {}", song.display_duration());
        println!("   Path: {:?}", song.file_path());
        println!();
    }

    if songs.len() > 10 {
        println!("... and {} more songs", songs.len() - 10);
    }

    let mut format_counts = HashMap::new();
    for song in &songs {
        *format_counts.entry(format!("{:?}", song.format())).or_insert(0) += 1;
    }

    println!("\nFormat breakdown:");
    for (format, count) in format_counts {
        println!("   {}: {} files", format, count);
    }

    let unprobed = songs.iter().filter(|s| s.duration().is_zero()).count();
    if unprobed > 0 {
        println!("\n{} songs have no known duration (try --features probe)", unprobed);
    }

    Ok(())
}
