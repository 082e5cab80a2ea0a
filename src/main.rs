// SoundTurner - Terminal Music Queue
// Pick songs from your music folder, queue them up, let autoplay take it from there

use anyhow::Result;
use clap::Parser;
use soundturner::{
    audio::RodioOutput, ui::App, Config, LibraryScanner, MenuController, PlaybackEngine,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "soundturner")]
#[command(about = "A terminal music queue with autoplay")]
struct Args {
    /// Music folder to browse (default: <Music>/SoundTurner)
    #[arg(long)]
    music_dir: Option<PathBuf>,

    /// Starting volume, 0.0 - 1.0
    #[arg(long)]
    volume: Option<f32>,

    /// Start with autoplay switched off
    #[arg(long)]
    no_autoplay: bool,

    /// Read settings from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable developer logging (keep stderr + debug output)
    #[arg(long)]
    dev: bool,
}

fn init_logging(log_dir: &Path, dev: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file; the TUI owns stdout
    let file_appender = tracing_appender::rolling::daily(log_dir, "soundturner.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = if dev { "debug" } else { "info,soundturner=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = args.music_dir {
        config.music_directory = dir;
    }
    if let Some(volume) = args.volume {
        config.set_volume(volume);
    }
    if args.no_autoplay {
        config.autoplay = false;
    }

    // Held until exit so buffered log lines get flushed
    let _log_guard = init_logging(&config.log_directory, args.dev)?;
    info!("SoundTurner starting up");
    debug!("Config: {:?}", config);

    // ALSA likes to chat on stderr, which trashes the TUI
    if !args.dev {
        if let Err(e) = redirect_stderr_to_null() {
            warn!("Could not silence stderr: {}", e);
        }
    }

    let scanner = LibraryScanner::new(&config.music_directory);
    if let Err(e) = scanner.ensure_root() {
        warn!("Could not create {}: {}", config.music_directory.display(), e);
    }

    let mut engine = match RodioOutput::try_default() {
        Ok(output) => PlaybackEngine::with_output(Box::new(output)),
        Err(e) => {
            // Keep going: browsing and queueing still work without sound
            error!("Audio output unavailable: {}", e);
            PlaybackEngine::without_output()
        }
    };
    engine.set_volume(config.volume);

    let mut controller = MenuController::new(engine, scanner, config.autoplay);
    controller.refresh_library();

    let mut app = App::new(controller)?;
    app.run().await?;

    info!("SoundTurner shut down cleanly");
    Ok(())
}

/// Redirect stderr to /dev/null to suppress ALSA error messages that interfere with TUI
#[cfg(unix)]
fn redirect_stderr_to_null() -> Result<()> {
    unsafe {
        let null_fd = libc::open(b"/dev/null\0".as_ptr() as *const libc::c_char, libc::O_WRONLY);
        if null_fd == -1 {
            return Err(anyhow::anyhow!("Failed to open /dev/null"));
        }

        if libc::dup2(null_fd, libc::STDERR_FILENO) == -1 {
            libc::close(null_fd);
            return Err(anyhow::anyhow!("Failed to redirect stderr"));
        }

        libc::close(null_fd);
    }

    Ok(())
}

#[cfg(not(unix))]
fn redirect_stderr_to_null() -> Result<()> {
    Ok(())
}
