//! Voice Assistant
//!
//! Waits for the wake word, then answers spoken commands until told to stop:
//! Speech → Router → Handler → Speech

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use assistant_config::{ConfigStore, Configuration, JsonFileStore, DEFAULT_CONFIG_FILE};
use command_router::Dispatcher;
use knowledge_sources::{BrowserSearch, WikipediaSummarizer};
use voice_local::plugin::{new_audio_backend, AudioBackendKind};
use voice_local::AudioConfig;
use voice_session::{SessionStateMachine, SystemClock};

/// Environment variable naming the settings file
const CONFIG_ENV: &str = "VOICE_ASSISTANT_CONFIG";

#[derive(Parser)]
#[command(name = "voice-assistant")]
#[command(about = "Wake-word voice assistant")]
struct Args {
    /// Wake word to listen for (overrides the settings file)
    #[arg(long)]
    wake_word: Option<String>,

    /// Seconds of inactivity before going back to sleep
    #[arg(long)]
    timeout: Option<u64>,

    /// Index of the synthesis voice to use
    #[arg(long)]
    voice_index: Option<usize>,
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    info!("🎤 Starting voice assistant");

    let store = JsonFileStore::new(config_path());
    let config = apply_overrides(store.load(), &args);
    info!(
        "Wake word '{}', timeout {}s, settings at {}",
        config.wake_word,
        config.timeout_seconds,
        store.path().display()
    );

    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("Error setting Ctrl-C handler")?;

    #[cfg(feature = "audio")]
    voice_local::devices::probe_default_devices().context("No usable microphone or speaker")?;

    let audio_cfg = AudioConfig {
        language: Some(config.language.clone()),
        show_prompt: true,
    };
    let audio = new_audio_backend(AudioBackendKind::Console, audio_cfg, interrupt)
        .context("Failed to initialize audio")?;

    let summarizer =
        WikipediaSummarizer::new(&config.language).context("Failed to set up Wikipedia client")?;
    let dispatcher = Dispatcher::new(
        Box::new(BrowserSearch::new()),
        Box::new(summarizer),
        Box::new(store),
    );

    let mut machine = SessionStateMachine::new(config, audio, dispatcher, SystemClock)?;
    let reason = machine.run();

    info!("✅ Voice assistant stopped ({:?})", reason);
    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Command-line values win over the file for this run only.
fn apply_overrides(mut config: Configuration, args: &Args) -> Configuration {
    if let Some(word) = &args.wake_word {
        config.wake_word = word.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_seconds = timeout;
    }
    if args.voice_index.is_some() {
        config.voice_index = args.voice_index;
    }
    config.normalize();
    config
}

fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
