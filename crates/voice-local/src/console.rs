//! Text console stand-in for a speech engine.
//!
//! Typed lines are treated as recognized utterances and spoken responses are
//! printed. Stdin is read on a dedicated thread that feeds a channel, so that
//! `listen` can honour its window and notice interrupts while the user is
//! silent.

use crate::{AudioConfig, AudioError, AudioIo, HeardText, ListenError};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_SLICE: Duration = Duration::from_millis(100);

type LineResult = Result<String, String>;

pub struct ConsoleAudio {
    cfg: AudioConfig,
    rx: Receiver<LineResult>,
    interrupt: Arc<AtomicBool>,
    prompt_pending: bool,
}

impl ConsoleAudio {
    /// Start the stdin reader thread.
    pub fn start(cfg: AudioConfig, interrupt: Arc<AtomicBool>) -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<LineResult>();
        thread::Builder::new()
            .name("console-stdin".to_string())
            .spawn(move || read_lines(io::stdin().lock(), &tx))?;
        info!(
            "Console audio ready (language: {})",
            cfg.language.as_deref().unwrap_or("default")
        );
        Ok(Self::with_receiver(cfg, rx, interrupt))
    }

    fn with_receiver(
        cfg: AudioConfig,
        rx: Receiver<LineResult>,
        interrupt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            cfg,
            rx,
            interrupt,
            prompt_pending: true,
        }
    }

    fn show_prompt(&mut self) {
        if self.cfg.show_prompt && self.prompt_pending {
            print!("🎤 ");
            if let Err(e) = io::stdout().flush() {
                debug!("Could not flush prompt: {}", e);
            }
            self.prompt_pending = false;
        }
    }
}

fn read_lines(input: impl BufRead, tx: &Sender<LineResult>) {
    for line in input.lines() {
        let item = line.map_err(|e| e.to_string());
        if tx.send(item).is_err() {
            return;
        }
    }
    // Dropping the sender tells the listener that input is closed
}

impl AudioIo for ConsoleAudio {
    fn listen(&mut self, timeout: Duration) -> Result<HeardText, ListenError> {
        self.show_prompt();
        // A window too long to represent never expires
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if self.interrupt.load(Ordering::SeqCst) {
                return Err(ListenError::Interrupted);
            }
            let now = Instant::now();
            let slice = match deadline {
                Some(deadline) if now >= deadline => return Err(ListenError::NoSpeech),
                Some(deadline) => POLL_SLICE.min(deadline - now),
                None => POLL_SLICE,
            };
            match self.rx.recv_timeout(slice) {
                Ok(Ok(line)) => {
                    self.prompt_pending = true;
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        return Err(ListenError::NoSpeech);
                    }
                    return Ok(line);
                }
                Ok(Err(e)) => {
                    self.prompt_pending = true;
                    return Err(ListenError::Recognition(e));
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(ListenError::Closed),
            }
        }
    }

    fn speak(&mut self, text: &str, voice_index: Option<usize>) -> Result<(), AudioError> {
        if let Some(idx) = voice_index {
            debug!("Console backend ignores voice index {}", idx);
        }
        let mut out = io::stdout().lock();
        writeln!(out, "🔊 {}", text)?;
        out.flush()?;
        self.prompt_pending = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

impl Drop for ConsoleAudio {
    fn drop(&mut self) {
        info!("Console audio released");
    }
}
