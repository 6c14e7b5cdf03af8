use crate::{AudioError, AudioIo, HeardText, ListenError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One call to `speak` as observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenLine {
    pub text: String,
    pub voice_index: Option<usize>,
}

/// Scripted backend: `listen` replays queued outcomes, `speak` records text.
///
/// Once the script is exhausted `listen` reports [`ListenError::Closed`], so a
/// session driven by the mock always terminates.
#[derive(Default)]
pub struct MockAudio {
    script: VecDeque<Result<HeardText, ListenError>>,
    spoken: Arc<Mutex<Vec<SpokenLine>>>,
    fail_speak: bool,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mock that will "hear" each line in order.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mock = Self::new();
        for line in lines {
            mock.push_text(line);
        }
        mock
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.script.push_back(Ok(text.into()));
    }

    pub fn push_error(&mut self, err: ListenError) {
        self.script.push_back(Err(err));
    }

    /// Make every `speak` call fail, as a broken TTS engine would.
    pub fn failing_speech(mut self) -> Self {
        self.fail_speak = true;
        self
    }

    /// Shared handle on everything spoken so far, usable after the mock has
    /// been moved into a session.
    pub fn spoken_handle(&self) -> Arc<Mutex<Vec<SpokenLine>>> {
        Arc::clone(&self.spoken)
    }
}

impl AudioIo for MockAudio {
    fn listen(&mut self, _timeout: Duration) -> Result<HeardText, ListenError> {
        self.script.pop_front().unwrap_or(Err(ListenError::Closed))
    }

    fn speak(&mut self, text: &str, voice_index: Option<usize>) -> Result<(), AudioError> {
        if self.fail_speak {
            return Err(AudioError::Unavailable("mock speech disabled".to_string()));
        }
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(SpokenLine {
                text: text.to_string(),
                voice_index,
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
