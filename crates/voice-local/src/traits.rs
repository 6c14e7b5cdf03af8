use crate::{AudioError, HeardText, ListenError};
use std::time::Duration;

/// A blocking speech input/output device.
pub trait AudioIo {
    /// Wait at most `timeout` for one utterance and return its text.
    fn listen(&mut self, timeout: Duration) -> Result<HeardText, ListenError>;

    /// Speak `text`, optionally with a specific installed voice.
    fn speak(&mut self, text: &str, voice_index: Option<usize>) -> Result<(), AudioError>;

    /// Short backend name used in logs.
    fn name(&self) -> &str {
        "audio"
    }
}
