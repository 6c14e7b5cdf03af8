use thiserror::Error;

/// Why a call to [`crate::AudioIo::listen`] produced no text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListenError {
    /// The listen window elapsed without any speech.
    #[error("no speech detected")]
    NoSpeech,
    /// Speech was captured but could not be turned into text.
    #[error("recognition failed: {0}")]
    Recognition(String),
    /// The process was asked to stop while waiting.
    #[error("interrupted")]
    Interrupted,
    /// The input source is gone and will never produce text again.
    #[error("input closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no {0} device available")]
    NoDevice(&'static str),
    #[error("backend not available: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
