#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
//! voice-local: speech input/output traits with console and mock backends
//!
//! Recognition and synthesis are external services; the assistant only sees
//! the [`AudioIo`] trait. The default build enables a scripted `mock` backend
//! so session logic can be exercised without a microphone or speakers.

mod types;
pub use types::{AudioConfig, HeardText};

mod error;
pub use error::{AudioError, ListenError};

mod traits;
pub use traits::AudioIo;

mod console;
pub use console::ConsoleAudio;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockAudio, SpokenLine};

#[cfg(feature = "audio")]
pub mod devices;

pub mod plugin;
