#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
//! assistant-config: runtime settings and spoken phrase pools
//!
//! A [`Configuration`] is loaded once at startup through a [`ConfigStore`].
//! Loading never fails: a missing or unreadable file yields defaults. Saving
//! goes through a temp file and a rename so a crash mid-write leaves the
//! previous file intact.

mod error;
pub use error::{ConfigError, Result};

mod types;
pub use types::{
    normalize_wake_word, Configuration, DEFAULT_LISTEN_WINDOW_SECONDS, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_WAKE_WORD, MAX_LISTEN_WINDOW_SECONDS,
};

pub mod templates;
pub use templates::ResponseTemplates;

mod store;
pub use store::{ConfigStore, JsonFileStore, MemoryStore, DEFAULT_CONFIG_FILE};
