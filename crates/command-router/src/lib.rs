#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
//! Command router for spoken assistant commands
//!
//! This crate turns recognized text into a [`CommandRequest`] using an ordered
//! keyword table, then runs the matching handler through a [`Dispatcher`].
//! Handlers always produce something to say; collaborator failures become
//! spoken fallbacks.

mod intent;
pub use intent::{
    CommandRequest, FollowUp, Intent, ARG_QUERY, ARG_TOPIC, ARG_WAKE_WORD, TOPIC_IDENTITY,
    TOPIC_PREFERENCES, TOPIC_WELLBEING,
};

pub mod rules;

mod parser;
pub use parser::{classify, normalize, CommandRouter};

mod dispatch;
pub use dispatch::{Control, DispatchOutcome, Dispatcher};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
