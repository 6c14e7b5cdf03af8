#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
//! voice-session: the assistant's listen/classify/dispatch/speak loop
//!
//! A [`SessionStateMachine`] owns the audio device, the configuration and the
//! explicit [`Session`] value. It is strictly sequential: the only suspension
//! point is the bounded `listen` call, and the inactivity timeout is checked
//! synchronously around it.

mod clock;
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "mock"))]
pub use clock::ManualClock;

mod session;
pub use session::{Session, SessionState};

mod command_log;
pub use command_log::CommandLog;

mod machine;
pub use machine::{SessionStateMachine, ShutdownReason, Step};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("router setup failed: {0}")]
    Router(#[from] command_router::RouterError),
}
