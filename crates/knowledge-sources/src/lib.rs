#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
//! knowledge-sources: the assistant's outward-facing lookups
//!
//! Two narrow collaborators are exposed as traits: [`SearchLauncher`] hands a
//! query to the system browser and [`Summarizer`] returns a short spoken
//! summary for a topic. Real backends shell out to the platform opener and
//! call the Wikipedia REST API; the `mock` feature adds recording doubles.

mod error;
pub use error::KnowledgeError;

mod traits;
pub use traits::{SearchLauncher, Summarizer};

mod browser;
pub use browser::{search_url, BrowserSearch};

mod text;
pub use text::first_sentences;

#[cfg(feature = "wikipedia")]
mod wikipedia;
#[cfg(feature = "wikipedia")]
pub use wikipedia::{wiki_language, WikipediaSummarizer};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockSearch, MockSummarizer};
