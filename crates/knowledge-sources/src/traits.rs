use crate::error::Result;

/// Opens a web search for a query somewhere the user can see it.
pub trait SearchLauncher {
    fn search(&self, query: &str) -> Result<()>;
}

/// Produces a short plain-text summary of a topic.
pub trait Summarizer {
    /// Summarize `topic` in at most `sentences` sentences (0 means no limit).
    fn summarize(&self, topic: &str, sentences: usize) -> Result<String>;
}
