use crate::error::Result;
use crate::{KnowledgeError, SearchLauncher, Summarizer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Records every query instead of opening a browser.
#[derive(Debug, Default, Clone)]
pub struct MockSearch {
    queries: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose every call fails, like a host with no browser.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl SearchLauncher for MockSearch {
    fn search(&self, query: &str) -> Result<()> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        if self.fail {
            return Err(KnowledgeError::Unavailable("no browser".to_string()));
        }
        Ok(())
    }
}

/// Answers from a fixed table; unknown topics are `NotFound`.
#[derive(Debug, Default, Clone)]
pub struct MockSummarizer {
    answers: HashMap<String, Result<String>>,
    topics: Arc<Mutex<Vec<String>>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, topic: &str, summary: &str) -> Self {
        self.answers
            .insert(topic.to_lowercase(), Ok(summary.to_string()));
        self
    }

    pub fn with_error(mut self, topic: &str, err: KnowledgeError) -> Self {
        self.answers.insert(topic.to_lowercase(), Err(err));
        self
    }

    /// Topics requested so far, in order.
    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl Summarizer for MockSummarizer {
    fn summarize(&self, topic: &str, sentences: usize) -> Result<String> {
        if let Ok(mut topics) = self.topics.lock() {
            topics.push(topic.to_string());
        }
        match self.answers.get(&topic.to_lowercase()) {
            Some(Ok(text)) => Ok(crate::first_sentences(text, sentences)),
            Some(Err(e)) => Err(e.clone()),
            None => Err(KnowledgeError::NotFound),
        }
    }
}
