//! Intent and request definitions

use assistant_config::normalize_wake_word;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const ARG_QUERY: &str = "query";
pub const ARG_TOPIC: &str = "topic";
pub const ARG_WAKE_WORD: &str = "wake_word";

pub const TOPIC_WELLBEING: &str = "wellbeing";
pub const TOPIC_IDENTITY: &str = "identity";
pub const TOPIC_PREFERENCES: &str = "preferences";

/// What a spoken command means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Time,
    Date,
    Search,
    Joke,
    Quote,
    WikipediaLookup,
    SmallTalk,
    ChangeWakeWord,
    Sleep,
    Exit,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Time => "time",
            Intent::Date => "date",
            Intent::Search => "search",
            Intent::Joke => "joke",
            Intent::Quote => "quote",
            Intent::WikipediaLookup => "wikipedia_lookup",
            Intent::SmallTalk => "small_talk",
            Intent::ChangeWakeWord => "change_wake_word",
            Intent::Sleep => "sleep",
            Intent::Exit => "exit",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified utterance, consumed by exactly one handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Text as heard, before normalization
    pub raw_text: String,
    pub intent: Intent,
    /// Extracted arguments such as `query` or `topic`
    pub args: BTreeMap<String, String>,
}

impl CommandRequest {
    pub fn new(raw_text: impl Into<String>, intent: Intent) -> Self {
        Self {
            raw_text: raw_text.into(),
            intent,
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<String>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Non-empty argument value, if present
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// A missing argument the assistant has asked the user for.
///
/// The next utterance answers the question and is not classified itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUp {
    SearchQuery,
    WikipediaTopic,
    WakeWord,
}

impl FollowUp {
    pub fn prompt(&self) -> &'static str {
        match self {
            FollowUp::SearchQuery => "What do you want to search for on Google?",
            FollowUp::WikipediaTopic => "What would you like to search on Wikipedia?",
            FollowUp::WakeWord => "What would you like to set as the new wake word?",
        }
    }

    /// Turn the user's answer into the request that asked for it.
    pub fn into_request(self, answer: &str) -> CommandRequest {
        let value = answer.trim().to_lowercase();
        match self {
            FollowUp::SearchQuery => {
                CommandRequest::new(answer, Intent::Search).with_arg(ARG_QUERY, value)
            }
            FollowUp::WikipediaTopic => {
                CommandRequest::new(answer, Intent::WikipediaLookup).with_arg(ARG_TOPIC, value)
            }
            FollowUp::WakeWord => CommandRequest::new(answer, Intent::ChangeWakeWord)
                .with_arg(ARG_WAKE_WORD, normalize_wake_word(answer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_serializes_as_snake_case() {
        let json = serde_json::to_string(&Intent::WikipediaLookup).unwrap();
        assert_eq!(json, "\"wikipedia_lookup\"");
        assert_eq!(Intent::ChangeWakeWord.to_string(), "change_wake_word");
    }

    #[test]
    fn blank_args_are_treated_as_missing() {
        let req = CommandRequest::new("search", Intent::Search).with_arg(ARG_QUERY, "  ");
        assert_eq!(req.arg(ARG_QUERY), None);
    }

    #[test]
    fn follow_up_answer_becomes_argument() {
        let req = FollowUp::SearchQuery.into_request("Rust Books");
        assert_eq!(req.intent, Intent::Search);
        assert_eq!(req.arg(ARG_QUERY), Some("rust books"));
        assert_eq!(req.raw_text, "Rust Books");
    }

    #[test]
    fn wake_word_answer_drops_trailing_punctuation() {
        let req = FollowUp::WakeWord.into_request(" Hey  Computer. ");
        assert_eq!(req.intent, Intent::ChangeWakeWord);
        assert_eq!(req.arg(ARG_WAKE_WORD), Some("hey computer"));
    }
}
