use crate::ResponseTemplates;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_WAKE_WORD: &str = "hey assistant";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_LISTEN_WINDOW_SECONDS: u64 = 5;
/// Longest single blocking listen accepted from a config file.
pub const MAX_LISTEN_WINDOW_SECONDS: u64 = 300;

/// Canonical form of a wake word: lowercase, single-spaced, without the
/// trailing punctuation a recognizer tends to add.
pub fn normalize_wake_word(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_matches(|c| matches!(c, '.' | '?' | '!' | ','))
        .trim()
        .to_string()
}

/// Everything the assistant reads at runtime.
///
/// Every field has a serde default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Phrase that wakes the assistant; stored lowercase.
    #[serde(default = "default_wake_word")]
    pub wake_word: String,
    /// Seconds of silence after which an active session goes dormant.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Installed TTS voice to use; `None` keeps the engine default.
    #[serde(default)]
    pub voice_index: Option<usize>,
    /// Recognizer locale, also used to pick the Wikipedia language.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_true")]
    pub log_commands: bool,
    #[serde(default = "default_command_log_path")]
    pub command_log_path: PathBuf,
    #[serde(default = "default_wikipedia_sentences")]
    pub max_wikipedia_sentences: usize,
    /// Upper bound on a single blocking listen.
    #[serde(default = "default_listen_window_seconds")]
    pub listen_window_seconds: u64,
    /// Consecutive listen failures before the assistant says so.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default)]
    pub responses: ResponseTemplates,
}

fn default_wake_word() -> String {
    DEFAULT_WAKE_WORD.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_true() -> bool {
    true
}

fn default_command_log_path() -> PathBuf {
    PathBuf::from("command_log.txt")
}

fn default_wikipedia_sentences() -> usize {
    2
}

fn default_listen_window_seconds() -> u64 {
    DEFAULT_LISTEN_WINDOW_SECONDS
}

fn default_failure_threshold() -> u32 {
    1
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            wake_word: default_wake_word(),
            timeout_seconds: default_timeout_seconds(),
            voice_index: None,
            language: default_language(),
            log_commands: default_true(),
            command_log_path: default_command_log_path(),
            max_wikipedia_sentences: default_wikipedia_sentences(),
            listen_window_seconds: default_listen_window_seconds(),
            failure_threshold: default_failure_threshold(),
            responses: ResponseTemplates::default(),
        }
    }
}

impl Configuration {
    /// Repair values that would make the session unusable.
    pub fn normalize(&mut self) {
        self.wake_word = normalize_wake_word(&self.wake_word);
        if self.wake_word.is_empty() {
            warn!("Empty wake word in config, using '{}'", DEFAULT_WAKE_WORD);
            self.wake_word = default_wake_word();
        }
        if self.timeout_seconds == 0 {
            warn!(
                "Zero timeout in config, using {}s",
                DEFAULT_TIMEOUT_SECONDS
            );
            self.timeout_seconds = DEFAULT_TIMEOUT_SECONDS;
        }
        if self.listen_window_seconds == 0 {
            self.listen_window_seconds = DEFAULT_LISTEN_WINDOW_SECONDS;
        } else if self.listen_window_seconds > MAX_LISTEN_WINDOW_SECONDS {
            warn!(
                "Listen window of {}s is too long, using {}s",
                self.listen_window_seconds, MAX_LISTEN_WINDOW_SECONDS
            );
            self.listen_window_seconds = MAX_LISTEN_WINDOW_SECONDS;
        }
        if self.failure_threshold == 0 {
            self.failure_threshold = default_failure_threshold();
        }
    }

    /// Replace the wake word, returning `true` if it changed.
    pub fn set_wake_word(&mut self, phrase: &str) -> bool {
        let phrase = normalize_wake_word(phrase);
        if phrase.is_empty() || phrase == self.wake_word {
            return false;
        }
        self.wake_word = phrase;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Configuration::default();
        assert_eq!(cfg.wake_word, "hey assistant");
        assert_eq!(cfg.timeout_seconds, 60);
        assert_eq!(cfg.voice_index, None);
        assert_eq!(cfg.max_wikipedia_sentences, 2);
        assert_eq!(cfg.failure_threshold, 1);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: Configuration =
            serde_json::from_str(r#"{"wake_word":"jarvis","voice_index":1}"#).unwrap();
        assert_eq!(cfg.wake_word, "jarvis");
        assert_eq!(cfg.voice_index, Some(1));
        assert_eq!(cfg.timeout_seconds, 60);
        assert!(cfg.log_commands);
    }

    #[test]
    fn normalize_repairs_unusable_values() {
        let mut cfg = Configuration {
            wake_word: "   ".to_string(),
            timeout_seconds: 0,
            listen_window_seconds: 0,
            ..Configuration::default()
        };
        cfg.normalize();
        assert_eq!(cfg.wake_word, DEFAULT_WAKE_WORD);
        assert_eq!(cfg.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(cfg.listen_window_seconds, DEFAULT_LISTEN_WINDOW_SECONDS);

        let mut cfg = Configuration {
            wake_word: "  Hey Jarvis ".to_string(),
            ..Configuration::default()
        };
        cfg.normalize();
        assert_eq!(cfg.wake_word, "hey jarvis");
    }

    #[test]
    fn set_wake_word_reports_changes() {
        let mut cfg = Configuration::default();
        assert!(cfg.set_wake_word("Computer"));
        assert_eq!(cfg.wake_word, "computer");
        assert!(!cfg.set_wake_word("computer"));
        assert!(!cfg.set_wake_word("  "));
        assert!(!cfg.set_wake_word("Computer."));
        assert_eq!(cfg.wake_word, "computer");
    }

    #[test]
    fn wake_word_loses_spacing_and_punctuation() {
        assert_eq!(normalize_wake_word("  Hey   Jarvis! "), "hey jarvis");
        assert_eq!(normalize_wake_word("Computer."), "computer");
        assert_eq!(normalize_wake_word("?!"), "");

        let mut cfg = Configuration {
            wake_word: "Hey, Computer.".to_string(),
            ..Configuration::default()
        };
        cfg.normalize();
        assert_eq!(cfg.wake_word, "hey, computer");
    }

    #[test]
    fn oversized_listen_window_is_capped() {
        let mut cfg: Configuration =
            serde_json::from_str(r#"{"listen_window_seconds":18446744073709551615}"#).unwrap();
        cfg.normalize();
        assert_eq!(cfg.listen_window_seconds, MAX_LISTEN_WINDOW_SECONDS);
    }
}
