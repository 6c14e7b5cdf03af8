//! Utterance classification and argument extraction

use crate::intent::{CommandRequest, Intent, ARG_QUERY, ARG_TOPIC, ARG_WAKE_WORD};
use crate::rules::first_match;
use crate::RouterError;
use regex::Regex;
use tracing::debug;

/// Lowercase, trim and collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Map an utterance to its intent. Pure and total: unmatched text is
/// [`Intent::Unknown`].
pub fn classify(text: &str) -> Intent {
    first_match(&normalize(text))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unknown)
}

/// Classifier plus the patterns that pull free-text arguments out of
/// search, Wikipedia and wake-word commands.
pub struct CommandRouter {
    search: Regex,
    wikipedia: Regex,
    wake_word: Regex,
}

impl CommandRouter {
    pub fn new() -> Result<Self, RouterError> {
        Ok(Self {
            search: Regex::new(r"\bsearch\b(?:\s+for\b)?\s*(?P<rest>.*)$")?,
            wikipedia: Regex::new(r"\bwikipedia\b(?:\s+(?:for|about|on)\b)?\s*(?P<rest>.*)$")?,
            wake_word: Regex::new(r"\bwake word\b(?:\s+to\b)?\s*(?P<rest>.*)$")?,
        })
    }

    pub fn classify(&self, text: &str) -> Intent {
        classify(text)
    }

    /// Classify `text` and extract its arguments.
    pub fn parse(&self, text: &str) -> CommandRequest {
        let normalized = normalize(text);
        let Some(rule) = first_match(&normalized) else {
            debug!("No rule matched '{}'", normalized);
            return CommandRequest::new(text, Intent::Unknown);
        };

        let mut request = CommandRequest::new(text, rule.intent);
        if let Some((key, value)) = rule.fixed_arg {
            request = request.with_arg(key, value);
        }

        let capture = match rule.intent {
            Intent::Search => Some((ARG_QUERY, &self.search)),
            Intent::WikipediaLookup => Some((ARG_TOPIC, &self.wikipedia)),
            Intent::ChangeWakeWord => Some((ARG_WAKE_WORD, &self.wake_word)),
            _ => None,
        };
        if let Some((key, re)) = capture {
            if let Some(value) = remainder(re, &normalized) {
                request = request.with_arg(key, value);
            }
        }

        debug!(
            "Parsed '{}' as {} {:?}",
            normalized, request.intent, request.args
        );
        request
    }
}

fn remainder(re: &Regex, text: &str) -> Option<String> {
    let rest = re.captures(text)?.name("rest")?.as_str();
    let rest = rest
        .trim()
        .trim_end_matches(['.', '?', '!', ','])
        .trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
