//! Per-intent command handlers

use crate::intent::{
    CommandRequest, FollowUp, Intent, ARG_QUERY, ARG_TOPIC, ARG_WAKE_WORD, TOPIC_IDENTITY,
    TOPIC_PREFERENCES,
};
use crate::parser::classify;
use assistant_config::templates::{self, render};
use assistant_config::{normalize_wake_word, ConfigStore, Configuration};
use knowledge_sources::{KnowledgeError, SearchLauncher, Summarizer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{info, warn};

const WIKI_NOT_FOUND: &str = "Unfortunately, there is no page with that title.";
const WIKI_AMBIGUOUS: &str = "The topic is ambiguous, please be more specific.";
const WIKI_FAILED: &str = "Sorry, something went wrong with the Wikipedia search.";
const SEARCH_FAILED: &str = "Sorry, I couldn't open a web browser for that search.";

/// What the session should do after speaking a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Sleep,
    Exit,
    /// The response was a question; the next utterance answers it
    AwaitFollowUp(FollowUp),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub response: String,
    pub control: Control,
}

impl DispatchOutcome {
    fn say(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            control: Control::Continue,
        }
    }

    fn ask(follow_up: FollowUp) -> Self {
        Self {
            response: follow_up.prompt().to_string(),
            control: Control::AwaitFollowUp(follow_up),
        }
    }
}

/// Runs command handlers against the knowledge sources and config store
pub struct Dispatcher {
    search: Box<dyn SearchLauncher>,
    summarizer: Box<dyn Summarizer>,
    store: Box<dyn ConfigStore>,
    rng: StdRng,
}

impl Dispatcher {
    pub fn new(
        search: Box<dyn SearchLauncher>,
        summarizer: Box<dyn Summarizer>,
        store: Box<dyn ConfigStore>,
    ) -> Self {
        Self {
            search,
            summarizer,
            store,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fix the phrase-selection seed so responses are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Pick a phrase from one of the configured pools, filling `{wake_word}`.
    pub fn phrase(&mut self, config: &Configuration, pool: &str) -> String {
        let template = config.responses.pick(pool, &mut self.rng);
        render(&template, &[("wake_word", config.wake_word.as_str())])
    }

    /// Handle one request. Never fails: every error becomes a spoken fallback.
    pub fn dispatch(
        &mut self,
        request: &CommandRequest,
        config: &mut Configuration,
        now: OffsetDateTime,
    ) -> DispatchOutcome {
        info!("Dispatching {} for '{}'", request.intent, request.raw_text);
        match request.intent {
            Intent::Time => DispatchOutcome::say(tell_time(now)),
            Intent::Date => DispatchOutcome::say(tell_date(now)),
            Intent::Joke => DispatchOutcome::say(self.phrase(config, templates::JOKES)),
            Intent::Quote => DispatchOutcome::say(self.phrase(config, templates::QUOTES)),
            Intent::SmallTalk => {
                let pool = match request.arg(ARG_TOPIC) {
                    Some(TOPIC_IDENTITY) => templates::IDENTITY,
                    Some(TOPIC_PREFERENCES) => templates::PREFERENCES,
                    _ => templates::GREETINGS,
                };
                DispatchOutcome::say(self.phrase(config, pool))
            }
            Intent::Search => match request.arg(ARG_QUERY) {
                Some(query) => DispatchOutcome::say(self.web_search(query)),
                None => DispatchOutcome::ask(FollowUp::SearchQuery),
            },
            Intent::WikipediaLookup => match request.arg(ARG_TOPIC) {
                Some(topic) => {
                    DispatchOutcome::say(self.wikipedia(topic, config.max_wikipedia_sentences))
                }
                None => DispatchOutcome::ask(FollowUp::WikipediaTopic),
            },
            Intent::ChangeWakeWord => match request.arg(ARG_WAKE_WORD) {
                Some(phrase) => self.change_wake_word(phrase, config),
                None => DispatchOutcome::ask(FollowUp::WakeWord),
            },
            Intent::Sleep => DispatchOutcome {
                response: self.phrase(config, templates::SLEEP),
                control: Control::Sleep,
            },
            Intent::Exit => DispatchOutcome {
                response: self.phrase(config, templates::FAREWELL),
                control: Control::Exit,
            },
            Intent::Unknown => {
                DispatchOutcome::say(self.phrase(config, templates::UNKNOWN_COMMAND))
            }
        }
    }

    fn web_search(&mut self, query: &str) -> String {
        match self.search.search(query) {
            Ok(()) => format!("Searching for {query} on Google. Here are the search results."),
            Err(e) => {
                warn!("Web search for '{}' failed: {}", query, e);
                SEARCH_FAILED.to_string()
            }
        }
    }

    fn wikipedia(&mut self, topic: &str, sentences: usize) -> String {
        match self.summarizer.summarize(topic, sentences) {
            Ok(summary) => summary,
            Err(KnowledgeError::NotFound) => WIKI_NOT_FOUND.to_string(),
            Err(KnowledgeError::Ambiguous) => WIKI_AMBIGUOUS.to_string(),
            Err(e) => {
                warn!("Wikipedia lookup for '{}' failed: {}", topic, e);
                WIKI_FAILED.to_string()
            }
        }
    }

    fn change_wake_word(&mut self, phrase: &str, config: &mut Configuration) -> DispatchOutcome {
        let phrase = normalize_wake_word(phrase);
        if phrase.is_empty() {
            return DispatchOutcome::ask(FollowUp::WakeWord);
        }
        // A wake word that is also a command could never be said as that command
        let clash = classify(&phrase);
        if clash != Intent::Unknown {
            info!("Refusing wake word '{}', it reads as {}", phrase, clash);
            return DispatchOutcome::say(format!(
                "Sorry, {phrase} is already a command, so it can't be the wake word."
            ));
        }
        if config.set_wake_word(&phrase) {
            info!("Wake word changed to '{}'", phrase);
        }
        match self.store.save(config) {
            Ok(()) => DispatchOutcome::say(format!("Wake word changed to {phrase}.")),
            Err(e) => {
                warn!("Could not persist new wake word: {}", e);
                DispatchOutcome::say(format!(
                    "Wake word changed to {phrase}, but I couldn't save it."
                ))
            }
        }
    }
}

fn tell_time(now: OffsetDateTime) -> String {
    match now.format(format_description!("[hour]:[minute]")) {
        Ok(hm) => format!("The current time is {hm}."),
        Err(e) => {
            warn!("Failed to format time: {}", e);
            "Sorry, I couldn't read the clock.".to_string()
        }
    }
}

fn tell_date(now: OffsetDateTime) -> String {
    match now.format(format_description!("[year]-[month]-[day]")) {
        Ok(day) => format!("Today's date is {day}."),
        Err(e) => {
            warn!("Failed to format date: {}", e);
            "Sorry, I couldn't read the calendar.".to_string()
        }
    }
}
