//! Spoken phrase pools.
//!
//! Each pool is a list of interchangeable phrases; one is picked at random per
//! response. Pools missing from the config file fall back to the built-in
//! lists below.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STARTUP: &str = "startup";
pub const ACTIVATION: &str = "activation";
pub const SLEEP: &str = "sleep";
pub const FAREWELL: &str = "farewell";
pub const TIMEOUT: &str = "timeout";
pub const NO_SPEECH: &str = "no_speech";
pub const NOT_UNDERSTOOD: &str = "not_understood";
pub const GREETINGS: &str = "greetings";
pub const IDENTITY: &str = "identity";
pub const PREFERENCES: &str = "preferences";
pub const JOKES: &str = "jokes";
pub const QUOTES: &str = "quotes";
pub const UNKNOWN_COMMAND: &str = "unknown_command";

fn builtin(pool: &str) -> &'static [&'static str] {
    match pool {
        STARTUP => &["Voice assistant initialized. Say '{wake_word}' to activate me."],
        ACTIVATION => &["How can I help you?"],
        SLEEP => &["Going to sleep. Say the wake word to activate me again."],
        FAREWELL => &["Goodbye!"],
        TIMEOUT => &["Timing out due to inactivity."],
        NO_SPEECH => &["I didn't hear a command."],
        NOT_UNDERSTOOD => &["Sorry, I could not understand that."],
        GREETINGS => &[
            "I'm doing well, thank you!",
            "I'm just a program, but thanks for asking!",
            "Doing great! How about you?",
        ],
        IDENTITY => &["I am your voice assistant, activated by saying the wake word."],
        PREFERENCES => &[
            "I enjoy helping you with your questions.",
            "I love learning new things from you.",
            "I like to keep you entertained!",
        ],
        JOKES => &[
            "Why do programmers prefer dark mode? Because light attracts bugs!",
            "I told my computer I needed a break, and now it won't stop sending me vacation ads.",
            "What's a computer's favorite snack? Microchips!",
            "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
        ],
        QUOTES => &[
            "The greatest glory in living lies not in never falling, but in rising every time we fall.",
            "The way to get started is to quit talking and begin doing.",
            "Your time is limited, so don't waste it living someone else's life.",
            "If life were predictable it would cease to be life, and be without flavor.",
            "Spread love everywhere you go. Let no one ever come to you without leaving happier.",
            "When you reach the end of your rope, tie a knot in it and hang on.",
        ],
        UNKNOWN_COMMAND => &[
            "I'm sorry, I can't perform that command.",
            "I don't understand that instruction.",
            "That's beyond my capabilities right now.",
        ],
        _ => &[],
    }
}

/// User-overridable phrase pools keyed by pool name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseTemplates(BTreeMap<String, Vec<String>>);

impl ResponseTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one pool.
    pub fn set_pool(&mut self, pool: &str, phrases: Vec<String>) {
        self.0.insert(pool.to_string(), phrases);
    }

    /// All phrases currently available for `pool`.
    pub fn phrases(&self, pool: &str) -> Vec<String> {
        match self.0.get(pool) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => builtin(pool).iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Pick one phrase from `pool`; an unknown pool yields an empty string.
    pub fn pick<R: Rng + ?Sized>(&self, pool: &str, rng: &mut R) -> String {
        match self.0.get(pool) {
            Some(list) if !list.is_empty() => list.choose(rng).cloned().unwrap_or_default(),
            _ => builtin(pool)
                .choose(rng)
                .map(|s| s.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Substitute `{name}` placeholders in a phrase.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}
