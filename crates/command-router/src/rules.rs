//! The ordered keyword table.
//!
//! Rules are scanned top to bottom and the first rule whose keywords all
//! occur in the (lowercased) utterance wins. Order matters: rules that
//! capture free text come first, so that "search for exit signs" is a search
//! and "change wake word to goodbye" is not an exit.
//!
//! | #  | keywords                          | intent          |
//! |----|-----------------------------------|-----------------|
//! | 1  | change + wake word                | ChangeWakeWord  |
//! | 2  | set + wake word                   | ChangeWakeWord  |
//! | 3  | wikipedia                         | WikipediaLookup |
//! | 4  | search                            | Search          |
//! | 5  | exit / goodbye / bye              | Exit            |
//! | 6  | sleep / deactivate                | Sleep           |
//! | 7  | time                              | Time            |
//! | 8  | date / what day is it             | Date            |
//! | 9  | how are you                       | SmallTalk       |
//! | 10 | what is your name / who are you   | SmallTalk       |
//! | 11 | what do you like to do / hobbies  | SmallTalk       |
//! | 12 | joke                              | Joke            |
//! | 13 | quote                             | Quote           |

use crate::intent::{Intent, ARG_TOPIC, TOPIC_IDENTITY, TOPIC_PREFERENCES, TOPIC_WELLBEING};

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Every keyword must be a substring of the utterance
    pub keywords: &'static [&'static str],
    pub intent: Intent,
    /// Argument attached whenever this rule matches
    pub fixed_arg: Option<(&'static str, &'static str)>,
}

impl Rule {
    const fn new(keywords: &'static [&'static str], intent: Intent) -> Self {
        Self {
            keywords,
            intent,
            fixed_arg: None,
        }
    }

    const fn topic(keywords: &'static [&'static str], topic: &'static str) -> Self {
        Self {
            keywords,
            intent: Intent::SmallTalk,
            fixed_arg: Some((ARG_TOPIC, topic)),
        }
    }

    /// `text` must already be lowercased.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().all(|k| text.contains(k))
    }
}

pub const RULES: &[Rule] = &[
    Rule::new(&["change", "wake word"], Intent::ChangeWakeWord),
    Rule::new(&["set", "wake word"], Intent::ChangeWakeWord),
    Rule::new(&["wikipedia"], Intent::WikipediaLookup),
    Rule::new(&["search"], Intent::Search),
    Rule::new(&["exit"], Intent::Exit),
    Rule::new(&["goodbye"], Intent::Exit),
    Rule::new(&["bye"], Intent::Exit),
    Rule::new(&["sleep"], Intent::Sleep),
    Rule::new(&["deactivate"], Intent::Sleep),
    Rule::new(&["time"], Intent::Time),
    Rule::new(&["date"], Intent::Date),
    Rule::new(&["what day is it"], Intent::Date),
    Rule::topic(&["how are you"], TOPIC_WELLBEING),
    Rule::topic(&["what is your name"], TOPIC_IDENTITY),
    Rule::topic(&["who are you"], TOPIC_IDENTITY),
    Rule::topic(&["what do you like to do"], TOPIC_PREFERENCES),
    Rule::topic(&["your hobbies"], TOPIC_PREFERENCES),
    Rule::new(&["joke"], Intent::Joke),
    Rule::new(&["quote"], Intent::Quote),
];

/// First matching rule for already-lowercased text.
pub fn first_match(text: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.matches(text))
}
