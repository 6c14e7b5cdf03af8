use crate::{Clock, CommandLog, Session, SessionError, SessionState, SystemClock};
use assistant_config::templates;
use assistant_config::Configuration;
use command_router::{normalize, CommandRouter, Control, Dispatcher, Intent};
use std::time::Duration;
use tracing::{debug, info, warn};
use voice_local::{AudioIo, ListenError};

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// The user said an exit command
    ExitCommand,
    /// The process was interrupted (Ctrl-C)
    Interrupted,
    /// The audio input ended
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Shutdown(ShutdownReason),
}

/// Wake-word gated command loop over one audio device.
pub struct SessionStateMachine<C: Clock = SystemClock> {
    session: Session,
    config: Configuration,
    router: CommandRouter,
    dispatcher: Dispatcher,
    audio: Box<dyn AudioIo + Send>,
    clock: C,
    command_log: Option<CommandLog>,
}

impl<C: Clock> SessionStateMachine<C> {
    pub fn new(
        config: Configuration,
        audio: Box<dyn AudioIo + Send>,
        dispatcher: Dispatcher,
        clock: C,
    ) -> Result<Self, SessionError> {
        let session = Session::new(&config.wake_word, config.timeout_seconds, clock.now());
        let command_log = config
            .log_commands
            .then(|| CommandLog::new(config.command_log_path.clone()));
        Ok(Self {
            session,
            config,
            router: CommandRouter::new()?,
            dispatcher,
            audio,
            clock,
            command_log,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Announce readiness, then step until something stops the loop.
    pub fn run(&mut self) -> ShutdownReason {
        info!(
            "Session loop started on '{}' backend, wake word '{}'",
            self.audio.name(),
            self.session.wake_word()
        );
        self.say_pool(templates::STARTUP);
        loop {
            if let Step::Shutdown(reason) = self.step() {
                info!("Session loop stopped: {:?}", reason);
                return reason;
            }
        }
    }

    /// One listen and whatever it leads to.
    pub fn step(&mut self) -> Step {
        self.expire_if_idle();
        let heard = self.audio.listen(self.listen_window());
        // Silence during the listen may itself have run out the clock
        self.expire_if_idle();

        match heard {
            Ok(text) => self.on_text(&text),
            Err(ListenError::NoSpeech) => self.on_failure(templates::NO_SPEECH),
            Err(ListenError::Recognition(e)) => {
                warn!("Speech recognition failed: {}", e);
                self.on_failure(templates::NOT_UNDERSTOOD)
            }
            Err(ListenError::Interrupted) => {
                info!("Interrupted, shutting down");
                self.say_pool(templates::FAREWELL);
                Step::Shutdown(ShutdownReason::Interrupted)
            }
            Err(ListenError::Closed) => {
                info!("Audio input closed");
                Step::Shutdown(ShutdownReason::InputClosed)
            }
        }
    }

    fn listen_window(&self) -> Duration {
        let window = Duration::from_secs(self.config.listen_window_seconds);
        if self.session.is_active() {
            // Wake up just past the deadline so the timeout notice is prompt
            let remaining = self.session.remaining(self.clock.now());
            window.min(remaining.saturating_add(Duration::from_millis(100)))
        } else {
            window
        }
    }

    fn expire_if_idle(&mut self) -> bool {
        if !self.session.is_idle_expired(self.clock.now()) {
            return false;
        }
        info!(
            "No command for over {}s, going dormant",
            self.session.timeout_seconds()
        );
        self.session.time_out();
        self.say_pool(templates::TIMEOUT);
        self.session.go_dormant();
        true
    }

    fn on_failure(&mut self, pool: &str) -> Step {
        let streak = self.session.record_failure();
        debug!("Listen failure #{} ({})", streak, pool);
        if self.session.is_active() && streak == self.config.failure_threshold {
            self.say_pool(pool);
        }
        Step::Continue
    }

    fn on_text(&mut self, heard: &str) -> Step {
        let text = normalize(heard);
        if text.is_empty() {
            return self.on_failure(templates::NO_SPEECH);
        }
        self.session.reset_failures();
        debug!("Heard: {}", text);

        match self.session.state() {
            SessionState::Dormant | SessionState::TimedOut => {
                if self.session.heard_wake_word(&text) {
                    info!("Wake word detected");
                    self.session.activate(self.clock.now());
                    self.say_pool(templates::ACTIVATION);
                }
                Step::Continue
            }
            SessionState::Active => self.handle_command(heard, &text),
        }
    }

    fn handle_command(&mut self, heard: &str, text: &str) -> Step {
        if let Some(log) = &self.command_log {
            log.append(self.clock.wall_time(), text);
        }

        let request = match self.session.take_pending() {
            Some(follow_up) => follow_up.into_request(heard),
            None => self.router.parse(heard),
        };
        if request.intent == Intent::Unknown && text == self.session.wake_word() {
            // Repeating the wake word just re-prompts
            self.session.touch(self.clock.now());
            self.say_pool(templates::ACTIVATION);
            return Step::Continue;
        }

        let outcome = self
            .dispatcher
            .dispatch(&request, &mut self.config, self.clock.wall_time());
        self.session.touch(self.clock.now());
        if request.intent == Intent::ChangeWakeWord {
            self.session.set_wake_word(&self.config.wake_word);
        }
        self.say(&outcome.response);

        match outcome.control {
            Control::Continue => Step::Continue,
            Control::AwaitFollowUp(follow_up) => {
                self.session.set_pending(follow_up);
                Step::Continue
            }
            Control::Sleep => {
                info!("Going dormant on request");
                self.session.go_dormant();
                Step::Continue
            }
            Control::Exit => Step::Shutdown(ShutdownReason::ExitCommand),
        }
    }

    fn say_pool(&mut self, pool: &str) {
        let phrase = self.dispatcher.phrase(&self.config, pool);
        self.say(&phrase);
    }

    fn say(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        info!("Assistant: {}", text);
        if let Err(e) = self.audio.speak(text, self.config.voice_index) {
            warn!("Speech output failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use assistant_config::MemoryStore;
    use command_router::FollowUp;
    use knowledge_sources::{MockSearch, MockSummarizer};
    use std::sync::{Arc, Mutex};
    use time::macros::datetime;
    use voice_local::{MockAudio, SpokenLine};

    struct Harness {
        machine: SessionStateMachine<ManualClock>,
        clock: ManualClock,
        spoken: Arc<Mutex<Vec<SpokenLine>>>,
        search: MockSearch,
        store: MemoryStore,
    }

    fn quiet_config() -> Configuration {
        Configuration {
            log_commands: false,
            ..Configuration::default()
        }
    }

    fn harness_with(config: Configuration, audio: MockAudio) -> Harness {
        let clock = ManualClock::new(datetime!(2024-03-05 14:07:09 UTC));
        let search = MockSearch::new();
        let store = MemoryStore::new();
        let summarizer = MockSummarizer::new();
        let dispatcher = Dispatcher::new(
            Box::new(search.clone()),
            Box::new(summarizer),
            Box::new(store.clone()),
        )
        .with_seed(3);
        let spoken = audio.spoken_handle();
        let machine =
            SessionStateMachine::new(config, Box::new(audio), dispatcher, clock.clone()).unwrap();
        Harness {
            machine,
            clock,
            spoken,
            search,
            store,
        }
    }

    fn harness(lines: &[&str]) -> Harness {
        harness_with(quiet_config(), MockAudio::with_lines(lines.iter().copied()))
    }

    impl Harness {
        fn spoken(&self) -> Vec<String> {
            self.spoken
                .lock()
                .unwrap()
                .iter()
                .map(|l| l.text.clone())
                .collect()
        }

        fn state(&self) -> SessionState {
            self.machine.session().state()
        }
    }

    #[test]
    fn greets_answers_time_and_exits() {
        let mut h = harness(&["hey assistant", "what time is it", "exit"]);

        assert_eq!(h.machine.run(), ShutdownReason::ExitCommand);
        assert_eq!(
            h.spoken(),
            vec![
                "Voice assistant initialized. Say 'hey assistant' to activate me.",
                "How can I help you?",
                "The current time is 14:07.",
                "Goodbye!",
            ]
        );
    }

    #[test]
    fn dormant_ignores_everything_but_the_wake_word() {
        let mut h = harness(&[
            "what time is it",
            "exit",
            "hey there assistant",
            "search for python tutorials",
        ]);
        for _ in 0..4 {
            assert_eq!(h.machine.step(), Step::Continue);
            assert_eq!(h.state(), SessionState::Dormant);
        }
        assert!(h.spoken().is_empty());
        assert!(h.search.queries().is_empty());
    }

    #[test]
    fn wake_word_match_is_case_insensitive_substring() {
        let mut h = harness(&["Well, HEY ASSISTANT what time is it"]);
        h.machine.step();
        assert_eq!(h.state(), SessionState::Active);
        // Activation does not also run the trailing command
        assert_eq!(h.spoken(), vec!["How can I help you?"]);
    }

    #[test]
    fn idle_session_times_out_before_processing_new_text() {
        let mut h = harness(&["hey assistant", "what time is it"]);
        h.machine.step();
        assert_eq!(h.state(), SessionState::Active);

        h.clock.advance(Duration::from_secs(61));
        h.machine.step();

        assert_eq!(h.state(), SessionState::Dormant);
        assert_eq!(
            h.spoken(),
            vec!["How can I help you?", "Timing out due to inactivity."]
        );
    }

    #[test]
    fn activity_within_timeout_keeps_session_active() {
        let mut h = harness(&["hey assistant", "tell me a joke", "give me a quote"]);
        h.machine.step();
        h.clock.advance(Duration::from_secs(59));
        h.machine.step();
        h.clock.advance(Duration::from_secs(59));
        h.machine.step();

        assert_eq!(h.state(), SessionState::Active);
        assert_eq!(h.spoken().len(), 3);
    }

    #[test]
    fn search_passes_exact_query() {
        let mut h = harness(&["hey assistant", "search for python tutorials"]);
        h.machine.step();
        h.machine.step();

        assert_eq!(h.search.queries(), vec!["python tutorials".to_string()]);
        assert_eq!(h.state(), SessionState::Active);
    }

    #[test]
    fn missing_wikipedia_page_keeps_session_active() {
        let mut h = harness(&["hey assistant", "wikipedia artificial intelligence"]);
        h.machine.step();
        h.machine.step();

        assert_eq!(h.state(), SessionState::Active);
        assert_eq!(
            h.spoken().last().map(String::as_str),
            Some("Unfortunately, there is no page with that title.")
        );
    }

    #[test]
    fn follow_up_answer_is_used_as_argument() {
        let mut h = harness(&["hey assistant", "search", "exit strategies"]);
        h.machine.step();
        h.machine.step();
        assert_eq!(h.machine.session().pending(), Some(FollowUp::SearchQuery));

        // The answer contains "exit" but is consumed as the query
        assert_eq!(h.machine.step(), Step::Continue);
        assert_eq!(h.search.queries(), vec!["exit strategies".to_string()]);
        assert_eq!(h.machine.session().pending(), None);
    }

    #[test]
    fn sleep_returns_to_dormant() {
        let mut h = harness(&["hey assistant", "go to sleep", "what time is it"]);
        h.machine.step();
        h.machine.step();
        assert_eq!(h.state(), SessionState::Dormant);

        h.machine.step();
        assert_eq!(h.state(), SessionState::Dormant);
        assert_eq!(
            h.spoken(),
            vec![
                "How can I help you?",
                "Going to sleep. Say the wake word to activate me again.",
            ]
        );
    }

    #[test]
    fn changed_wake_word_takes_effect_and_persists() {
        let mut h = harness(&[
            "hey assistant",
            "change wake word to computer",
            "sleep",
            "hey assistant",
            "computer",
        ]);
        for _ in 0..4 {
            h.machine.step();
        }
        assert_eq!(h.state(), SessionState::Dormant);
        assert_eq!(h.machine.session().wake_word(), "computer");
        assert_eq!(h.store.saved().unwrap().wake_word, "computer");

        h.machine.step();
        assert_eq!(h.state(), SessionState::Active);
    }

    #[test]
    fn spoken_wake_word_answer_is_stored_without_punctuation() {
        let mut h = harness(&[
            "hey assistant",
            "change wake word",
            "Computer.",
            "sleep",
            "computer",
        ]);
        for _ in 0..4 {
            h.machine.step();
        }
        assert_eq!(h.machine.session().wake_word(), "computer");
        assert_eq!(h.machine.config().wake_word, "computer");
        assert_eq!(h.store.saved().unwrap().wake_word, "computer");
        assert_eq!(h.state(), SessionState::Dormant);

        h.machine.step();
        assert_eq!(h.state(), SessionState::Active);
    }

    #[test]
    fn command_shaped_wake_word_still_runs_the_command() {
        let config = Configuration {
            wake_word: "exit".to_string(),
            ..quiet_config()
        };
        let mut h = harness_with(config, MockAudio::with_lines(["exit", "exit"]));

        assert_eq!(h.machine.step(), Step::Continue);
        assert_eq!(h.state(), SessionState::Active);
        assert_eq!(h.machine.step(), Step::Shutdown(ShutdownReason::ExitCommand));
    }

    #[test]
    fn repeating_the_wake_word_re_prompts() {
        let mut h = harness(&["hey assistant", "Hey Assistant"]);
        h.machine.step();
        h.machine.step();
        assert_eq!(h.state(), SessionState::Active);
        assert_eq!(h.spoken(), vec!["How can I help you?", "How can I help you?"]);
    }

    #[test]
    fn huge_timeout_does_not_overflow_listen_window() {
        let config = Configuration {
            timeout_seconds: u64::MAX,
            ..quiet_config()
        };
        let audio = MockAudio::with_lines(["hey assistant", "tell me a joke"]);
        let mut h = harness_with(config, audio);
        h.machine.step();
        assert_eq!(h.machine.step(), Step::Continue);
        assert_eq!(h.state(), SessionState::Active);
    }

    #[test]
    fn failures_are_announced_once_per_streak() {
        let mut audio = MockAudio::with_lines(["hey assistant"]);
        audio.push_error(ListenError::NoSpeech);
        audio.push_error(ListenError::NoSpeech);
        audio.push_text("");
        audio.push_text("tell me a joke");
        audio.push_error(ListenError::Recognition("garbled".into()));
        let mut h = harness_with(quiet_config(), audio);

        for _ in 0..6 {
            assert_eq!(h.machine.step(), Step::Continue);
        }
        let spoken = h.spoken();
        assert_eq!(spoken[1], "I didn't hear a command.");
        assert_eq!(spoken.len(), 4);
        assert_eq!(spoken[3], "Sorry, I could not understand that.");
        assert_eq!(h.state(), SessionState::Active);
    }

    #[test]
    fn dormant_failures_stay_silent() {
        let mut audio = MockAudio::new();
        audio.push_error(ListenError::NoSpeech);
        audio.push_error(ListenError::Recognition("noise".into()));
        let mut h = harness_with(quiet_config(), audio);

        h.machine.step();
        h.machine.step();
        assert!(h.spoken().is_empty());
    }

    #[test]
    fn higher_threshold_waits_for_more_failures() {
        let mut audio = MockAudio::with_lines(["hey assistant"]);
        audio.push_error(ListenError::NoSpeech);
        audio.push_error(ListenError::NoSpeech);
        let config = Configuration {
            failure_threshold: 2,
            ..quiet_config()
        };
        let mut h = harness_with(config, audio);

        h.machine.step();
        h.machine.step();
        assert_eq!(h.spoken().len(), 1);
        h.machine.step();
        assert_eq!(h.spoken().last().map(String::as_str), Some("I didn't hear a command."));
    }

    #[test]
    fn interrupt_says_goodbye_and_stops() {
        let mut audio = MockAudio::with_lines(["hey assistant"]);
        audio.push_error(ListenError::Interrupted);
        let mut h = harness_with(quiet_config(), audio);

        assert_eq!(h.machine.run(), ShutdownReason::Interrupted);
        assert_eq!(h.spoken().last().map(String::as_str), Some("Goodbye!"));
    }

    #[test]
    fn end_of_input_stops_quietly() {
        let mut h = harness(&["hey assistant"]);
        assert_eq!(h.machine.run(), ShutdownReason::InputClosed);
        assert_eq!(h.spoken().len(), 2);
    }

    #[test]
    fn broken_speech_output_does_not_stop_the_loop() {
        let audio = MockAudio::with_lines(["hey assistant", "what time is it", "exit"]).failing_speech();
        let mut h = harness_with(quiet_config(), audio);
        assert_eq!(h.machine.run(), ShutdownReason::ExitCommand);
    }

    #[test]
    fn voice_index_is_passed_to_speech() {
        let config = Configuration {
            voice_index: Some(1),
            ..quiet_config()
        };
        let mut h = harness_with(config, MockAudio::with_lines(["hey assistant"]));
        h.machine.step();
        let lines = h.spoken.lock().unwrap();
        assert_eq!(lines[0].voice_index, Some(1));
    }

    #[test]
    fn active_commands_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("command_log.txt");
        let config = Configuration {
            log_commands: true,
            command_log_path: log_path.clone(),
            ..Configuration::default()
        };
        let audio = MockAudio::with_lines(["hello there", "hey assistant", "What time is it"]);
        let mut h = harness_with(config, audio);
        for _ in 0..3 {
            h.machine.step();
        }

        let log = std::fs::read_to_string(log_path).unwrap();
        assert_eq!(log, "2024-03-05 14:07:09: what time is it\n");
    }
}
