use assistant_config::normalize_wake_word;
use command_router::FollowUp;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the wake word only
    Dormant,
    /// Accepting commands
    Active,
    /// Idle for too long; immediately followed by `Dormant`
    TimedOut,
}

/// Per-process conversation state.
///
/// Invariant: while `Active`, `now - last_activity <= timeout`. The state
/// machine restores it by calling [`Session::is_idle_expired`] before and
/// after every listen.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    last_activity: Instant,
    wake_word: String,
    timeout_seconds: u64,
    consecutive_failures: u32,
    pending: Option<FollowUp>,
}

impl Session {
    pub fn new(wake_word: &str, timeout_seconds: u64, now: Instant) -> Self {
        Self {
            state: SessionState::Dormant,
            last_activity: now,
            wake_word: normalize_wake_word(wake_word),
            timeout_seconds,
            consecutive_failures: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn wake_word(&self) -> &str {
        &self.wake_word
    }

    pub fn set_wake_word(&mut self, wake_word: &str) {
        self.wake_word = normalize_wake_word(wake_word);
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn pending(&self) -> Option<FollowUp> {
        self.pending
    }

    /// `text` must already be normalized (lowercase).
    pub fn heard_wake_word(&self, text: &str) -> bool {
        !self.wake_word.is_empty() && text.contains(&self.wake_word)
    }

    pub fn activate(&mut self, now: Instant) {
        self.state = SessionState::Active;
        self.last_activity = now;
        self.pending = None;
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// How long the session may stay idle before timing out.
    pub fn remaining(&self, now: Instant) -> Duration {
        Duration::from_secs(self.timeout_seconds)
            .saturating_sub(now.saturating_duration_since(self.last_activity))
    }

    pub fn is_idle_expired(&self, now: Instant) -> bool {
        self.state == SessionState::Active
            && now.saturating_duration_since(self.last_activity)
                > Duration::from_secs(self.timeout_seconds)
    }

    pub fn time_out(&mut self) {
        self.state = SessionState::TimedOut;
    }

    pub fn go_dormant(&mut self) {
        self.state = SessionState::Dormant;
        self.pending = None;
        self.consecutive_failures = 0;
    }

    pub fn set_pending(&mut self, follow_up: FollowUp) {
        self.pending = Some(follow_up);
    }

    pub fn take_pending(&mut self) -> Option<FollowUp> {
        self.pending.take()
    }

    /// Count one failed listen and return the length of the current streak.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.consecutive_failures
    }

    pub fn reset_failures(&mut self) {
        self.consecutive_failures = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dormant_with_lowercase_wake_word() {
        let session = Session::new(" Hey Assistant ", 60, Instant::now());
        assert_eq!(session.state(), SessionState::Dormant);
        assert!(session.heard_wake_word("well hey assistant there"));
        assert!(!session.heard_wake_word("hey there"));
    }

    #[test]
    fn expires_only_when_active_and_strictly_past_timeout() {
        let t0 = Instant::now();
        let mut session = Session::new("hey assistant", 10, t0);
        assert!(!session.is_idle_expired(t0 + Duration::from_secs(60)));

        session.activate(t0);
        assert!(!session.is_idle_expired(t0 + Duration::from_secs(10)));
        assert!(session.is_idle_expired(t0 + Duration::from_secs(11)));
        assert_eq!(session.remaining(t0 + Duration::from_secs(4)), Duration::from_secs(6));
        assert_eq!(session.remaining(t0 + Duration::from_secs(40)), Duration::ZERO);
    }

    #[test]
    fn going_dormant_clears_follow_up_and_failures() {
        let mut session = Session::new("hey assistant", 10, Instant::now());
        session.activate(Instant::now());
        session.set_pending(FollowUp::SearchQuery);
        assert_eq!(session.record_failure(), 1);
        assert_eq!(session.record_failure(), 2);

        session.go_dormant();
        assert_eq!(session.pending(), None);
        assert_eq!(session.record_failure(), 1);
    }
}
