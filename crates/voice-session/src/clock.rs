#[cfg(any(test, feature = "mock"))]
use std::cell::Cell;
#[cfg(any(test, feature = "mock"))]
use std::rc::Rc;
#[cfg(any(test, feature = "mock"))]
use std::time::Duration;
use std::time::Instant;
use time::OffsetDateTime;

/// Source of both monotonic time (timeouts) and wall time (spoken answers).
pub trait Clock {
    fn now(&self) -> Instant;
    fn wall_time(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_time(&self) -> OffsetDateTime {
        // The local offset is unavailable on some platforms once threads exist
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    wall_start: OffsetDateTime,
    elapsed: Rc<Cell<Duration>>,
}

#[cfg(any(test, feature = "mock"))]
impl ManualClock {
    pub fn new(wall_start: OffsetDateTime) -> Self {
        Self {
            start: Instant::now(),
            wall_start,
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

#[cfg(any(test, feature = "mock"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }

    fn wall_time(&self) -> OffsetDateTime {
        self.wall_start + self.elapsed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_both_times_for_all_clones() {
        let clock = ManualClock::new(OffsetDateTime::UNIX_EPOCH);
        let handle = clock.clone();
        let t0 = clock.now();

        handle.advance(Duration::from_secs(90));

        assert_eq!(clock.now() - t0, Duration::from_secs(90));
        assert_eq!(
            clock.wall_time(),
            OffsetDateTime::UNIX_EPOCH + Duration::from_secs(90)
        );
    }
}
