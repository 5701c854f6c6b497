//! Test utilities for the backend crate.
//!
//! Shared helpers for unit tests (in `src/`) and integration tests (in
//! `tests/`). Only compiled for tests or with the `test-support` feature.

pub mod clock {
    //! Deterministic clocks for credential expiry tests.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock frozen at a chosen instant until explicitly advanced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{TimeDelta, TimeZone, Utc};
    /// use mockable::Clock;
    /// use preguntame::test_support::clock::MutableClock;
    ///
    /// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let clock = MutableClock::new(start);
    /// clock.advance(TimeDelta::hours(1));
    /// assert_eq!(clock.utc(), start + TimeDelta::hours(1));
    /// ```
    #[derive(Debug)]
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance(&self, delta: TimeDelta) {
            *self.lock_clock() += delta;
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.lock_clock() = now;
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}
