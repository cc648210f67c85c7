use std::time::Duration;

use crate::config::ConfigError;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Ticks that fell due during one [`GameClock::advance`] call.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DueTicks {
    /// Grid steps at the main tick cadence.
    pub main: u32,
    /// Whole seconds, driving the bonus timer and the elapsed counter.
    pub seconds: u32,
}

/// One wall clock sampled at two periods: the main tick and one second.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameClock {
    tick_interval: Duration,
    main_accumulator: Duration,
    second_accumulator: Duration,
    elapsed_secs: u64,
}

impl GameClock {
    /// Creates a clock stepping every `tick_interval`, which must be non-zero.
    pub fn new(tick_interval: Duration) -> Result<Self, ConfigError> {
        if tick_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "tick interval must be positive".into(),
            ));
        }

        Ok(Self {
            tick_interval,
            main_accumulator: Duration::ZERO,
            second_accumulator: Duration::ZERO,
            elapsed_secs: 0,
        })
    }

    /// Feeds `dt` of wall time and returns how many ticks of each kind are due.
    pub fn advance(&mut self, dt: Duration) -> DueTicks {
        self.main_accumulator += dt;
        self.second_accumulator += dt;

        let mut due = DueTicks::default();
        while self.main_accumulator >= self.tick_interval {
            self.main_accumulator -= self.tick_interval;
            due.main += 1;
        }
        while self.second_accumulator >= ONE_SECOND {
            self.second_accumulator -= ONE_SECOND;
            due.seconds += 1;
        }

        due
    }

    /// Counts one elapsed second.
    pub fn record_second(&mut self) {
        self.elapsed_secs += 1;
    }

    /// Drops any partial interval and zeroes the elapsed seconds.
    pub fn restart(&mut self) {
        self.main_accumulator = Duration::ZERO;
        self.second_accumulator = Duration::ZERO;
        self.elapsed_secs = 0;
    }

    /// Whole seconds since the last restart.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }
}

/// Formats seconds as `minutes:seconds`, zero-padding seconds below 10.
#[must_use]
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
