use std::time::Duration;

/// Fixed-period tick source with an exact deadline.
///
/// Deadlines are kept as `Duration` so that any number of frames summing to
/// the same elapsed time yields the same tick count.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedClock {
    period: Duration,
    next_due: Duration,
    ticks: u64,
}

impl FixedClock {
    /// First deadline falls one period after `phase`.
    pub fn new(period: Duration, phase: Duration) -> Self {
        Self {
            period,
            next_due: phase + period,
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_due(&self, now: Duration) -> bool {
        self.next_due <= now
    }

    /// Consume the current deadline.
    pub fn fire(&mut self) {
        self.next_due += self.period;
        self.ticks += 1;
    }
}
