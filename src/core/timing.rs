//! Call timing
//!
//! [`TimingCollector::time`] wraps any closure, records how long it took,
//! and hands the closure's result back unchanged. The dispatcher runs every
//! handler through it and reports the aggregate via the Statistics command.

use crate::types::TimingStats;
use std::time::{Duration, Instant};

/// Running totals over every timed call
#[derive(Debug, Clone, Default)]
pub struct TimingCollector {
    count: usize,
    total: Duration,
    min: Duration,
    max: Duration,
}

impl TimingCollector {
    pub fn new() -> Self {
        TimingCollector::default()
    }

    /// Run `f`, record its elapsed time and return its result
    pub fn time<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    /// Record an externally measured duration
    pub fn record(&mut self, elapsed: Duration) {
        if self.count == 0 {
            self.min = elapsed;
            self.max = elapsed;
        } else {
            self.min = self.min.min(elapsed);
            self.max = self.max.max(elapsed);
        }
        self.count = self.count.saturating_add(1);
        self.total = self.total.saturating_add(elapsed);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Count, mean, min and max over all recorded calls
    ///
    /// With nothing recorded every duration is zero.
    pub fn stats(&self) -> TimingStats {
        if self.count == 0 {
            return TimingStats::default();
        }

        // u32 division; counts beyond u32::MAX are clamped
        let divisor = u32::try_from(self.count).unwrap_or(u32::MAX);

        TimingStats {
            count: self.count,
            mean: self.total / divisor,
            min: self.min,
            max: self.max,
        }
    }
}
