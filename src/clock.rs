//! Clock and randomness ports, so game rules can be driven deterministically in tests.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait RandomSource: Send + Sync {
    /// Uniform value in `[0, 100)`.
    fn percent(&self) -> f64;

    /// Uniform integer in `min..=max`.
    fn range(&self, min: u64, max: u64) -> u64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&self, len: usize) -> usize;
}

/// System clock - uses real time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Thread-local RNG backed randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn percent(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen_range(0.0..100.0)
    }

    fn range(&self, min: u64, max: u64) -> u64 {
        use rand::Rng;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn index(&self, len: usize) -> usize {
        use rand::Rng;
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Replays scripted values for testing. When a queue runs dry the lowest
/// possible value is returned, which keeps unscripted rolls out of the way.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedRandom {
    percents: std::sync::Mutex<std::collections::VecDeque<f64>>,
    ranges: std::sync::Mutex<std::collections::VecDeque<u64>>,
    indices: std::sync::Mutex<std::collections::VecDeque<usize>>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_percents(self, values: &[f64]) -> Self {
        self.percents.lock().unwrap().extend(values.iter().copied());
        self
    }

    pub fn with_ranges(self, values: &[u64]) -> Self {
        self.ranges.lock().unwrap().extend(values.iter().copied());
        self
    }

    pub fn with_indices(self, values: &[usize]) -> Self {
        self.indices.lock().unwrap().extend(values.iter().copied());
        self
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn percent(&self) -> f64 {
        // 99.9 never lands in a random-event band and never crits.
        self.percents.lock().unwrap().pop_front().unwrap_or(99.9)
    }

    fn range(&self, min: u64, max: u64) -> u64 {
        self.ranges
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(min)
            .clamp(min, max.max(min))
    }

    fn index(&self, len: usize) -> usize {
        self.indices
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(0)
            .min(len.saturating_sub(1))
    }
}
