use crate::ports::outbound::{RandomSource, TimeSource};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time source frozen at a given instant, advanced explicitly by tests.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: Mutex<DateTime<Utc>>,
}

impl FixedTimeSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Production random source seeded from OS entropy.
pub struct OsRandomSource {
    rng: Mutex<StdRng>,
}

impl OsRandomSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic stream for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for OsRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for OsRandomSource {
    fn next_u63(&self) -> u64 {
        self.rng.lock().gen::<u64>() >> 1
    }
}

/// Replays queued values, then counts upwards.
///
/// Queued values let tests force key collisions; the counter keeps keys
/// distinct and ordered afterwards.
#[derive(Debug)]
pub struct SequenceRandomSource {
    queued: Mutex<VecDeque<u64>>,
    next: Mutex<u64>,
}

impl SequenceRandomSource {
    pub fn counting_from(start: u64) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            next: Mutex::new(start),
        }
    }

    pub fn with_values(values: impl IntoIterator<Item = u64>, then_from: u64) -> Self {
        Self {
            queued: Mutex::new(values.into_iter().collect()),
            next: Mutex::new(then_from),
        }
    }
}

impl RandomSource for SequenceRandomSource {
    fn next_u63(&self) -> u64 {
        if let Some(value) = self.queued.lock().pop_front() {
            return value;
        }
        let mut next = self.next.lock();
        let value = *next;
        *next += 1;
        value
    }
}
