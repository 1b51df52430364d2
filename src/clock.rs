//! Time sources for the scheduler. All time is measured in microseconds.
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, OnceLock,
};
use std::time::Instant;

/// Returns current time in microseconds. The scheduler only ever needs differences
/// between two readings, so the epoch is arbitrary.
pub type CurrentTimeCallback = Box<dyn Fn() -> u64 + Send + Sync>;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Monotonic microseconds since the first call in this process.
pub fn monotonic_micros() -> u64 {
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_micros() as u64
}

pub fn monotonic_clock() -> CurrentTimeCallback {
    Box::new(monotonic_micros)
}

/// Clock that only moves when told to. Clones share the same time.
///
/// Moving it backwards is allowed; the scheduler treats that as zero elapsed time.
#[derive(Clone, Default, Debug)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_us: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_us)),
        }
    }

    pub fn now(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }

    pub fn set(&self, time_us: u64) {
        self.now.store(time_us, Ordering::Release);
    }

    pub fn advance(&self, delta_us: u64) {
        self.now.fetch_add(delta_us, Ordering::AcqRel);
    }

    /// Callback reading this clock, suitable for [GlobalGcTimer::new](crate::timer::GlobalGcTimer::new).
    pub fn callback(&self) -> CurrentTimeCallback {
        let now = self.now.clone();
        Box::new(move || now.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_never_goes_back() {
        let a = monotonic_micros();
        let b = monotonic_micros();
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(10);
        let callback = clock.clone().callback();
        assert_eq!(callback(), 10);
        clock.advance(5);
        assert_eq!(callback(), 15);
        clock.set(3);
        assert_eq!(callback(), 3);
        assert_eq!(clock.now(), 3);
    }
}
