use std::sync::Arc;

use atomic::{Atomic, Ordering};
use crossbeam_utils::CachePadded;

use crate::{
    clock::CurrentTimeCallback,
    config::SchedulerConfig,
    policy::{GcTrigger, SchedulingPolicy},
};

/// Process wide part of the scheduler. Remembers when the last full GC finished and
/// decides, on behalf of every mutator, whether a new one should be requested.
///
/// `time_of_last_gc_us` is written only by the GC orchestrator (one full GC at a time)
/// and read by mutators. Readers may observe a slightly stale value, which only shifts
/// the cooldown window. Deciding never writes to the timer.
pub struct GlobalGcTimer {
    config: Arc<SchedulerConfig>,
    current_time_callback_us: CurrentTimeCallback,
    time_of_last_gc_us: CachePadded<Atomic<u64>>,
}

impl GlobalGcTimer {
    pub fn new(config: Arc<SchedulerConfig>, current_time_callback_us: CurrentTimeCallback) -> Self {
        let now = current_time_callback_us();
        Self {
            config,
            current_time_callback_us,
            time_of_last_gc_us: CachePadded::new(Atomic::new(now)),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn time_of_last_gc_us(&self) -> u64 {
        self.time_of_last_gc_us.load(Ordering::Acquire)
    }

    /// Time since the last full GC. Zero if the clock reads earlier than the recorded GC.
    pub fn elapsed_since_last_gc_us(&self) -> u64 {
        (self.current_time_callback_us)().saturating_sub(self.time_of_last_gc_us())
    }

    /// Returns the reason a GC should be requested now, if any.
    ///
    /// `_safe_points_counter` does not take part in the decision.
    pub fn trigger(&self, allocated_bytes: usize, _safe_points_counter: usize) -> Option<GcTrigger> {
        if allocated_bytes > self.config.allocation_threshold_bytes() {
            return Some(GcTrigger::Allocation);
        }

        if self.elapsed_since_last_gc_us() >= self.config.cooldown_threshold_us() {
            Some(GcTrigger::Cooldown)
        } else {
            None
        }
    }

    pub fn should_trigger_gc(&self, allocated_bytes: usize, safe_points_counter: usize) -> bool {
        self.trigger(allocated_bytes, safe_points_counter).is_some()
    }

    /// Must be called exactly once after each full collection, whatever its outcome.
    /// Restarts the cooldown window.
    pub fn on_full_gc_completed(&self) {
        let now = (self.current_time_callback_us)();
        let mut old = self.time_of_last_gc_us.load(Ordering::Relaxed);
        // keep the timestamp non-decreasing even if the clock went back.
        while old < now {
            match self.time_of_last_gc_us.compare_exchange_weak(
                old,
                now,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(x) => old = x,
            }
        }
        log::debug!(
            "[gc] Full GC completed, cooldown of {}us restarts at {}us",
            self.config.cooldown_threshold_us(),
            self.time_of_last_gc_us()
        );
    }
}

impl SchedulingPolicy for GlobalGcTimer {
    fn on_safe_point(&self, allocated_bytes: usize, safe_points_counter: usize) -> Option<GcTrigger> {
        let trigger = self.trigger(allocated_bytes, safe_points_counter);
        match trigger {
            Some(GcTrigger::Allocation) => log::debug!(
                "[gc] Requesting GC: {} bytes allocated since last check",
                allocated_bytes
            ),
            Some(GcTrigger::Cooldown) => log::debug!("[gc] Requesting GC: cooldown elapsed"),
            None => (),
        }
        trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn timer(config: SchedulerConfig) -> (GlobalGcTimer, ManualClock) {
        let clock = ManualClock::new(1_000);
        let timer = GlobalGcTimer::new(Arc::new(config), clock.callback());
        (timer, clock)
    }

    #[test]
    fn cooldown_starts_at_construction() {
        let (timer, clock) = timer(SchedulerConfig::new(100, 10_000, 500_000));
        assert_eq!(timer.time_of_last_gc_us(), 1_000);
        assert!(!timer.should_trigger_gc(0, 0));
        clock.advance(499_999);
        assert!(!timer.should_trigger_gc(0, 0));
        clock.advance(1);
        assert!(timer.should_trigger_gc(0, 0));
    }

    #[test]
    fn allocation_threshold_overrides_cooldown() {
        let (timer, _clock) = timer(SchedulerConfig::new(100, 10_000, 500_000));
        assert_eq!(timer.trigger(10_001, 0), Some(GcTrigger::Allocation));
        assert_eq!(timer.trigger(usize::MAX, 0), Some(GcTrigger::Allocation));
        // the threshold itself is not "exceeded".
        assert_eq!(timer.trigger(10_000, 0), None);
    }

    #[test]
    fn safe_points_do_not_gate_the_decision() {
        let (timer, _clock) = timer(SchedulerConfig::new(100, 10_000, 500_000));
        assert!(!timer.should_trigger_gc(0, usize::MAX));
    }

    #[test]
    fn completed_gc_restarts_cooldown() {
        let (timer, clock) = timer(SchedulerConfig::new(100, 10_000, 500_000));
        clock.advance(600_000);
        assert!(timer.should_trigger_gc(500, 0));
        timer.on_full_gc_completed();
        assert_eq!(timer.time_of_last_gc_us(), 601_000);
        assert!(!timer.should_trigger_gc(0, 0));
    }

    #[test]
    fn zero_cooldown_always_fires() {
        let (timer, clock) = timer(SchedulerConfig::aggressive());
        assert_eq!(timer.trigger(0, 0), Some(GcTrigger::Cooldown));
        timer.on_full_gc_completed();
        assert_eq!(timer.trigger(0, 0), Some(GcTrigger::Cooldown));
        clock.set(0);
        assert_eq!(timer.trigger(0, 0), Some(GcTrigger::Cooldown));
    }

    #[test]
    fn clock_going_backwards_is_tolerated() {
        let (timer, clock) = timer(SchedulerConfig::new(100, 10_000, 500_000));
        clock.set(10);
        assert_eq!(timer.elapsed_since_last_gc_us(), 0);
        assert!(!timer.should_trigger_gc(0, 0));

        // the recorded time never decreases.
        timer.on_full_gc_completed();
        assert_eq!(timer.time_of_last_gc_us(), 1_000);

        clock.set(501_000);
        assert!(timer.should_trigger_gc(0, 0));
    }

    #[test]
    fn policy_reports_trigger_reasons() {
        let (timer, clock) = timer(SchedulerConfig::new(100, 10_000, 500_000));
        assert_eq!(timer.on_safe_point(12_000, 0), Some(GcTrigger::Allocation));
        assert_eq!(timer.on_safe_point(500, 0), None);
        clock.advance(600_000);
        assert_eq!(timer.on_safe_point(500, 0), Some(GcTrigger::Cooldown));
        assert_eq!(timer.time_of_last_gc_us(), 1_000);
    }
}
