use std::{marker::PhantomData, sync::Arc};

use crate::{
    config::SchedulerConfig,
    policy::SchedulingPolicy,
    statistics::{SchedulerCounters, ThreadStatistics},
};

/// Per mutator scheduling state.
///
/// Counts bytes allocated and safepoint weight since the last check against thresholds
/// cached from the config, so the fast paths never touch shared memory. Once a cached
/// threshold is crossed the thread consults the shared [SchedulingPolicy], which only
/// reads shared state. Slow path statistics stay in this struct until
/// [ThreadData::flush_statistics] or drop hands them to the scheduler.
///
/// Owned by exactly one thread and never moved to another one.
pub struct ThreadData {
    config: Arc<SchedulerConfig>,
    on_safe_point: Arc<dyn SchedulingPolicy>,
    allocated_bytes: usize,
    allocated_bytes_threshold: usize,
    safe_points_counter: usize,
    safe_points_counter_threshold: usize,
    statistics: ThreadStatistics,
    counters: Option<Arc<SchedulerCounters>>,
    _not_send: PhantomData<*mut ()>,
}

impl ThreadData {
    pub fn new(config: Arc<SchedulerConfig>, on_safe_point: Arc<dyn SchedulingPolicy>) -> Self {
        let mut this = Self {
            config,
            on_safe_point,
            allocated_bytes: 0,
            allocated_bytes_threshold: 0,
            safe_points_counter: 0,
            safe_points_counter_threshold: 0,
            statistics: ThreadStatistics::default(),
            counters: None,
            _not_send: PhantomData,
        };
        this.clear_counters_and_update_thresholds();
        this
    }

    pub(crate) fn registered(
        config: Arc<SchedulerConfig>,
        on_safe_point: Arc<dyn SchedulingPolicy>,
        counters: Arc<SchedulerCounters>,
    ) -> Self {
        let mut this = Self::new(config, on_safe_point);
        this.counters = Some(counters);
        this
    }

    /// Safepoint in regular code (function prologue, loop back edge). `weight` is how
    /// much this safepoint counts towards the threshold.
    ///
    /// Returns `true` if a full GC should be requested.
    #[inline(always)]
    pub fn on_safe_point_regular(&mut self, weight: usize) -> bool {
        self.safe_points_counter = self.safe_points_counter.saturating_add(weight);
        if self.safe_points_counter < self.safe_points_counter_threshold {
            return false;
        }
        self.on_safe_point_slow_path()
    }

    /// Safepoint after allocating `size` bytes.
    ///
    /// Returns `true` if a full GC should be requested.
    #[inline(always)]
    pub fn on_safe_point_allocation(&mut self, size: usize) -> bool {
        self.allocated_bytes = self.allocated_bytes.saturating_add(size);
        if self.allocated_bytes < self.allocated_bytes_threshold {
            return false;
        }
        self.on_safe_point_slow_path()
    }

    /// Asks the shared policy with the counters accumulated so far, then resets the
    /// counters and refreshes cached thresholds whatever the verdict was.
    #[inline(never)]
    #[cold]
    pub fn on_safe_point_slow_path(&mut self) -> bool {
        let trigger = self
            .on_safe_point
            .on_safe_point(self.allocated_bytes, self.safe_points_counter);
        log::trace!(
            "[gc] Slow path check: allocated {} bytes, {} safepoints, trigger: {:?}",
            self.allocated_bytes,
            self.safe_points_counter,
            trigger
        );
        self.statistics.record(trigger);
        self.clear_counters_and_update_thresholds();
        trigger.is_some()
    }

    fn clear_counters_and_update_thresholds(&mut self) {
        self.allocated_bytes = 0;
        self.safe_points_counter = 0;

        self.allocated_bytes_threshold = self.config.allocation_threshold_bytes();
        self.safe_points_counter_threshold = self.config.threshold();
    }

    /// Adds the statistics gathered since the previous flush to the scheduler totals.
    /// Does nothing for thread data not created by a scheduler.
    pub fn flush_statistics(&mut self) {
        if let Some(counters) = &self.counters {
            counters.merge(&self.statistics);
            self.statistics = ThreadStatistics::default();
        }
    }

    /// Statistics gathered since the previous flush.
    pub fn statistics(&self) -> ThreadStatistics {
        self.statistics
    }

    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes
    }

    pub fn safe_points_counter(&self) -> usize {
        self.safe_points_counter
    }

    pub fn allocated_bytes_threshold(&self) -> usize {
        self.allocated_bytes_threshold
    }

    pub fn safe_points_counter_threshold(&self) -> usize {
        self.safe_points_counter_threshold
    }
}

impl Drop for ThreadData {
    fn drop(&mut self) {
        self.flush_statistics();
    }
}
