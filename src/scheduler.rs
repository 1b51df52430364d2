use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::{
    clock::{monotonic_clock, CurrentTimeCallback},
    collection_barrier::CollectionBarrier,
    config::SchedulerConfig,
    statistics::{SchedulerCounters, SchedulerStatistics},
    thread_data::ThreadData,
    timer::GlobalGcTimer,
};

/// Decides when mutators should request a full GC.
///
/// One scheduler exists per runtime. It owns the config and the [GlobalGcTimer] shared by
/// every [ThreadData] it hands out. The scheduler never runs a collection itself, it only
/// gives out verdicts and learns about finished collections through
/// [GcScheduler::on_full_gc_completed].
///
/// [GcScheduler::collection_barrier] is an optional handoff between mutators and the GC
/// orchestrator. The scheduler never touches it: mutators request GCs on it, and the
/// orchestrator clears the request itself once the collection is done.
pub struct GcScheduler {
    config: Arc<SchedulerConfig>,
    gc_timer: Arc<GlobalGcTimer>,
    counters: Arc<SchedulerCounters>,
    collection_barrier: CollectionBarrier,
    registered_threads: AtomicUsize,
}

impl GcScheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self::with_clock(config, monotonic_clock())
    }

    /// Creates a scheduler reading time from `current_time_callback_us`.
    pub fn with_clock(config: SchedulerConfig, current_time_callback_us: CurrentTimeCallback) -> Self {
        let config = Arc::new(config);
        let gc_timer = Arc::new(GlobalGcTimer::new(config.clone(), current_time_callback_us));
        log::debug!(
            "[gc] Scheduler created: threshold {} safepoints, {} bytes, cooldown {}us",
            config.threshold(),
            config.allocation_threshold_bytes(),
            config.cooldown_threshold_us()
        );
        Self {
            config,
            gc_timer,
            counters: Arc::new(SchedulerCounters::default()),
            collection_barrier: CollectionBarrier::new(),
            registered_threads: AtomicUsize::new(0),
        }
    }

    /// Creates scheduling state for the calling mutator thread. Must be called from the
    /// thread that is going to use it, before it allocates or hits safepoints.
    pub fn register_thread(&self) -> ThreadData {
        let count = self.registered_threads.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!(
            "[gc] Registered mutator thread {:?} ({} total)",
            std::thread::current().id(),
            count
        );
        ThreadData::registered(
            self.config.clone(),
            self.gc_timer.clone(),
            self.counters.clone(),
        )
    }

    /// Called by the GC orchestrator exactly once after every full collection. Restarts
    /// the cooldown window. A pending request on [GcScheduler::collection_barrier] is left
    /// for the orchestrator to clear.
    pub fn on_full_gc_completed(&self) {
        self.gc_timer.on_full_gc_completed();
        self.counters.record_full_gc();
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn gc_timer(&self) -> &GlobalGcTimer {
        &self.gc_timer
    }

    pub fn collection_barrier(&self) -> &CollectionBarrier {
        &self.collection_barrier
    }

    /// Number of mutators registered over the scheduler lifetime.
    pub fn registered_threads(&self) -> usize {
        self.registered_threads.load(Ordering::Relaxed)
    }

    /// Slow path counts include only threads that flushed their statistics or exited.
    pub fn statistics(&self) -> SchedulerStatistics {
        SchedulerStatistics {
            threads: self.counters.threads(),
            full_gcs_completed: self.counters.full_gcs_completed(),
            allocation_threshold_bytes: self.config.allocation_threshold_bytes(),
            cooldown_threshold_us: self.config.cooldown_threshold_us(),
            registered_threads: self.registered_threads(),
        }
    }
}

impl Default for GcScheduler {
    fn default() -> Self {
        Self::new()
    }
}
