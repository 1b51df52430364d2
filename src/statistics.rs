use std::sync::atomic::{AtomicUsize, Ordering};

use crate::policy::GcTrigger;

/// Slow path bookkeeping of one mutator. Plain integers, owned by that mutator's
/// [ThreadData](crate::thread_data::ThreadData) and merged into the scheduler only when
/// flushed.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ThreadStatistics {
    pub slow_path_checks: usize,
    /// GC requests caused by this thread exceeding the allocation threshold.
    pub allocation_triggers: usize,
    /// GC requests caused by the cooldown window running out.
    pub cooldown_triggers: usize,
}

impl ThreadStatistics {
    pub(crate) fn record(&mut self, trigger: Option<GcTrigger>) {
        self.slow_path_checks += 1;
        match trigger {
            Some(GcTrigger::Allocation) => self.allocation_triggers += 1,
            Some(GcTrigger::Cooldown) => self.cooldown_triggers += 1,
            None => (),
        }
    }

    pub fn gc_requests(&self) -> usize {
        self.allocation_triggers + self.cooldown_triggers
    }
}

/// Totals owned by the scheduler. Written when a thread flushes its statistics and
/// when a full GC completes, never from the slow path.
#[derive(Default, Debug)]
pub(crate) struct SchedulerCounters {
    slow_path_checks: AtomicUsize,
    allocation_triggers: AtomicUsize,
    cooldown_triggers: AtomicUsize,
    full_gcs_completed: AtomicUsize,
}

impl SchedulerCounters {
    pub(crate) fn merge(&self, thread: &ThreadStatistics) {
        self.slow_path_checks
            .fetch_add(thread.slow_path_checks, Ordering::Relaxed);
        self.allocation_triggers
            .fetch_add(thread.allocation_triggers, Ordering::Relaxed);
        self.cooldown_triggers
            .fetch_add(thread.cooldown_triggers, Ordering::Relaxed);
    }

    pub(crate) fn record_full_gc(&self) {
        self.full_gcs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn threads(&self) -> ThreadStatistics {
        ThreadStatistics {
            slow_path_checks: self.slow_path_checks.load(Ordering::Relaxed),
            allocation_triggers: self.allocation_triggers.load(Ordering::Relaxed),
            cooldown_triggers: self.cooldown_triggers.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn full_gcs_completed(&self) -> usize {
        self.full_gcs_completed.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SchedulerStatistics {
    /// Sum over all flushed threads.
    pub threads: ThreadStatistics,
    pub full_gcs_completed: usize,
    pub allocation_threshold_bytes: usize,
    pub cooldown_threshold_us: u64,
    pub registered_threads: usize,
}

impl SchedulerStatistics {
    pub fn gc_requests(&self) -> usize {
        self.threads.gc_requests()
    }
}

impl std::fmt::Display for SchedulerStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "GC scheduler statistics:")?;
        writeln!(f, "  Registered threads: {}", self.registered_threads)?;
        writeln!(
            f,
            "  Allocation threshold: {} bytes",
            self.allocation_threshold_bytes
        )?;
        writeln!(
            f,
            "  Cooldown: {:.1}ms",
            self.cooldown_threshold_us as f64 / 1000.0
        )?;
        writeln!(f, "  Slow path checks: {}", self.threads.slow_path_checks)?;
        writeln!(
            f,
            "  GC requests: {} (allocation: {}, cooldown: {})",
            self.gc_requests(),
            self.threads.allocation_triggers,
            self.threads.cooldown_triggers
        )?;
        writeln!(f, "  Full GCs completed: {}", self.full_gcs_completed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_statistics_count_reasons() {
        let mut stats = ThreadStatistics::default();
        stats.record(None);
        stats.record(Some(GcTrigger::Allocation));
        stats.record(Some(GcTrigger::Cooldown));
        stats.record(Some(GcTrigger::Cooldown));
        assert_eq!(stats.slow_path_checks, 4);
        assert_eq!(stats.allocation_triggers, 1);
        assert_eq!(stats.cooldown_triggers, 2);
        assert_eq!(stats.gc_requests(), 3);
    }

    #[test]
    fn merged_threads_add_up() {
        let counters = SchedulerCounters::default();
        let mut first = ThreadStatistics::default();
        first.record(Some(GcTrigger::Allocation));
        let mut second = ThreadStatistics::default();
        second.record(None);
        second.record(Some(GcTrigger::Cooldown));
        counters.merge(&first);
        counters.merge(&second);
        counters.record_full_gc();

        let totals = counters.threads();
        assert_eq!(totals.slow_path_checks, 3);
        assert_eq!(totals.gc_requests(), 2);
        assert_eq!(counters.full_gcs_completed(), 1);
    }

    #[test]
    fn report_is_readable() {
        let stats = SchedulerStatistics {
            threads: ThreadStatistics {
                slow_path_checks: 2,
                allocation_triggers: 1,
                cooldown_triggers: 1,
            },
            full_gcs_completed: 1,
            allocation_threshold_bytes: 10_000,
            cooldown_threshold_us: 500_000,
            registered_threads: 3,
        };
        let text = stats.to_string();
        assert!(text.contains("Allocation threshold: 10000 bytes"));
        assert!(text.contains("Cooldown: 500.0ms"));
        assert!(text.contains("Slow path checks: 2"));
        assert!(text.contains("GC requests: 2 (allocation: 1, cooldown: 1)"));
    }
}
