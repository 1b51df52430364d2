/// Returns `true` if this build was compiled with the `gc-aggressive` feature.
pub const fn is_aggressive_mode() -> bool {
    cfg!(feature = "gc-aggressive")
}

/// Tunable parameters of the GC scheduler.
///
/// Values are fixed at construction. The scheduler shares one instance between
/// all mutator threads and never hands out mutable access to it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SchedulerConfig {
    threshold: usize,
    allocation_threshold_bytes: usize,
    cooldown_threshold_us: u64,
}

impl SchedulerConfig {
    /// Roughly 1 safepoint per 10ms.
    pub const DEFAULT_THRESHOLD: usize = 100_000;
    pub const DEFAULT_ALLOCATION_THRESHOLD_BYTES: usize = 10 * 1024 * 1024;
    pub const DEFAULT_COOLDOWN_THRESHOLD_US: u64 = 200 * 1000;

    pub const AGGRESSIVE_THRESHOLD: usize = 1000;
    pub const AGGRESSIVE_ALLOCATION_THRESHOLD_BYTES: usize = 10_000;
    pub const AGGRESSIVE_COOLDOWN_THRESHOLD_US: u64 = 0;

    pub const fn new(
        threshold: usize,
        allocation_threshold_bytes: usize,
        cooldown_threshold_us: u64,
    ) -> Self {
        Self {
            threshold,
            allocation_threshold_bytes,
            cooldown_threshold_us,
        }
    }

    /// Regular defaults used by release runtimes.
    pub const fn regular() -> Self {
        Self::new(
            Self::DEFAULT_THRESHOLD,
            Self::DEFAULT_ALLOCATION_THRESHOLD_BYTES,
            Self::DEFAULT_COOLDOWN_THRESHOLD_US,
        )
    }

    /// Much lower thresholds and no cooldown, so that collections happen as often as possible.
    pub const fn aggressive() -> Self {
        Self::new(
            Self::AGGRESSIVE_THRESHOLD,
            Self::AGGRESSIVE_ALLOCATION_THRESHOLD_BYTES,
            Self::AGGRESSIVE_COOLDOWN_THRESHOLD_US,
        )
    }

    pub const fn for_mode(aggressive: bool) -> Self {
        if aggressive {
            Self::aggressive()
        } else {
            Self::regular()
        }
    }

    /// Safepoint weight a thread accumulates before it consults the scheduler.
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Bytes a single thread may allocate between checks before a GC is forced
    /// regardless of the cooldown.
    pub const fn allocation_threshold_bytes(&self) -> usize {
        self.allocation_threshold_bytes
    }

    /// Minimum time between the end of the last full GC and a time based request.
    pub const fn cooldown_threshold_us(&self) -> u64 {
        self.cooldown_threshold_us
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::for_mode(is_aggressive_mode())
    }
}
