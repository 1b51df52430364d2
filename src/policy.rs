/// Which condition made a policy request a collection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GcTrigger {
    /// A single thread allocated more than `allocation_threshold_bytes` since its last check.
    Allocation,
    /// The cooldown since the last full GC has elapsed.
    Cooldown,
}

/// Decision logic a [ThreadData](crate::thread_data::ThreadData) consults from its slow path.
///
/// Implementations are shared by every mutator thread of a scheduler and must only read
/// shared state.
pub trait SchedulingPolicy: Send + Sync {
    /// Called with the amount allocated and safepoint weight accumulated by one thread
    /// since its previous check. Returns the reason a full GC should be requested now,
    /// or `None` to ask again later.
    fn on_safe_point(&self, allocated_bytes: usize, safe_points_counter: usize) -> Option<GcTrigger>;
}

impl<F> SchedulingPolicy for F
where
    F: Fn(usize, usize) -> Option<GcTrigger> + Send + Sync,
{
    fn on_safe_point(&self, allocated_bytes: usize, safe_points_counter: usize) -> Option<GcTrigger> {
        self(allocated_bytes, safe_points_counter)
    }
}
