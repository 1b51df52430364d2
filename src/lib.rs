//! # GC scheduler
//!
//! Decides *when* a runtime should request a full garbage collection. How the collection
//! runs is up to the collector; this crate only gives mutator threads a verdict.
//!
//! # Overview
//! - [ThreadData](thread_data::ThreadData): per mutator counters of bytes allocated and
//!   safepoints visited. Its fast paths compare against thresholds cached locally and are
//!   meant to be inlined at every allocation and safepoint.
//! - [GlobalGcTimer](timer::GlobalGcTimer): shared decision logic. A GC is requested when a
//!   single thread allocated more than the allocation threshold, or when the cooldown since
//!   the last full GC has elapsed.
//! - [GcScheduler](scheduler::GcScheduler): owns the config and the timer and registers
//!   mutator threads.
//! - [CollectionBarrier](collection_barrier::CollectionBarrier): optional handoff of
//!   requests to the GC orchestrator, which clears it after collecting.
//!
//! ```
//! use gc_scheduler::{GcScheduler, SchedulerConfig};
//!
//! let scheduler = GcScheduler::with_config(SchedulerConfig::new(1000, 10_000, 500_000));
//! let mut thread = scheduler.register_thread();
//! if thread.on_safe_point_allocation(12_000) {
//!     scheduler.collection_barrier().request_gc();
//! }
//! assert!(scheduler.collection_barrier().was_gc_requested());
//! // ... collect ...
//! scheduler.on_full_gc_completed();
//! scheduler.collection_barrier().clear_request();
//! ```
//!
//! Building with the `gc-aggressive` feature makes [SchedulerConfig::default] use much
//! lower thresholds and no cooldown, for stress testing.
pub mod clock;
pub mod collection_barrier;
pub mod config;
pub mod policy;
pub mod scheduler;
pub mod statistics;
pub mod thread_data;
pub mod timer;

pub use clock::{CurrentTimeCallback, ManualClock};
pub use config::SchedulerConfig;
pub use policy::{GcTrigger, SchedulingPolicy};
pub use scheduler::GcScheduler;
pub use statistics::{SchedulerStatistics, ThreadStatistics};
pub use thread_data::ThreadData;
pub use timer::GlobalGcTimer;
