use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

/// Hands GC requests from mutators over to the GC orchestrator.
///
/// Mutators that got a positive verdict call [CollectionBarrier::request_gc]; the
/// orchestrator sleeps in [CollectionBarrier::wait_for_request] until one arrives. The
/// request stays pending until it is cleared, so concurrent requests
/// collapse into a single GC. The orchestrator clears it with
/// [CollectionBarrier::clear_request] once the collection is done.
pub struct CollectionBarrier {
    mutex: Mutex<()>,
    cv_wakeup: Condvar,
    collection_requested: AtomicBool,
    shutdown_requested: AtomicBool,
}

impl CollectionBarrier {
    pub fn new() -> Self {
        Self {
            mutex: Mutex::new(()),
            cv_wakeup: Condvar::new(),
            collection_requested: AtomicBool::new(false),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    pub fn was_gc_requested(&self) -> bool {
        self.collection_requested.load(Ordering::Relaxed)
    }

    /// Returns `true` if this call made the request, `false` if one was already pending.
    pub fn request_gc(&self) -> bool {
        if self.was_gc_requested() {
            return false;
        }
        let guard = self.mutex.lock();
        let was_already_requested = self.collection_requested.swap(true, Ordering::AcqRel);
        if !was_already_requested {
            self.cv_wakeup.notify_all();
        }
        drop(guard);
        !was_already_requested
    }

    /// Blocks until a GC is requested. Returns `false` if shutdown was requested instead.
    pub fn wait_for_request(&self) -> bool {
        let mut guard = self.mutex.lock();
        while !self.collection_requested.load(Ordering::Acquire)
            && !self.shutdown_requested.load(Ordering::Acquire)
        {
            self.cv_wakeup.wait(&mut guard);
        }
        !self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Drops the pending request so the next positive verdict can make a new one.
    pub fn clear_request(&self) {
        let guard = self.mutex.lock();
        self.collection_requested.store(false, Ordering::Release);
        drop(guard);
    }

    pub fn notify_shutdown_requested(&self) {
        let guard = self.mutex.lock();
        self.shutdown_requested.store(true, Ordering::Release);
        self.cv_wakeup.notify_all();
        drop(guard);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Relaxed)
    }
}

impl Default for CollectionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_collapse_until_cleared() {
        let barrier = CollectionBarrier::new();
        assert!(!barrier.was_gc_requested());
        assert!(barrier.request_gc());
        assert!(!barrier.request_gc());
        assert!(barrier.was_gc_requested());
        barrier.clear_request();
        assert!(barrier.request_gc());
    }

    #[test]
    fn waiter_wakes_on_request() {
        let barrier = CollectionBarrier::new();
        crossbeam_utils::thread::scope(|s| {
            let waiter = s.spawn(|_| barrier.wait_for_request());
            barrier.request_gc();
            assert!(waiter.join().unwrap());
        })
        .unwrap();
    }

    #[test]
    fn waiter_wakes_on_shutdown() {
        let barrier = CollectionBarrier::new();
        crossbeam_utils::thread::scope(|s| {
            let waiter = s.spawn(|_| barrier.wait_for_request());
            barrier.notify_shutdown_requested();
            assert!(!waiter.join().unwrap());
        })
        .unwrap();
        assert!(barrier.is_shutdown_requested());
    }
}
