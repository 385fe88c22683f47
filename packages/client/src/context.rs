//! Process-scoped dispatch bookkeeping.

use std::sync::atomic::{AtomicU64, Ordering};

/// Arena of atomic counters shared by every builder created from one
/// [`Client`](crate::client::Client).
///
/// `next_request_id` only ever increments; `in_flight` increments on
/// dispatch and decrements when the dispatched future settles. Both are
/// lock-free and correct under concurrent dispatch.
#[derive(Debug)]
pub struct ClientContext {
    next_request_id: AtomicU64,
    in_flight: AtomicU64,
}

impl ClientContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_request_id: AtomicU64::new(1),
            in_flight: AtomicU64::new(0),
        }
    }

    /// Draw-and-increment the sequential request id.
    pub fn next_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Mark one more request as in flight; returns the new count.
    pub fn begin_request(&self) -> u64 {
        self.in_flight.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Mark one in-flight request as settled; returns the new count.
    pub fn end_request(&self) -> u64 {
        self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1
    }

    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// How many requests have been dispatched over this context's lifetime.
    pub fn dispatched(&self) -> u64 {
        self.next_request_id.load(Ordering::Relaxed) - 1
    }
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_one() {
        let ctx = ClientContext::new();
        assert_eq!(ctx.next_id(), 1);
        assert_eq!(ctx.next_id(), 2);
        assert_eq!(ctx.dispatched(), 2);
    }

    #[test]
    fn in_flight_tracks_begin_and_end() {
        let ctx = ClientContext::new();
        assert_eq!(ctx.begin_request(), 1);
        assert_eq!(ctx.begin_request(), 2);
        assert_eq!(ctx.in_flight(), 2);
        assert_eq!(ctx.end_request(), 1);
        assert_eq!(ctx.end_request(), 0);
    }

    #[test]
    fn counters_are_consistent_across_threads() {
        let ctx = std::sync::Arc::new(ClientContext::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        ctx.next_id();
                        ctx.begin_request();
                        ctx.end_request();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(ctx.dispatched(), 8000);
        assert_eq!(ctx.in_flight(), 0);
    }
}
