//! Cross-side counter publication.
//!
//! One side stores its counter into a [`Publisher`]; the other side loads it
//! into a [`Snapshot`] it owns. The counter is a single atomic word, so a load
//! returns either the old or the new value, never a mix of the two.
//!
//! ```text
//! Producer                                Consumer
//! ─────────────────────                   ─────────────────────
//! slot[w].write(v)
//! w = advance(w)
//! write_pub.store(w, Release)  ───────►   write_pub.load(Acquire)
//!                                         v = slot[r].read()
//!                                         r = advance(r)
//! read_pub.load(Acquire)       ◄───────   read_pub.store(r, Release)
//! ```

use crossbeam_utils::CachePadded;

use crate::counter::{Counter, Geometry};
use crate::sync::{AtomicUsize, Ordering};

/// Single-writer published counter, alone on its cache line.
pub(crate) struct Publisher {
    value: CachePadded<AtomicUsize>,
}

impl Publisher {
    pub(crate) fn new() -> Self {
        Self {
            value: CachePadded::new(AtomicUsize::new(Counter::ZERO.get())),
        }
    }

    /// Makes `counter` visible to the other side.
    ///
    /// Everything the owner wrote before this call is visible to an observer
    /// that loads this value or a later one.
    #[inline(always)]
    pub(crate) fn publish(&self, counter: Counter) {
        self.value.store(counter.get(), Ordering::Release);
    }

    /// Loads the most recently published counter.
    #[inline(always)]
    pub(crate) fn observe(&self, geometry: &Geometry) -> Counter {
        geometry.counter(self.value.load(Ordering::Acquire))
    }

    /// Loads without synchronizing. Only valid once both sides have stopped.
    #[inline]
    pub(crate) fn load_quiescent(&self, geometry: &Geometry) -> Counter {
        geometry.counter(self.value.load(Ordering::Relaxed))
    }
}

/// Observer-side cache of the remote counter.
///
/// Only [`refresh`](Snapshot::refresh) changes it, so the fast path of push
/// and pop reads no shared memory at all.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snapshot {
    last: Counter,
}

impl Snapshot {
    pub(crate) const fn new() -> Self {
        Self {
            last: Counter::ZERO,
        }
    }

    /// Last observed remote counter.
    #[inline(always)]
    pub(crate) const fn get(&self) -> Counter {
        self.last
    }

    /// Observes `publisher` and caches the result.
    ///
    /// The remote side is never more than one buffer ahead of a value it
    /// already published, so the forward distance from the cached value
    /// stays within the capacity. A larger distance means the snapshot moved
    /// backwards.
    #[inline]
    pub(crate) fn refresh(&mut self, publisher: &Publisher, geometry: &Geometry) -> Counter {
        let observed = publisher.observe(geometry);
        debug_assert!(
            geometry.distance(observed, self.last) <= geometry.capacity(),
            "snapshot went backwards: {:?} -> {:?}",
            self.last,
            observed
        );
        self.last = observed;
        observed
    }
}
