//! Full/empty derivation from a local counter and a remote snapshot.
//!
//! The remote value is always a snapshot that may lag the real counter. Both
//! predicates are conservative under that lag:
//!
//! - The producer's snapshot of the read counter can only be behind, so the
//!   distance it computes can only be too large: `is_full` may fire early,
//!   never late.
//! - The consumer's snapshot of the write counter can only be behind, so
//!   `is_empty` may fire early, never late.

use crate::counter::{Counter, Geometry};

/// Number of items between `read` and `write`.
///
/// # Panics
///
/// Panics if the distance exceeds the capacity. That can only happen if a
/// counter was advanced outside the push/pop protocol.
#[inline(always)]
pub fn occupancy(geometry: &Geometry, write: Counter, read: Counter) -> usize {
    let len = geometry.distance(write, read);
    assert!(
        len <= geometry.capacity(),
        "counters diverged: write {write:?}, read {read:?}, capacity {}",
        geometry.capacity()
    );
    len
}

/// `true` if the producer at `write` must not push, given `read_snapshot`.
#[inline(always)]
pub fn is_full(geometry: &Geometry, write: Counter, read_snapshot: Counter) -> bool {
    occupancy(geometry, write, read_snapshot) == geometry.capacity()
}

/// `true` if the consumer at `read` must not pop, given `write_snapshot`.
#[inline(always)]
pub fn is_empty(read: Counter, write_snapshot: Counter) -> bool {
    write_snapshot == read
}
