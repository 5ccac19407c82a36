//! Position counters with a lap bit.
//!
//! Each side of the FIFO owns one counter. A counter ranges over
//! `[0, 2 * capacity)`: the low `log2(capacity)` bits select a slot and the
//! next bit (the lap bit) flips every time the counter passes the end of the
//! buffer. Equal counters mean empty; counters with equal slot bits but
//! different lap bits mean full.
//!
//! ```
//! use nexus_fifo::counter::{Counter, Geometry};
//!
//! let geometry = Geometry::new(4).unwrap();
//! let mut write = Counter::ZERO;
//! for _ in 0..4 {
//!     write = geometry.advance(write);
//! }
//!
//! // Same slot as the read counter, other lap: four items apart.
//! assert_eq!(geometry.index_of(write), geometry.index_of(Counter::ZERO));
//! assert_ne!(geometry.lap(write), geometry.lap(Counter::ZERO));
//! assert_eq!(geometry.distance(write, Counter::ZERO), 4);
//! ```

use core::fmt;

use crate::error::InvalidCapacity;

/// Largest accepted capacity.
///
/// Counters need one bit above the slot index, and `2 * capacity` must be
/// representable.
pub const MAX_CAPACITY: usize = 1 << (usize::BITS - 2);

/// A position in `[0, 2 * capacity)`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Counter(usize);

impl Counter {
    /// Start position of both counters.
    pub const ZERO: Self = Self(0);

    /// Raw counter value, lap bit included.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Counter({})", self.0)
    }
}

/// Capacity and the masks derived from it.
///
/// All counter arithmetic goes through a `Geometry` so that wraparound
/// happens at `2 * capacity`, never at `capacity`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    capacity: usize,
    index_mask: usize,
    counter_mask: usize,
}

impl Geometry {
    /// Validates `capacity` and derives the masks.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if `capacity` is zero, not a power of two,
    /// or larger than [`MAX_CAPACITY`].
    pub const fn new(capacity: usize) -> Result<Self, InvalidCapacity> {
        if capacity == 0 {
            return Err(InvalidCapacity::Zero);
        }
        if !capacity.is_power_of_two() {
            return Err(InvalidCapacity::NotPowerOfTwo(capacity));
        }
        if capacity > MAX_CAPACITY {
            return Err(InvalidCapacity::TooLarge(capacity));
        }

        Ok(Self {
            capacity,
            index_mask: capacity - 1,
            counter_mask: (capacity << 1) - 1,
        })
    }

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot index of `counter` (`counter mod capacity`).
    #[inline(always)]
    pub const fn index_of(&self, counter: Counter) -> usize {
        counter.0 & self.index_mask
    }

    /// Lap bit of `counter`.
    #[inline(always)]
    pub const fn lap(&self, counter: Counter) -> bool {
        counter.0 & self.capacity != 0
    }

    /// `counter + 1`, wrapping at `2 * capacity`.
    #[inline(always)]
    pub const fn advance(&self, counter: Counter) -> Counter {
        Counter::from_raw(counter.0.wrapping_add(1) & self.counter_mask)
    }

    /// `counter + n`, wrapping at `2 * capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the capacity; no side ever moves further than
    /// one full buffer in a single step.
    #[inline]
    pub const fn advance_by(&self, counter: Counter, n: usize) -> Counter {
        assert!(n <= self.capacity, "advance beyond one full lap");
        Counter::from_raw(counter.0.wrapping_add(n) & self.counter_mask)
    }

    /// Forward distance from `behind` to `ahead`, modulo `2 * capacity`.
    #[inline(always)]
    pub const fn distance(&self, ahead: Counter, behind: Counter) -> usize {
        ahead.0.wrapping_sub(behind.0) & self.counter_mask
    }

    /// Rebuilds a counter from a raw published value.
    ///
    /// Masks stray high bits so a counter never leaves `[0, 2 * capacity)`.
    #[inline(always)]
    pub(crate) const fn counter(&self, raw: usize) -> Counter {
        Counter::from_raw(raw & self.counter_mask)
    }
}

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geometry")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
