//! # nexus-fifo
//!
//! Bounded single-producer single-consumer FIFO for handing values between
//! two independently scheduled threads.
//!
//! ## Design
//!
//! - **Lap-bit counters**: each side's position is a counter in
//!   `[0, 2 * capacity)`. The low bits select a slot, the next bit tells
//!   successive passes over the buffer apart, so every slot is usable and
//!   "full" is never confused with "empty".
//! - **One published word per side**: a side only ever shares its own
//!   counter, with a `Release` store; the other side reads it with an
//!   `Acquire` load. No locks, no read-modify-write on the hot path.
//! - **Cached snapshots**: each side keeps the last counter it saw from the
//!   other and only looks again when that snapshot says full (producer) or
//!   empty (consumer). A stale snapshot can only make the FIFO look fuller or
//!   emptier than it is, never the reverse.
//! - **Separate waiting**: blocking [`push`](Producer::push) and
//!   [`pop`](Consumer::pop) retry their `try_*` counterpart under a
//!   [`WaitStrategy`]. A waiting side never stalls the other.
//!
//! ## Example
//!
//! ```
//! use std::thread;
//!
//! let (mut tx, mut rx) = nexus_fifo::fifo::<u64>(1024).unwrap();
//!
//! let producer = thread::spawn(move || {
//!     for i in 0..10_000 {
//!         tx.push(i).unwrap();
//!     }
//! });
//!
//! for i in 0..10_000 {
//!     assert_eq!(rx.pop().unwrap(), i);
//! }
//! producer.join().unwrap();
//! ```
//!
//! Capacities must be powers of two and are never rounded:
//!
//! ```
//! use nexus_fifo::InvalidCapacity;
//!
//! assert_eq!(
//!     nexus_fifo::fifo::<u64>(1000).unwrap_err(),
//!     InvalidCapacity::NotPowerOfTwo(1000)
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod counter;
pub mod oracle;
pub mod wait;

mod config;
mod error;
mod publish;
mod queue;
mod slots;
mod sync;

pub use config::{Config, DEFAULT_CAPACITY};
pub use counter::{Counter, MAX_CAPACITY};
pub use error::{Empty, Full, InvalidCapacity, PopError, PushError};
pub use queue::{Consumer, Producer};
pub use wait::WaitStrategy;

/// Creates a FIFO with `capacity` slots and the default wait strategy.
///
/// Shorthand for `Config::new(capacity).build()`.
///
/// # Errors
///
/// Returns [`InvalidCapacity`] if `capacity` is zero, not a power of two, or
/// too large for the element type.
pub fn fifo<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>), InvalidCapacity> {
    Config::new(capacity).build()
}
