//! FIFO construction parameters.

use crate::error::InvalidCapacity;
use crate::queue::{self, Consumer, Producer};
use crate::wait::WaitStrategy;

/// Capacity used by [`Config::default`].
pub const DEFAULT_CAPACITY: usize = 1024;

/// Builder for a `(Producer, Consumer)` pair.
///
/// # Example
///
/// ```
/// use nexus_fifo::{Config, WaitStrategy};
///
/// let (mut tx, mut rx) = Config::new(64)
///     .wait(WaitStrategy::Backoff)
///     .build::<u32>()
///     .unwrap();
///
/// tx.push(7).unwrap();
/// assert_eq!(rx.pop().unwrap(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    capacity: usize,
    wait: WaitStrategy,
}

impl Config {
    /// Starts a configuration with the given capacity and the default wait
    /// strategy. The capacity is validated by [`build`](Config::build).
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            wait: WaitStrategy::Park {
                snooze_iters: crate::wait::DEFAULT_SNOOZE_ITERS,
            },
        }
    }

    /// Sets how the blocking `push`/`pop` wait. Both halves use the same
    /// strategy.
    #[must_use]
    pub const fn wait(mut self, wait: WaitStrategy) -> Self {
        self.wait = wait;
        self
    }

    /// Configured capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured wait strategy.
    pub const fn wait_strategy(&self) -> WaitStrategy {
        self.wait
    }

    /// Allocates the FIFO and splits it into its two halves.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if the capacity is zero, not a power of
    /// two, or too large. Capacities are never rounded.
    pub fn build<T>(self) -> Result<(Producer<T>, Consumer<T>), InvalidCapacity> {
        queue::split(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
