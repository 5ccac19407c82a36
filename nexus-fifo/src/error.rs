//! Error types returned by FIFO operations.

use core::fmt;

use crate::counter::MAX_CAPACITY;

/// Returned by [`Producer::try_push`](crate::Producer::try_push) when the
/// FIFO is full.
///
/// Holds the value that could not be pushed so the caller can retry or drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fifo is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

/// Returned by [`Consumer::try_pop`](crate::Consumer::try_pop) when the FIFO
/// is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Empty;

impl fmt::Display for Empty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fifo is empty")
    }
}

impl std::error::Error for Empty {}

/// Capacity rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidCapacity {
    /// Capacity was zero.
    Zero,
    /// Capacity was not a power of two.
    NotPowerOfTwo(usize),
    /// Capacity leaves no room for the lap bit, or the slot array would not
    /// fit in the address space.
    TooLarge(usize),
}

impl fmt::Display for InvalidCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "capacity must be non-zero"),
            Self::NotPowerOfTwo(n) => write!(f, "capacity {n} is not a power of two"),
            Self::TooLarge(n) => write!(
                f,
                "capacity {n} is too large: limit is {MAX_CAPACITY} slots and the slot array must fit in memory"
            ),
        }
    }
}

impl std::error::Error for InvalidCapacity {}

/// Returned by [`Producer::push`](crate::Producer::push) when the consumer
/// has been dropped.
///
/// Holds the value that could not be pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushError<T>(pub T);

impl<T> PushError<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "consumer disconnected")
    }
}

impl<T: fmt::Debug> std::error::Error for PushError<T> {}

/// Returned by [`Consumer::pop`](crate::Consumer::pop) when the producer has
/// been dropped and every pushed value has been popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopError;

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "producer disconnected")
    }
}

impl std::error::Error for PopError {}
