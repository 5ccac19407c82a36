//! Wait strategies for the blocking [`push`](crate::Producer::push) and
//! [`pop`](crate::Consumer::pop).
//!
//! A blocking call is a `try_*` call retried until it succeeds or the other
//! side disconnects. Between attempts the caller waits according to its
//! [`WaitStrategy`]. Waiting never involves the other side: it keeps running
//! at its own pace, and its progress is what ends the wait.
//!
//! | Strategy | Between attempts | CPU while waiting |
//! |----------|------------------|-------------------|
//! | `Spin` | `spin_loop` hint | one core at 100% |
//! | `Yield` | `thread::yield_now` | high |
//! | `Backoff` | `Backoff::snooze` (spin, then yield) | medium |
//! | `Park` | snooze `snooze_iters` times, then park | none once parked |

use crossbeam_utils::Backoff;

use crate::sync::{spin_loop, yield_now};

/// Default number of backoff snooze iterations before parking.
pub const DEFAULT_SNOOZE_ITERS: usize = 8;

/// How a blocking operation waits between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Busy-spin with a CPU hint.
    Spin,
    /// Yield the time slice to the OS scheduler.
    Yield,
    /// Exponential spin, then yield. Never sleeps.
    Backoff,
    /// Back off for `snooze_iters` rounds, then park the thread until the
    /// other side makes progress or disconnects.
    Park {
        /// Snooze rounds before parking.
        snooze_iters: usize,
    },
}

impl WaitStrategy {
    /// `true` if a waiting side may sleep, which obliges the other side to
    /// wake it after every push or pop.
    #[inline(always)]
    pub const fn parks(&self) -> bool {
        matches!(self, Self::Park { .. })
    }
}

impl Default for WaitStrategy {
    fn default() -> Self {
        Self::Park {
            snooze_iters: DEFAULT_SNOOZE_ITERS,
        }
    }
}

/// What a blocked side does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Retry the operation.
    Retry,
    /// Announce parking, retry once more, then park.
    Park,
}

/// Per-call waiting state.
pub(crate) struct Waiter {
    strategy: WaitStrategy,
    backoff: Backoff,
    snoozes: usize,
}

impl Waiter {
    pub(crate) fn new(strategy: WaitStrategy) -> Self {
        Self {
            strategy,
            backoff: Backoff::new(),
            snoozes: 0,
        }
    }

    /// Waits once according to the strategy and says what to do next.
    #[inline]
    pub(crate) fn wait(&mut self) -> Step {
        match self.strategy {
            WaitStrategy::Spin => {
                spin_loop();
                Step::Retry
            }
            WaitStrategy::Yield => {
                yield_now();
                Step::Retry
            }
            WaitStrategy::Backoff => {
                self.backoff.snooze();
                Step::Retry
            }
            WaitStrategy::Park { snooze_iters } => {
                if self.snoozes < snooze_iters {
                    self.snoozes += 1;
                    self.backoff.snooze();
                    Step::Retry
                } else {
                    Step::Park
                }
            }
        }
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn default_parks() {
        assert_eq!(
            WaitStrategy::default(),
            WaitStrategy::Park {
                snooze_iters: DEFAULT_SNOOZE_ITERS
            }
        );
        assert!(WaitStrategy::default().parks());
        assert!(!WaitStrategy::Backoff.parks());
    }

    #[test]
    fn non_parking_strategies_always_retry() {
        for strategy in [WaitStrategy::Spin, WaitStrategy::Yield, WaitStrategy::Backoff] {
            let mut waiter = Waiter::new(strategy);
            for _ in 0..100 {
                assert_eq!(waiter.wait(), Step::Retry);
            }
        }
    }

    #[test]
    fn park_after_snooze_budget() {
        let mut waiter = Waiter::new(WaitStrategy::Park { snooze_iters: 3 });
        assert_eq!(waiter.wait(), Step::Retry);
        assert_eq!(waiter.wait(), Step::Retry);
        assert_eq!(waiter.wait(), Step::Retry);
        assert_eq!(waiter.wait(), Step::Park);
        assert_eq!(waiter.wait(), Step::Park);
    }

    #[test]
    fn park_immediately_with_zero_snoozes() {
        let mut waiter = Waiter::new(WaitStrategy::Park { snooze_iters: 0 });
        assert_eq!(waiter.wait(), Step::Park);
    }
}
