//! The FIFO itself: shared storage plus one owned half per side.
//!
//! ```text
//! ┌──────────────────── Producer ────────────────────┐
//! │ write: Counter         (authoritative, local)    │
//! │ read_snapshot: Snapshot (refreshed when full)    │
//! └───────────────┬──────────────────────────────────┘
//!                 │ Arc<Shared>
//! ┌───────────────▼──────────────────────────────────┐
//! │ write: Publisher  (cache line 0)                 │
//! │ read:  Publisher  (cache line 1)                 │
//! │ producer_parked / consumer_parked (padded)       │
//! │ slots: [T; capacity]                             │
//! └───────────────▲──────────────────────────────────┘
//!                 │ Arc<Shared>
//! ┌───────────────┴──────────────────────────────────┐
//! │ read: Counter          (authoritative, local)    │
//! │ write_snapshot: Snapshot (refreshed when empty)  │
//! └──────────────────── Consumer ────────────────────┘
//! ```
//!
//! Each side writes only its own publisher and only the slots the other side
//! has released: the producer writes slots behind the observed read counter,
//! the consumer reads slots behind the observed write counter.

use std::alloc::Layout;
use std::fmt;
use std::mem::MaybeUninit;

use crossbeam_utils::CachePadded;
use crossbeam_utils::sync::{Parker, Unparker};

use crate::config::Config;
use crate::counter::{Counter, Geometry};
use crate::error::{Empty, Full, InvalidCapacity, PopError, PushError};
use crate::oracle;
use crate::publish::{Publisher, Snapshot};
use crate::slots::Slots;
use crate::sync::{Arc, AtomicBool, Ordering, fence};
use crate::wait::{Step, WaitStrategy, Waiter};

struct Shared<T> {
    /// Producer's counter. Written by the producer, observed by the consumer.
    write: Publisher,
    /// Consumer's counter. Written by the consumer, observed by the producer.
    read: Publisher,

    producer_parked: CachePadded<AtomicBool>,
    consumer_parked: CachePadded<AtomicBool>,

    producer_alive: AtomicBool,
    consumer_alive: AtomicBool,

    geometry: Geometry,
    slots: Slots<T>,
}

// Safety: slot access is partitioned between the two sides by the counters;
// everything else is atomic.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send> Sync for Shared<T> {}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        // Both halves are gone, so the published counters are final.
        let read = self.read.load_quiescent(&self.geometry);
        let write = self.write.load_quiescent(&self.geometry);
        // Safety: [read, write) holds pushed values nobody popped, and no one
        // else can reach the storage any more.
        unsafe { self.slots.drop_range(read, write) };
    }
}

/// Wakes the other side if it announced that it is parking.
///
/// The fence pairs with the one in the parking path: either the parking side
/// sees our publish on its final retry, or we see its flag here.
#[inline]
fn notify(parked: &AtomicBool, unparker: &Unparker) {
    fence(Ordering::SeqCst);
    if parked.load(Ordering::Relaxed) {
        unparker.unpark();
    }
}

fn geometry_for<T>(capacity: usize) -> Result<Geometry, InvalidCapacity> {
    let geometry = Geometry::new(capacity)?;
    if Layout::array::<MaybeUninit<T>>(geometry.capacity()).is_err() {
        return Err(InvalidCapacity::TooLarge(capacity));
    }
    Ok(geometry)
}

pub(crate) fn split<T>(config: Config) -> Result<(Producer<T>, Consumer<T>), InvalidCapacity> {
    let geometry = geometry_for::<T>(config.capacity()).inspect_err(|err| {
        tracing::debug!(capacity = config.capacity(), %err, "fifo construction rejected");
    })?;

    let shared = Arc::new(Shared {
        write: Publisher::new(),
        read: Publisher::new(),
        producer_parked: CachePadded::new(AtomicBool::new(false)),
        consumer_parked: CachePadded::new(AtomicBool::new(false)),
        producer_alive: AtomicBool::new(true),
        consumer_alive: AtomicBool::new(true),
        geometry,
        slots: Slots::new(geometry),
    });

    let producer_parker = Parker::new();
    let producer_unparker = producer_parker.unparker().clone();

    let consumer_parker = Parker::new();
    let consumer_unparker = consumer_parker.unparker().clone();

    let wait = config.wait_strategy();
    tracing::debug!(capacity = geometry.capacity(), ?wait, "fifo allocated");

    Ok((
        Producer {
            shared: Arc::clone(&shared),
            geometry,
            write: Counter::ZERO,
            read_snapshot: Snapshot::new(),
            wait,
            parker: producer_parker,
            consumer_unparker,
        },
        Consumer {
            shared,
            geometry,
            read: Counter::ZERO,
            write_snapshot: Snapshot::new(),
            wait,
            parker: consumer_parker,
            producer_unparker,
        },
    ))
}

/// The writing half of a FIFO.
///
/// `Send` but not `Sync`, and every push takes `&mut self`: there is exactly
/// one producer.
pub struct Producer<T> {
    shared: Arc<Shared<T>>,
    geometry: Geometry,

    /// Our write position (authoritative, only we update this).
    write: Counter,
    /// Last observed read position. Only refreshed when the FIFO looks full.
    read_snapshot: Snapshot,

    wait: WaitStrategy,
    parker: Parker,
    consumer_unparker: Unparker,
}

impl<T> Producer<T> {
    /// Pushes `value` if there is room, without waiting.
    ///
    /// Fullness is first judged from the cached read snapshot; only if that
    /// says full is the consumer's counter observed again.
    ///
    /// # Errors
    ///
    /// Returns [`Full`] with the value if the FIFO is full. Nothing is
    /// written and no counter moves.
    ///
    /// # Example
    ///
    /// ```
    /// let (mut tx, mut rx) = nexus_fifo::fifo::<u32>(2).unwrap();
    ///
    /// tx.try_push(1).unwrap();
    /// tx.try_push(2).unwrap();
    /// assert_eq!(tx.try_push(3).unwrap_err().into_inner(), 3);
    ///
    /// assert_eq!(rx.try_pop(), Ok(1));
    /// tx.try_push(3).unwrap();
    /// ```
    #[inline]
    #[must_use = "try_push returns Err if full, which should be handled"]
    pub fn try_push(&mut self, value: T) -> Result<(), Full<T>> {
        if oracle::is_full(&self.geometry, self.write, self.read_snapshot.get()) {
            return self.try_push_slow(value);
        }

        self.commit(value);
        Ok(())
    }

    #[cold]
    fn try_push_slow(&mut self, value: T) -> Result<(), Full<T>> {
        let read = self.read_snapshot.refresh(&self.shared.read, &self.geometry);
        if oracle::is_full(&self.geometry, self.write, read) {
            return Err(Full(value));
        }

        self.commit(value);
        Ok(())
    }

    #[inline(always)]
    fn commit(&mut self, value: T) {
        let shared = &*self.shared;

        // Safety: the oracle saw room against a read counter we observed, so
        // the consumer has already moved past this slot.
        unsafe { shared.slots.write(self.write, value) };

        self.write = self.geometry.advance(self.write);
        shared.write.publish(self.write);

        if self.wait.parks() {
            notify(&shared.consumer_parked, &self.consumer_unparker);
        }
    }

    /// Pushes `value`, waiting for room according to the wait strategy.
    ///
    /// Only this thread waits. The consumer is never blocked by it, and its
    /// pops are what free a slot.
    ///
    /// # Errors
    ///
    /// Returns [`PushError`] with the value if the consumer has been dropped,
    /// whether before the call or while waiting.
    pub fn push(&mut self, value: T) -> Result<(), PushError<T>> {
        if self.is_disconnected() {
            return Err(PushError(value));
        }

        let mut value = match self.try_push(value) {
            Ok(()) => return Ok(()),
            Err(Full(v)) => v,
        };

        let mut waiter = Waiter::new(self.wait);
        loop {
            if self.is_disconnected() {
                return Err(PushError(value));
            }

            if waiter.wait() == Step::Park {
                self.shared.producer_parked.store(true, Ordering::SeqCst);
                fence(Ordering::SeqCst);

                // Retry after announcing, a pop may have raced the store.
                match self.try_push(value) {
                    Ok(()) => {
                        self.shared.producer_parked.store(false, Ordering::Relaxed);
                        return Ok(());
                    }
                    Err(Full(v)) => value = v,
                }

                if self.is_disconnected() {
                    self.shared.producer_parked.store(false, Ordering::Relaxed);
                    return Err(PushError(value));
                }

                tracing::trace!(position = self.write.get(), "producer parked on full fifo");
                self.parker.park();
                self.shared.producer_parked.store(false, Ordering::Relaxed);
            }

            match self.try_push(value) {
                Ok(()) => return Ok(()),
                Err(Full(v)) => value = v,
            }
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.geometry.capacity()
    }

    /// Number of values in the FIFO as seen from this side right now.
    ///
    /// Observes the consumer's counter, so the result may already be too
    /// high by the time it is returned; it is never too low.
    #[inline]
    pub fn len(&self) -> usize {
        let read = self.shared.read.observe(&self.geometry);
        oracle::occupancy(&self.geometry, self.write, read)
    }

    /// `true` if the FIFO holds no values as seen from this side.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if a push would fail right now.
    ///
    /// Uses a fresh observation of the consumer's counter, so it may turn
    /// `false` at any moment afterwards, never the other way round.
    #[inline]
    pub fn is_full(&self) -> bool {
        let read = self.shared.read.observe(&self.geometry);
        oracle::is_full(&self.geometry, self.write, read)
    }

    /// Current write counter, lap bit included.
    #[inline]
    pub fn position(&self) -> Counter {
        self.write
    }

    /// Wait strategy used by [`push`](Producer::push).
    #[inline]
    pub fn wait_strategy(&self) -> WaitStrategy {
        self.wait
    }

    /// `true` if the consumer has been dropped.
    #[inline]
    pub fn is_disconnected(&self) -> bool {
        !self.shared.consumer_alive.load(Ordering::Acquire)
    }
}

impl<T> Drop for Producer<T> {
    fn drop(&mut self) {
        self.shared.producer_alive.store(false, Ordering::Release);
        // Wake the consumer so it sees the disconnect instead of parking forever.
        self.consumer_unparker.unpark();
        tracing::debug!(position = self.write.get(), "fifo producer dropped");
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &self.capacity())
            .field("position", &self.write)
            .field("disconnected", &self.is_disconnected())
            .finish_non_exhaustive()
    }
}

/// The reading half of a FIFO.
///
/// `Send` but not `Sync`, and every pop takes `&mut self`: there is exactly
/// one consumer.
pub struct Consumer<T> {
    shared: Arc<Shared<T>>,
    geometry: Geometry,

    /// Our read position (authoritative, only we update this).
    read: Counter,
    /// Last observed write position. Only refreshed when the FIFO looks empty.
    write_snapshot: Snapshot,

    wait: WaitStrategy,
    parker: Parker,
    producer_unparker: Unparker,
}

impl<T> Consumer<T> {
    /// Pops the oldest value if there is one, without waiting.
    ///
    /// Emptiness is first judged from the cached write snapshot; only if that
    /// says empty is the producer's counter observed again.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`] if there is nothing to pop. No counter moves.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_fifo::Empty;
    ///
    /// let (mut tx, mut rx) = nexus_fifo::fifo::<u32>(4).unwrap();
    ///
    /// assert_eq!(rx.try_pop(), Err(Empty));
    /// tx.try_push(42).unwrap();
    /// assert_eq!(rx.try_pop(), Ok(42));
    /// ```
    #[inline]
    pub fn try_pop(&mut self) -> Result<T, Empty> {
        if oracle::is_empty(self.read, self.write_snapshot.get()) {
            return self.try_pop_slow();
        }

        Ok(self.take())
    }

    #[cold]
    fn try_pop_slow(&mut self) -> Result<T, Empty> {
        let write = self.write_snapshot.refresh(&self.shared.write, &self.geometry);
        if oracle::is_empty(self.read, write) {
            return Err(Empty);
        }

        Ok(self.take())
    }

    #[inline(always)]
    fn take(&mut self) -> T {
        let shared = &*self.shared;

        // Safety: the oracle saw data against a write counter we observed,
        // so the producer finished this slot and will not touch it again
        // until it observes our advanced counter.
        let value = unsafe { shared.slots.read(self.read) };

        self.read = self.geometry.advance(self.read);
        shared.read.publish(self.read);

        if self.wait.parks() {
            notify(&shared.producer_parked, &self.producer_unparker);
        }

        value
    }

    /// Pops up to `max` values into `out`, oldest first.
    ///
    /// Observes the producer once and publishes once, however many values
    /// move. Returns how many were appended.
    ///
    /// # Example
    ///
    /// ```
    /// let (mut tx, mut rx) = nexus_fifo::fifo::<u32>(8).unwrap();
    /// for i in 0..5 {
    ///     tx.try_push(i).unwrap();
    /// }
    ///
    /// let mut out = Vec::new();
    /// assert_eq!(rx.try_pop_batch(&mut out, 3), 3);
    /// assert_eq!(rx.try_pop_batch(&mut out, 10), 2);
    /// assert_eq!(out, vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn try_pop_batch(&mut self, out: &mut Vec<T>, max: usize) -> usize {
        let write = self.write_snapshot.refresh(&self.shared.write, &self.geometry);
        let n = oracle::occupancy(&self.geometry, write, self.read).min(max);
        if n == 0 {
            return 0;
        }

        out.reserve(n);

        let shared = &*self.shared;
        for k in 0..n {
            let at = self.geometry.advance_by(self.read, k);
            // Safety: every slot in [read, write) is committed by the producer.
            out.push(unsafe { shared.slots.read(at) });
        }

        self.read = self.geometry.advance_by(self.read, n);
        shared.read.publish(self.read);

        if self.wait.parks() {
            notify(&shared.producer_parked, &self.producer_unparker);
        }

        n
    }

    /// Pops the oldest value, waiting for one according to the wait strategy.
    ///
    /// Only this thread waits. The producer is never blocked by it, and its
    /// pushes are what end the wait.
    ///
    /// # Errors
    ///
    /// Returns [`PopError`] once the producer has been dropped and every
    /// value it pushed has been popped.
    pub fn pop(&mut self) -> Result<T, PopError> {
        if let Ok(value) = self.try_pop() {
            return Ok(value);
        }

        let mut waiter = Waiter::new(self.wait);
        loop {
            if self.is_disconnected() {
                // Values pushed right before the drop are still poppable.
                return self.try_pop().map_err(|Empty| PopError);
            }

            if waiter.wait() == Step::Park {
                self.shared.consumer_parked.store(true, Ordering::SeqCst);
                fence(Ordering::SeqCst);

                // Retry after announcing, a push may have raced the store.
                if let Ok(value) = self.try_pop() {
                    self.shared.consumer_parked.store(false, Ordering::Relaxed);
                    return Ok(value);
                }

                if self.is_disconnected() {
                    self.shared.consumer_parked.store(false, Ordering::Relaxed);
                    return self.try_pop().map_err(|Empty| PopError);
                }

                tracing::trace!(position = self.read.get(), "consumer parked on empty fifo");
                self.parker.park();
                self.shared.consumer_parked.store(false, Ordering::Relaxed);
            }

            if let Ok(value) = self.try_pop() {
                return Ok(value);
            }
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.geometry.capacity()
    }

    /// Number of values in the FIFO as seen from this side right now.
    ///
    /// Observes the producer's counter, so the result may already be too
    /// low by the time it is returned; it is never too high.
    #[inline]
    pub fn len(&self) -> usize {
        let write = self.shared.write.observe(&self.geometry);
        oracle::occupancy(&self.geometry, write, self.read)
    }

    /// `true` if a pop would fail right now.
    #[inline]
    pub fn is_empty(&self) -> bool {
        let write = self.shared.write.observe(&self.geometry);
        oracle::is_empty(self.read, write)
    }

    /// Current read counter, lap bit included.
    #[inline]
    pub fn position(&self) -> Counter {
        self.read
    }

    /// Wait strategy used by [`pop`](Consumer::pop).
    #[inline]
    pub fn wait_strategy(&self) -> WaitStrategy {
        self.wait
    }

    /// `true` if the producer has been dropped.
    ///
    /// Values it pushed before the drop can still be popped.
    #[inline]
    pub fn is_disconnected(&self) -> bool {
        !self.shared.producer_alive.load(Ordering::Acquire)
    }
}

impl<T> Drop for Consumer<T> {
    fn drop(&mut self) {
        self.shared.consumer_alive.store(false, Ordering::Release);
        // Wake the producer so it sees the disconnect instead of parking forever.
        self.producer_unparker.unpark();
        tracing::debug!(position = self.read.get(), "fifo consumer dropped");
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("capacity", &self.capacity())
            .field("position", &self.read)
            .field("disconnected", &self.is_disconnected())
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use crate::fifo;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    // ============================================================================
    // Basic Operations
    // ============================================================================

    #[test]
    fn basic_push_pop() {
        let (mut tx, mut rx) = fifo::<u64>(8).unwrap();

        tx.try_push(1).unwrap();
        tx.try_push(2).unwrap();
        tx.try_push(3).unwrap();

        assert_eq!(rx.try_pop(), Ok(1));
        assert_eq!(rx.try_pop(), Ok(2));
        assert_eq!(rx.try_pop(), Ok(3));
        assert_eq!(rx.try_pop(), Err(Empty));
    }

    #[test]
    fn capacity_is_exact() {
        let (tx, rx) = fifo::<u64>(16).unwrap();
        assert_eq!(tx.capacity(), 16);
        assert_eq!(rx.capacity(), 16);

        assert_eq!(
            fifo::<u64>(100).unwrap_err(),
            InvalidCapacity::NotPowerOfTwo(100)
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_slot_array_rejected() {
        let err = fifo::<[u64; 1 << 20]>(1 << 40).unwrap_err();
        assert_eq!(err, InvalidCapacity::TooLarge(1 << 40));
        // Below the counter limit, so the message must not blame it.
        assert!(1 << 40 < crate::MAX_CAPACITY);
        assert!(!err.to_string().contains("exceeds max"));
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn full_rejects_without_side_effects() {
        let (mut tx, mut rx) = fifo::<u64>(4).unwrap();

        for i in 0..4 {
            tx.try_push(i).unwrap();
        }
        let before = tx.position();

        assert_eq!(tx.try_push(99), Err(Full(99)));
        assert_eq!(tx.position(), before);
        assert!(tx.is_full());

        for i in 0..4 {
            assert_eq!(rx.try_pop(), Ok(i));
        }
    }

    #[test]
    fn empty_rejects_without_advancing() {
        let (_tx, mut rx) = fifo::<u64>(4).unwrap();

        assert_eq!(rx.try_pop(), Err(Empty));
        assert_eq!(rx.position(), Counter::ZERO);
        assert!(rx.is_empty());
    }

    #[test]
    fn capacity_one() {
        let (mut tx, mut rx) = fifo::<u64>(1).unwrap();

        for i in 0..10 {
            tx.try_push(i).unwrap();
            assert_eq!(tx.try_push(i + 100), Err(Full(i + 100)));
            assert_eq!(rx.try_pop(), Ok(i));
            assert_eq!(rx.try_pop(), Err(Empty));
        }
    }

    #[test]
    fn len_from_both_sides() {
        let (mut tx, mut rx) = fifo::<u64>(8).unwrap();

        assert_eq!(tx.len(), 0);
        assert!(tx.is_empty());

        for i in 0..5 {
            tx.try_push(i).unwrap();
        }
        assert_eq!(tx.len(), 5);
        assert_eq!(rx.len(), 5);

        rx.try_pop().unwrap();
        assert_eq!(tx.len(), 4);
        assert_eq!(rx.len(), 4);
    }

    #[test]
    fn positions_carry_lap_bit() {
        let (mut tx, mut rx) = fifo::<u64>(4).unwrap();

        for i in 0..6 {
            tx.try_push(i).unwrap();
            rx.try_pop().unwrap();
        }
        assert_eq!(tx.position().get(), 6);
        assert_eq!(rx.position().get(), 6);

        for i in 0..3 {
            tx.try_push(i).unwrap();
            rx.try_pop().unwrap();
        }
        assert_eq!(tx.position().get(), 1);
        assert_eq!(rx.position().get(), 1);
    }

    // ============================================================================
    // Batch
    // ============================================================================

    #[test]
    fn batch_pop_across_wrap() {
        let (mut tx, mut rx) = fifo::<u64>(4).unwrap();
        let mut out = Vec::new();

        for i in 0..3 {
            tx.try_push(i).unwrap();
        }
        assert_eq!(rx.try_pop_batch(&mut out, 3), 3);

        for i in 3..7 {
            tx.try_push(i).unwrap();
        }
        assert!(tx.is_full());

        assert_eq!(rx.try_pop_batch(&mut out, 8), 4);
        assert_eq!(out, (0..7).collect::<Vec<_>>());
        assert_eq!(rx.try_pop_batch(&mut out, 8), 0);
    }

    #[test]
    fn batch_pop_whole_buffer_after_wrap() {
        let (mut tx, mut rx) = fifo::<u64>(4).unwrap();
        let mut out = Vec::new();

        for i in 0..3 {
            tx.try_push(i).unwrap();
            rx.try_pop().unwrap();
        }
        for i in 0..4 {
            tx.try_push(i).unwrap();
        }

        assert_eq!(rx.try_pop_batch(&mut out, 4), 4);
        assert_eq!(out, vec![0, 1, 2, 3]);
        assert_eq!(rx.position(), tx.position());
        assert_eq!(rx.position().get(), 7);
        assert_eq!(rx.try_pop(), Err(Empty));

        tx.try_push(9).unwrap();
        assert_eq!(rx.try_pop(), Ok(9));
    }

    #[test]
    fn batch_pop_zero_max() {
        let (mut tx, mut rx) = fifo::<u64>(4).unwrap();
        tx.try_push(1).unwrap();

        let mut out = Vec::new();
        assert_eq!(rx.try_pop_batch(&mut out, 0), 0);
        assert_eq!(rx.try_pop(), Ok(1));
    }

    // ============================================================================
    // Disconnection
    // ============================================================================

    #[test]
    fn pop_drains_before_error_when_producer_dropped() {
        let (mut tx, mut rx) = fifo::<u64>(4).unwrap();

        tx.push(1).unwrap();
        tx.push(2).unwrap();
        drop(tx);

        assert!(rx.is_disconnected());
        assert_eq!(rx.pop(), Ok(1));
        assert_eq!(rx.pop(), Ok(2));
        assert_eq!(rx.pop(), Err(PopError));
    }

    #[test]
    fn push_errors_when_consumer_dropped() {
        let (mut tx, rx) = fifo::<u64>(4).unwrap();

        assert!(!tx.is_disconnected());
        drop(rx);
        assert!(tx.is_disconnected());
        assert_eq!(tx.push(1), Err(PushError(1)));
    }

    #[test]
    fn values_dropped_with_fifo() {
        static DROPS: AtomicUsize = AtomicUsize::new(0);

        #[derive(Debug)]
        struct Counted;
        impl Drop for Counted {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::SeqCst);
            }
        }

        let (mut tx, mut rx) = fifo::<Counted>(4).unwrap();
        for _ in 0..3 {
            tx.try_push(Counted).unwrap();
        }
        drop(rx.try_pop().unwrap());
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);

        drop(tx);
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);
        drop(rx);
        assert_eq!(DROPS.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn debug_output() {
        let (tx, rx) = fifo::<u64>(4).unwrap();
        let tx_dbg = format!("{tx:?}");
        let rx_dbg = format!("{rx:?}");
        assert!(tx_dbg.starts_with("Producer"));
        assert!(tx_dbg.contains("capacity: 4"));
        assert!(rx_dbg.starts_with("Consumer"));
    }

    // ============================================================================
    // Blocking
    // ============================================================================

    #[test]
    fn pop_blocks_until_push() {
        let (mut tx, mut rx) = fifo::<u64>(4).unwrap();

        let handle = thread::spawn(move || rx.pop().unwrap());

        thread::sleep(Duration::from_millis(20));
        tx.push(42).unwrap();

        assert_eq!(handle.join().unwrap(), 42);
    }

    #[test]
    fn push_blocks_until_pop() {
        let (mut tx, mut rx) = fifo::<u64>(2).unwrap();

        tx.push(1).unwrap();
        tx.push(2).unwrap();

        let handle = thread::spawn(move || {
            tx.push(3).unwrap();
            tx
        });

        thread::sleep(Duration::from_millis(20));
        assert_eq!(rx.pop(), Ok(1));

        let _tx = handle.join().unwrap();
        assert_eq!(rx.pop(), Ok(2));
        assert_eq!(rx.pop(), Ok(3));
    }

    #[test]
    fn parked_pop_wakes_on_producer_drop() {
        let (tx, mut rx) = Config::new(4)
            .wait(WaitStrategy::Park { snooze_iters: 0 })
            .build::<u64>()
            .unwrap();

        let handle = thread::spawn(move || rx.pop());

        thread::sleep(Duration::from_millis(20));
        drop(tx);

        assert_eq!(handle.join().unwrap(), Err(PopError));
    }

    #[test]
    fn parked_push_wakes_on_consumer_drop() {
        let (mut tx, rx) = Config::new(1)
            .wait(WaitStrategy::Park { snooze_iters: 0 })
            .build::<u64>()
            .unwrap();

        tx.push(1).unwrap();
        let handle = thread::spawn(move || tx.push(2));

        thread::sleep(Duration::from_millis(20));
        drop(rx);

        assert_eq!(handle.join().unwrap(), Err(PushError(2)));
    }

    #[test]
    fn every_wait_strategy_transfers_in_order() {
        for wait in [
            WaitStrategy::Spin,
            WaitStrategy::Yield,
            WaitStrategy::Backoff,
            WaitStrategy::Park { snooze_iters: 0 },
            WaitStrategy::default(),
        ] {
            let (mut tx, mut rx) = Config::new(2).wait(wait).build::<u64>().unwrap();

            let producer = thread::spawn(move || {
                for i in 0..2_000 {
                    tx.push(i).unwrap();
                }
            });

            for i in 0..2_000 {
                assert_eq!(rx.pop(), Ok(i), "{wait:?}");
            }
            producer.join().unwrap();
        }
    }
}
