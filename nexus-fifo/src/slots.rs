//! Slot storage shared by producer and consumer.
//!
//! The storage does not track which slots are initialized. The FIFO protocol
//! does: slots between the read and write counters hold values, all others
//! are uninitialized.

use std::mem::MaybeUninit;

use crate::counter::{Counter, Geometry};
use crate::sync::UnsafeCell;

pub(crate) struct Slots<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    geometry: Geometry,
}

impl<T> Slots<T> {
    pub(crate) fn new(geometry: Geometry) -> Self {
        let slots = (0..geometry.capacity())
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();

        Self { slots, geometry }
    }

    #[inline(always)]
    fn slot(&self, at: Counter) -> &UnsafeCell<MaybeUninit<T>> {
        let index = self.geometry.index_of(at);
        // Safety: index_of masks into [0, capacity) and the slice has
        // exactly capacity elements.
        unsafe { self.slots.get_unchecked(index) }
    }

    /// Stores `value` into the slot selected by `at`.
    ///
    /// # Safety
    ///
    /// The slot must be uninitialized and the consumer must not be reading
    /// it. The producer establishes both by observing a read counter that has
    /// moved past this slot.
    #[inline(always)]
    pub(crate) unsafe fn write(&self, at: Counter, value: T) {
        self.slot(at).with_mut(|p| unsafe { (*p).write(value) });
    }

    /// Moves the value out of the slot selected by `at`.
    ///
    /// # Safety
    ///
    /// The slot must be initialized and the producer must not be writing it.
    /// The consumer establishes both by observing a write counter that has
    /// moved past this slot. The slot is uninitialized afterwards.
    #[inline(always)]
    pub(crate) unsafe fn read(&self, at: Counter) -> T {
        self.slot(at).with(|p| unsafe { (*p).assume_init_read() })
    }

    /// Drops the value in every slot in `[from, to)`.
    ///
    /// # Safety
    ///
    /// Those slots must be initialized and neither side may touch the storage
    /// again.
    pub(crate) unsafe fn drop_range(&mut self, from: Counter, to: Counter) {
        let mut at = from;
        while at != to {
            self.slot(at)
                .with_mut(|p| unsafe { (*p).assume_init_drop() });
            at = self.geometry.advance(at);
        }
    }
}
