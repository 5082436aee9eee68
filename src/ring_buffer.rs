//! Defines `RingBuffer`, the fixed slot storage underlying a `rotor` channel.
//!
//! `RingBuffer` is a fixed-size array of uninitialized slots together with the
//! masking index arithmetic that maps a cursor position onto a slot. It holds
//! no cursors and performs no synchronization of its own.
//!
//! All safety relies on the external atomic cursors: the producer only writes
//! a slot it has verified to be free, and the consumer only reads a slot after
//! the producer has published it.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;

/// Upper bound on the slot count. Keeps the allocation size sane and leaves
/// masked index arithmetic far away from any overflow.
pub(crate) const MAX_CAPACITY: usize = 1 << 30;

/// A fixed array of maybe-uninitialized slots for element storage.
///
/// A slot holds a live `E` if and only if its index lies in the half-open
/// cursor range `[read, write)` modulo the capacity; there is no per-slot
/// liveness flag. `UnsafeCell` provides the interior mutability through which
/// both sides touch their respective slots.
///
/// # Safety
///
/// Raw slot access is only sound under the channel's cursor protocol:
///
/// 1. **Single writer per slot**: the producer writes a slot only while it is
///    outside the live range, and the consumer vacates a slot only while it is
///    inside the live range. The cursors never let both happen at once.
/// 2. **Publication before access**: the consumer reads a slot only after
///    observing (acquire) the producer's release of the write cursor covering
///    it, and the producer reuses a slot only after observing the consumer's
///    release of the read cursor past it.
///
/// In short, the safety of `RingBuffer` depends on the correct implementation
/// of `Producer` and `Consumer`.
pub(crate) struct RingBuffer<E> {
    /// The slot array. Slots outside the live cursor range are uninitialized.
    slots: Box<[UnsafeCell<MaybeUninit<E>>]>,

    /// A mask used to map a cursor position to an array index.
    /// Its value is `capacity - 1`.
    index_mask: usize,
}

impl<E> RingBuffer<E> {
    /// Creates a new `RingBuffer` with `capacity` uninitialized slots.
    ///
    /// The capacity must be a power of two so that masking can replace the
    /// modulo in the index arithmetic. One slot is sacrificed to distinguish
    /// "empty" from "full", so the buffer can hold at most `capacity - 1`
    /// elements and a capacity below 2 would be unable to hold anything.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is less than 2, not a power of two, or larger
    /// than `MAX_CAPACITY`.
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "capacity must be at least 2");
        assert!(capacity.is_power_of_two(), "capacity must be a power of 2");
        assert!(
            capacity <= MAX_CAPACITY,
            "capacity must not exceed 2^30 slots"
        );

        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            index_mask: capacity - 1,
        }
    }

    /// Gets a raw pointer to the slot for a cursor position.
    ///
    /// Calling this method is safe, but dereferencing the returned pointer is
    /// `unsafe` and must respect the protocol documented on the type:
    /// writing requires the slot to be outside the live range and owned by the
    /// producer; reading requires the slot's publication to be visible to the
    /// calling thread.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> *mut MaybeUninit<E> {
        // SAFETY: `index_mask` keeps the masked index within `slots`.
        unsafe { self.slots.get_unchecked(index & self.index_mask).get() }
    }

    /// Advances a cursor position by one, wrapping at the capacity.
    #[inline]
    pub(crate) fn next_index(&self, index: usize) -> usize {
        (index + 1) & self.index_mask
    }

    /// Returns the total slot count.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<E> fmt::Debug for RingBuffer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.slots.len())
            .field("index_mask", &self.index_mask)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_creation_and_capacity() {
        // Verify capacity must be a power of two
        RingBuffer::<u32>::new(4);
        RingBuffer::<u32>::new(16);
        RingBuffer::<u32>::new(1024);

        // Verify capacity() returns the declared value
        let rb = RingBuffer::<u32>::new(8);
        assert_eq!(rb.capacity(), 8);

        // Verify minimum capacity is 2
        RingBuffer::<u32>::new(2);
    }

    #[test]
    #[should_panic(expected = "capacity must be a power of 2")]
    fn test_ring_buffer_invalid_capacity_not_power_of_two() {
        RingBuffer::<u32>::new(3);
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 2")]
    fn test_ring_buffer_invalid_capacity_too_small() {
        RingBuffer::<u32>::new(1);
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 2")]
    fn test_ring_buffer_invalid_capacity_zero() {
        RingBuffer::<u32>::new(0);
    }

    #[test]
    #[should_panic(expected = "capacity must not exceed 2^30 slots")]
    fn test_ring_buffer_invalid_capacity_too_large() {
        RingBuffer::<u32>::new(1 << 31);
    }

    #[test]
    fn test_ring_buffer_indexing_logic() {
        // Capacity of 4
        let rb = RingBuffer::<u32>::new(4);
        assert_eq!(rb.index_mask, 3);

        // Positions advance 0 -> 1 -> 2 -> 3 -> 0
        assert_eq!(rb.next_index(0), 1);
        assert_eq!(rb.next_index(2), 3);
        assert_eq!(rb.next_index(3), 0);

        // Slot lookup masks the position, so position 4 aliases slot 0
        assert_eq!(rb.slot(4), rb.slot(0));
        assert_eq!(rb.slot(7), rb.slot(3));
    }

    #[test]
    fn test_ring_buffer_write_and_read() {
        let rb = RingBuffer::<u32>::new(4);

        // Write slots 0..4 in place
        unsafe {
            (*rb.slot(0)).write(10);
            (*rb.slot(1)).write(20);
            (*rb.slot(2)).write(30);
            (*rb.slot(3)).write(40);
        }

        // Move the values back out
        unsafe {
            assert_eq!((*rb.slot(0)).assume_init_read(), 10);
            assert_eq!((*rb.slot(1)).assume_init_read(), 20);
            assert_eq!((*rb.slot(2)).assume_init_read(), 30);
            assert_eq!((*rb.slot(3)).assume_init_read(), 40);
        }
    }

    #[test]
    fn test_ring_buffer_slot_reuse_after_wrap() {
        let rb = RingBuffer::<String>::new(4);

        unsafe {
            (*rb.slot(0)).write(String::from("first"));
            assert_eq!((*rb.slot(0)).assume_init_read(), "first");

            // Position 4 aliases slot 0; the slot is vacant again after the
            // move-out above, so a fresh write is fine.
            (*rb.slot(4)).write(String::from("second"));
            assert_eq!((*rb.slot(0)).assume_init_read(), "second");
        }
    }
}
