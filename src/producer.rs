//! Defines the `Producer` end of a `rotor` channel, responsible for writing
//! values into the shared ring buffer.
//!
//! `Producer` never blocks: when the buffer is full, the value is handed back
//! immediately and the caller decides how to back off (spin, yield, sleep).
//! There is exactly one `Producer` per channel; it is `Send` but not `Clone`,
//! which is what makes the single-writer protocol on the write cursor sound.

use crate::Channel;
use std::sync::Arc;

/// The writing end of a `rotor` channel.
///
/// `Producer` owns the write cursor: it is the only party that ever stores to
/// it. All methods take `&mut self`, so writes from this end are strictly
/// ordered even if the handle is shared behind a lock.
#[derive(Debug)]
pub struct Producer<T> {
    channel: Arc<Channel<T>>,
}

impl<T> Producer<T> {
    /// Creates a new `Producer` instance. For internal `rotor` use only.
    pub(crate) fn new(channel: Arc<Channel<T>>) -> Self {
        Self { channel }
    }

    pub(crate) fn shared(&self) -> &Arc<Channel<T>> {
        &self.channel
    }

    /// Attempts to push a value into the channel.
    ///
    /// The value is constructed in place in the next free slot and then
    /// published to the consumer with release ordering, so by the time the
    /// consumer observes the new write cursor the element is fully written.
    ///
    /// # Returns
    ///
    /// * `Ok(())`: the value was enqueued.
    /// * `Err(value)`: the buffer is full; ownership of the value is handed
    ///   back to the caller, which may retry after backing off. Nothing is
    ///   mutated in this case.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        let channel = &*self.channel;
        let write = channel.write.relaxed();
        let next = channel.buffer.next_index(write);

        if next == channel.read.acquire() {
            // Buffer is full
            return Err(value);
        }

        // SAFETY: the full check above proves the slot at `write` is outside
        // the live range, and this thread is the only writer of slots.
        unsafe {
            (*channel.buffer.slot(write)).write(value);
        }
        channel.write.publish(next);
        Ok(())
    }

    /// Attempts to push clones of up to `values.len()` elements, in order.
    ///
    /// This is a best-effort partial operation: it stops as soon as the buffer
    /// would become full and returns how many elements were actually written.
    /// Elements past the stop point are untouched. The write cursor is
    /// published exactly once at the end, not once per element; the consumer
    /// never observes the intermediate positions, so the single release store
    /// is enough to cover the whole batch.
    ///
    /// # Returns
    ///
    /// The number of elements written, in `0..=values.len()`. Callers must
    /// handle short writes.
    pub fn push_slice(&mut self, values: &[T]) -> usize
    where
        T: Clone,
    {
        let channel = &*self.channel;
        let mut write = channel.write.relaxed();
        let mut written = 0;

        while written < values.len() {
            let next = channel.buffer.next_index(write);
            if next == channel.read.acquire() {
                // Buffer is full
                break;
            }

            // SAFETY: same argument as `push`; `write` tracks the claimed
            // positions locally and each one passed the full check above.
            unsafe {
                (*channel.buffer.slot(write)).write(values[written].clone());
            }
            write = next;
            written += 1;
        }

        if written > 0 {
            channel.write.publish(write);
        }
        written
    }

    /// Returns the number of elements currently buffered.
    ///
    /// This is an advisory snapshot: the consumer may be draining
    /// concurrently, so the value can be stale by the time it is read. Never
    /// use it as a precondition for `push`; rely on `push`'s own return
    /// value instead.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Returns `true` if the channel currently holds no elements.
    /// Advisory snapshot, same caveat as [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Returns `true` if the channel currently has no free slot.
    /// Advisory snapshot, same caveat as [`len`](Self::len).
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    /// Returns the declared capacity of the channel. One slot is reserved to
    /// distinguish empty from full, so at most `capacity() - 1` elements can
    /// be buffered at once.
    pub fn capacity(&self) -> usize {
        self.channel.buffer.capacity()
    }
}

#[cfg(test)]
mod tests {
    use crate::channel;

    #[test]
    fn test_push_until_full() {
        let (mut tx, _rx) = channel::<u32>(4);

        // 1. Usable capacity is 3: the first three pushes succeed
        assert_eq!(tx.push(1), Ok(()));
        assert_eq!(tx.push(2), Ok(()));
        assert_eq!(tx.push(3), Ok(()));

        // 2. The fourth push fails and hands the value back
        assert_eq!(tx.push(4), Err(4));
        assert_eq!(tx.len(), 3);
    }

    #[test]
    fn test_full_and_empty_flags() {
        let (mut tx, _rx) = channel::<u32>(4);

        assert!(tx.is_empty());
        assert!(!tx.is_full());

        for i in 0..3 {
            tx.push(i).unwrap();
        }

        assert!(!tx.is_empty());
        assert!(tx.is_full());
    }

    #[test]
    fn test_push_slice_partial_write() {
        let (mut tx, _rx) = channel::<u32>(8);

        // 7 free slots, 10 candidates: exactly 7 go in
        let values: Vec<u32> = (0..10).collect();
        assert_eq!(tx.push_slice(&values), 7);
        assert_eq!(tx.len(), 7);

        // A full buffer accepts nothing
        assert_eq!(tx.push_slice(&values), 0);
    }

    #[test]
    fn test_push_slice_empty_source() {
        let (mut tx, _rx) = channel::<u32>(8);
        assert_eq!(tx.push_slice(&[]), 0);
        assert!(tx.is_empty());
    }

    #[test]
    fn test_capacity_is_exact_and_stable() {
        let (tx, _rx) = channel::<u32>(16);
        assert_eq!(tx.capacity(), 16);
    }
}
