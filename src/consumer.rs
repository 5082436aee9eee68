//! Defines the `Consumer` end of a `rotor` channel, responsible for moving
//! values out of the shared ring buffer.
//!
//! `Consumer` never blocks: when the buffer is empty it reports so immediately
//! and the caller decides how to back off. There is exactly one `Consumer`
//! per channel; it is `Send` but not `Clone`, which is what makes the
//! single-writer protocol on the read cursor sound.

use crate::Channel;
use std::sync::Arc;

/// The reading end of a `rotor` channel.
///
/// `Consumer` owns the read cursor: it is the only party that ever stores to
/// it. All methods take `&mut self`, so reads from this end are strictly
/// ordered even if the handle is shared behind a lock.
#[derive(Debug)]
pub struct Consumer<T> {
    channel: Arc<Channel<T>>,
}

impl<T> Consumer<T> {
    /// Creates a new `Consumer` instance. For internal `rotor` use only.
    pub(crate) fn new(channel: Arc<Channel<T>>) -> Self {
        Self { channel }
    }

    pub(crate) fn shared(&self) -> &Arc<Channel<T>> {
        &self.channel
    }

    /// Attempts to pop the oldest value from the channel.
    ///
    /// The empty check acquire-loads the write cursor, so a slot is only read
    /// after the producer's in-place construction of it is visible. The value
    /// is moved out of the slot (the slot is dead afterwards) and only then is
    /// the read cursor published with release ordering, so the producer sees
    /// the freed slot strictly after it has been vacated.
    ///
    /// # Returns
    ///
    /// * `Some(value)`: the oldest buffered value.
    /// * `None`: the buffer is empty; the caller may retry after backing off.
    pub fn pop(&mut self) -> Option<T> {
        let channel = &*self.channel;
        let read = channel.read.relaxed();

        if read == channel.write.acquire() {
            // Buffer is empty
            return None;
        }

        // SAFETY: the empty check above proves the slot at `read` is inside
        // the live range, and the acquire load makes its contents visible.
        // Moving the value out uniquely vacates the slot before the cursor
        // advance below lets the producer reuse it.
        let value = unsafe { (*channel.buffer.slot(read)).assume_init_read() };
        channel.read.publish(channel.buffer.next_index(read));
        Some(value)
    }

    /// Attempts to pop up to `dst.len()` values into `dst`, in FIFO order.
    ///
    /// This is a best-effort partial operation: it stops at the first empty
    /// check and returns how many elements were actually moved. `dst[..n]`
    /// receives the values (the previous contents drop normally); the rest of
    /// `dst` is untouched. The read cursor is published exactly once at the
    /// end. The producer never observes the intermediate positions, so the
    /// single release store frees the whole batch at once.
    ///
    /// # Returns
    ///
    /// The number of elements read, in `0..=dst.len()`. Callers must handle
    /// short reads.
    pub fn pop_slice(&mut self, dst: &mut [T]) -> usize {
        let channel = &*self.channel;
        let mut read = channel.read.relaxed();
        let mut count = 0;

        while count < dst.len() {
            if read == channel.write.acquire() {
                // Buffer is empty
                break;
            }

            // SAFETY: same argument as `pop`; `read` tracks the drained
            // positions locally and each one passed the empty check above.
            dst[count] = unsafe { (*channel.buffer.slot(read)).assume_init_read() };
            read = channel.buffer.next_index(read);
            count += 1;
        }

        if count > 0 {
            channel.read.publish(read);
        }
        count
    }

    /// Returns the number of elements currently buffered.
    ///
    /// This is an advisory snapshot: the producer may be filling concurrently,
    /// so the value can be stale by the time it is read. Never use it as a
    /// precondition for `pop`; rely on `pop`'s own return value instead.
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
