//! A fixed-capacity, lock-free single-producer single-consumer ring buffer.
//!
//! [`channel`] allocates the buffer once and returns a [`Producer`] and a
//! [`Consumer`]; no further allocation happens after construction (unless the
//! element type allocates internally). Neither end ever blocks: a full buffer
//! rejects the push and hands the value back, an empty buffer reports `None`,
//! and the caller applies its own backoff (spin, yield, sleep). The capacity
//! must be a power of two, and one slot is reserved to tell empty from full,
//! so a channel of capacity `n` holds at most `n - 1` elements.
//!
//! The handles are `Send` but not `Clone`: exactly one thread can push and
//! exactly one thread can pop, which is the whole synchronization story. Each
//! cursor has a single writer, paired release stores and acquire loads carry
//! the element data between the two threads, and no lock is needed.
//!
//! # Example
//!
//! ```rust
//! const N: usize = 100_000;
//! let (mut tx, mut rx) = rotor::channel::<usize>(16);
//!
//! let producer = std::thread::spawn(move || {
//!     let mut next = 0;
//!     while next < N {
//!         if tx.push(next).is_ok() {
//!             next += 1;
//!         } else {
//!             std::thread::yield_now();
//!         }
//!     }
//! });
//!
//! let consumer = std::thread::spawn(move || {
//!     let mut expected = 0;
//!     while expected < N {
//!         if let Some(value) = rx.pop() {
//!             assert_eq!(value, expected);
//!             expected += 1;
//!         } else {
//!             std::thread::yield_now();
//!         }
//!     }
//! });
//!
//! producer.join().unwrap();
//! consumer.join().unwrap();
//! ```

use std::sync::Arc;

mod consumer;
mod cursor;
mod producer;
mod ring_buffer;

pub use crate::consumer::Consumer;
pub use crate::producer::Producer;

use crate::cursor::Cursor;
use crate::ring_buffer::RingBuffer;

/// The state shared by the two ends of a channel: the slot storage and the
/// two cache-padded cursors.
///
/// The consumer owns `read` for writing, the producer owns `write` for
/// writing, and both sides load the other's cursor. A slot holds a live `T`
/// iff its index lies in `[read, write)` modulo the capacity, so element
/// liveness is fully derived from the cursors.
#[derive(Debug)]
struct Channel<T> {
    buffer: RingBuffer<T>,
    read: Cursor,
    write: Cursor,
}

// SAFETY: `Channel` is shared by exactly two threads through the non-`Clone`
// `Producer` and `Consumer` handles. Each cursor has a single writing thread,
// and slot access follows the publish/acquire protocol documented on
// `RingBuffer`, so no slot is ever written and read concurrently. Elements
// are moved between the threads by value (never borrowed across them), hence
// `T: Send` is the only requirement.
unsafe impl<T: Send> Send for Channel<T> {}
unsafe impl<T: Send> Sync for Channel<T> {}

impl<T> Channel<T> {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: RingBuffer::new(capacity),
            read: Cursor::new(0),
            write: Cursor::new(0),
        }
    }

    /// Advisory element count computed from relaxed cursor snapshots.
    #[inline]
    fn len(&self) -> usize {
        let read = self.read.relaxed();
        let write = self.write.relaxed();
        if write >= read {
            write - read
        } else {
            self.buffer.capacity() - (read - write)
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.read.relaxed() == self.write.relaxed()
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.buffer.next_index(self.write.relaxed()) == self.read.relaxed()
    }

    /// Runs the destructor of every element in the live range `[read, write)`.
    /// The slots are dead afterwards; the cursors are left untouched.
    ///
    /// # Safety
    ///
    /// The caller must have exclusive access to the whole channel: no `push`,
    /// `pop`, or batch call may execute concurrently, and the cursor values
    /// must be current on this thread.
    unsafe fn destroy_live(&self) {
        let mut current = self.read.relaxed();
        let end = self.write.relaxed();

        while current != end {
            // SAFETY: `[read, write)` is exactly the live range, and
            // exclusivity is guaranteed by the caller.
            unsafe { (*self.buffer.slot(current)).assume_init_drop() };
            current = self.buffer.next_index(current);
        }
    }
}

impl<T> Drop for Channel<T> {
    fn drop(&mut self) {
        // SAFETY: `&mut self`: the last handle is gone, nothing runs
        // concurrently.
        unsafe { self.destroy_live() };
    }
}

/// Creates a single-producer single-consumer channel with the given capacity.
///
/// The capacity must be a power of two between 2 and 2^30; one slot is
/// reserved, so at most `capacity - 1` elements can be buffered at once. The
/// slot storage is allocated here and never resized.
///
/// # Panics
///
/// Panics if `capacity` is 0, 1, not a power of two, or larger than 2^30.
pub fn channel<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let channel = Arc::new(Channel::new(capacity));

    (
        Producer::new(Arc::clone(&channel)),
        Consumer::new(channel),
    )
}

/// Destroys every buffered element and resets the channel to empty.
///
/// Requiring `&mut` on both handles is what makes this safe: while both
/// exclusive borrows are held, no `push` or `pop` can be in flight anywhere,
/// so the live elements can be destroyed without racing the transfer paths.
/// Getting both handles to one call site is the caller's quiescence point
/// (shutdown, a phase boundary, a barrier).
///
/// # Panics
///
/// Panics if the two handles do not belong to the same channel.
pub fn clear<T>(producer: &mut Producer<T>, consumer: &mut Consumer<T>) {
    assert!(
        Arc::ptr_eq(producer.shared(), consumer.shared()),
        "handles belong to different channels"
    );

    let channel = &**producer.shared();
    // SAFETY: both exclusive borrows above rule out any concurrent transfer
    // call for the duration of this function.
    unsafe { channel.destroy_live() };
    channel.read.reset();
    channel.write.reset();
}
