use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A cache-padded atomic index into the ring buffer.
///
/// Each cursor has exactly one writing thread; the padding keeps the two
/// cursors (and the slot array) on separate cache lines so that the producer
/// and consumer do not invalidate each other's lines on every advance.
#[derive(Debug, Default)]
pub(crate) struct Cursor {
    value: CachePadded<AtomicUsize>,
}

impl Cursor {
    pub(crate) fn new(val: usize) -> Self {
        Self {
            value: CachePadded::new(AtomicUsize::new(val)),
        }
    }

    /// Load without cross-thread ordering. Sufficient when a thread reads back
    /// a cursor only it ever writes, or when the result is an advisory snapshot.
    #[inline]
    pub(crate) fn relaxed(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }

    /// Load that observes everything the owning thread published before its
    /// last `publish` of this cursor.
    #[inline]
    pub(crate) fn acquire(&self) -> usize {
        self.value.load(Ordering::Acquire)
    }

    /// Release-store a new position. Slot writes (or slot vacations) performed
    /// before this call are visible to any thread that `acquire`-loads the
    /// stored value.
    #[inline]
    pub(crate) fn publish(&self, val: usize) {
        self.value.store(val, Ordering::Release)
    }

    /// Relaxed store back to zero. Only valid under exclusive access to the
    /// whole channel.
    #[inline]
    pub(crate) fn reset(&self) {
        self.value.store(0, Ordering::Relaxed)
    }
}
