use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// Initial capacity of a freshly created buffer. Enough for a typical line.
pub const DEFAULT_BUFFER_CAPACITY: usize = 512;

/// Buffers that grew beyond this are freed on return instead of pooled, so
/// one huge record does not pin its memory for the life of the logger.
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Upper bound on idle buffers kept in the free list.
pub const MAX_IDLE_BUFFERS: usize = 256;

/// Free list of reusable render buffers.
///
/// Each log call checks out one buffer, renders its record into it and hands
/// the bytes to the sink. The buffer goes back to the free list when the
/// [`PooledBuffer`] guard drops, which also happens while unwinding, so a
/// panicking sink or `Display` impl cannot leak it. Once every concurrent
/// caller has had a buffer, checkout and return perform no allocation.
///
/// The free-list lock is held only for a single `pop` or `push`; a buffer
/// is never reachable from the list while it is checked out.
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    buffer_capacity: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

impl BufferPool {
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(MAX_IDLE_BUFFERS)),
            buffer_capacity,
        }
    }

    /// Takes an empty buffer from the free list, or creates one.
    pub fn checkout(&self) -> PooledBuffer<'_> {
        let buf = self
            .free
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.buffer_capacity));
        PooledBuffer { buf, pool: self }
    }

    /// Number of idle buffers currently pooled.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_IDLE_BUFFERS {
            free.push(buf);
        }
    }
}

/// A buffer checked out of a [`BufferPool`]. Returned to the pool on drop.
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}
