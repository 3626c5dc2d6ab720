//! Reusable scratch buffers for hot-path accumulators.
//!
//! The pool is an optional performance aid: it is passed explicitly to the code
//! that wants it, and every buffer handed out is zeroed, so results never
//! depend on whether a pool is present or on what it previously held.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of idle buffers a pool keeps.
pub const DEFAULT_POOL_CAPACITY: usize = 32;

#[derive(Default)]
struct Buckets {
    /// length -> idle buffers of exactly that length
    by_len: HashMap<usize, Vec<Vec<f64>>>,
    idle: usize,
}

/// Thread-safe pool of `f64` scratch arrays keyed by length.
///
/// # Performance
///
/// - Acquire: O(len) (the buffer is zeroed)
/// - Release: O(1), on drop of the [`ScratchBuffer`]
///
/// At most `capacity` idle buffers are retained; extra releases are dropped.
pub struct ScratchPool {
    buckets: Mutex<Buckets>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ScratchPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            buckets: Mutex::new(Buckets::default()),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Zeroed buffer of `len` elements, returned to the pool when dropped.
    pub fn acquire(&self, len: usize) -> ScratchBuffer<'_> {
        let reused = {
            let mut buckets = self.buckets.lock();
            let buf = buckets.by_len.get_mut(&len).and_then(Vec::pop);
            if buf.is_some() {
                buckets.idle -= 1;
            }
            buf
        };

        let buf = match reused {
            Some(mut buf) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                buf.fill(0.0);
                buf
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                vec![0.0; len]
            }
        };

        ScratchBuffer {
            pool: Some(self),
            buf,
        }
    }

    /// Idle buffers currently retained.
    pub fn idle(&self) -> usize {
        self.buckets.lock().idle
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// (reused, freshly allocated) acquisition counts.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    fn release(&self, buf: Vec<f64>) {
        let mut buckets = self.buckets.lock();
        if buckets.idle >= self.capacity {
            tracing::trace!(len = buf.len(), capacity = self.capacity, "scratch pool full, dropping buffer");
            return;
        }
        buckets.idle += 1;
        buckets.by_len.entry(buf.len()).or_default().push(buf);
    }
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl std::fmt::Debug for ScratchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchPool")
            .field("capacity", &self.capacity)
            .field("idle", &self.idle())
            .finish()
    }
}

/// A zeroed scratch array, pooled or standalone.
pub struct ScratchBuffer<'a> {
    pool: Option<&'a ScratchPool>,
    buf: Vec<f64>,
}

impl ScratchBuffer<'static> {
    /// Plain allocation, for callers running without a pool.
    pub fn unpooled(len: usize) -> Self {
        Self {
            pool: None,
            buf: vec![0.0; len],
        }
    }
}

impl<'a> ScratchBuffer<'a> {
    /// Take from `pool` when one is supplied, otherwise allocate.
    pub fn acquire(pool: Option<&'a ScratchPool>, len: usize) -> Self {
        match pool {
            Some(pool) => pool.acquire(len),
            None => Self {
                pool: None,
                buf: vec![0.0; len],
            },
        }
    }
}

impl Deref for ScratchBuffer<'_> {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.buf
    }
}

impl DerefMut for ScratchBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.buf
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.release(std::mem::take(&mut self.buf));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_buffers_are_zeroed_and_reused() {
        let pool = ScratchPool::new(4);
        {
            let mut buf = pool.acquire(8);
            assert!(buf.iter().all(|&x| x == 0.0));
            buf[3] = 42.0;
        }
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire(8);
        assert!(buf.iter().all(|&x| x == 0.0));
        assert_eq!(pool.stats(), (1, 1));
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_different_lengths_do_not_mix() {
        let pool = ScratchPool::new(4);
        drop(pool.acquire(8));
        let buf = pool.acquire(16);
        assert_eq!(buf.len(), 16);
        assert_eq!(pool.stats(), (0, 2));
    }

    #[test]
    fn test_capacity_is_capped() {
        let pool = ScratchPool::new(2);
        let bufs: Vec<_> = (0..5).map(|_| pool.acquire(4)).collect();
        drop(bufs);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_unpooled() {
        let mut buf = ScratchBuffer::acquire(None, 3);
        buf[0] = 1.0;
        assert_eq!(&*buf, &[1.0, 0.0, 0.0]);
        assert_eq!(ScratchBuffer::unpooled(2).len(), 2);
    }

    #[test]
    fn test_concurrent_access() {
        let pool = Arc::new(ScratchPool::new(8));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let mut buf = pool.acquire(16);
                        assert!(buf.iter().all(|&x| x == 0.0));
                        buf[i] = i as f64;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(pool.idle() <= 8);
        let (hits, misses) = pool.stats();
        assert_eq!(hits + misses, 800);
    }
}
