//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Buffer pooling for scratch encode/decode space.
//!
//! Every serialize call rents one buffer sized from the codec's capacity
//! estimate, and every compressed decode rents one buffer for the inflated
//! payload. Pooling these keeps steady-state serialization allocation free.
//!
//! # Design
//!
//! - **Size classes**: 256 B to 1 MiB in powers of four; a request is served
//!   from the smallest class that fits.
//! - **Bounded classes**: at most [`MAX_BUFFERS_PER_CLASS`] idle buffers per
//!   class, each class behind its own `parking_lot` mutex.
//! - **Scoped ownership**: [`PooledBuffer`] returns itself on drop, on every
//!   exit path. [`PooledBuffer::into_vec`] moves the allocation out of the
//!   pool for good, so it can never be returned twice.
//!
//! # Example
//!
//! ```rust
//! use lzpack::serialization::buffer_pool::BufferPool;
//!
//! let mut buffer = BufferPool::rent(1024);
//! buffer.extend_from_slice(b"Hello, world!");
//! assert!(buffer.capacity() >= 1024);
//! // returned to the pool here
//! ```

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Largest buffer capacity kept by the pool (1 MiB).
pub const MAX_POOLED_SIZE: usize = 1024 * 1024;

/// Maximum number of idle buffers kept per size class.
pub const MAX_BUFFERS_PER_CLASS: usize = 32;

/// Size classes for buffer pooling.
const SIZE_CLASSES: &[usize] = &[
    256,       // 256 B
    1024,      // 1 KiB
    4096,      // 4 KiB
    16_384,    // 16 KiB
    65_536,    // 64 KiB
    262_144,   // 256 KiB
    1_048_576, // 1 MiB
];

/// A rented buffer that returns to the pool when dropped.
///
/// Derefs to `Vec<u8>`. Contents are not zeroed between rentals; a fresh
/// rental always starts empty (`len() == 0`).
pub struct PooledBuffer {
    buffer: Vec<u8>,
    pooled: bool,
}

impl PooledBuffer {
    /// Returns the capacity of the buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Clears the buffer, removing all contents.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Resizes the buffer to the specified length, filling with zeros if needed.
    pub fn resize(&mut self, new_len: usize) {
        self.buffer.resize(new_len, 0);
    }

    /// Takes the allocation out of the pool permanently.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        BufferPool::instance().detach(self.pooled);
        self.pooled = false;
        std::mem::take(&mut self.buffer)
    }
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl std::fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish()
    }
}

impl From<PooledBuffer> for Vec<u8> {
    fn from(buffer: PooledBuffer) -> Self {
        buffer.into_vec()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if self.pooled {
            BufferPool::instance().return_buffer(std::mem::take(&mut self.buffer));
        }
    }
}

/// Lifetime totals of pool activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolCounters {
    /// Buffers handed out.
    pub rented: u64,
    /// Rentals served from an idle buffer.
    pub reused: u64,
    /// Buffers taken back into a size class.
    pub returned: u64,
    /// Returned buffers dropped because their class was full or they were oversized.
    pub discarded: u64,
    /// Rentals larger than the biggest size class.
    pub oversize: u64,
    /// Buffers moved out of the pool with [`PooledBuffer::into_vec`].
    pub detached: u64,
}

struct BufferPoolInner {
    classes: Vec<Mutex<Vec<Vec<u8>>>>,
    rented: AtomicU64,
    reused: AtomicU64,
    returned: AtomicU64,
    discarded: AtomicU64,
    oversize: AtomicU64,
    detached: AtomicU64,
}

impl BufferPoolInner {
    fn new() -> Self {
        Self {
            classes: SIZE_CLASSES.iter().map(|_| Mutex::new(Vec::new())).collect(),
            rented: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            returned: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            oversize: AtomicU64::new(0),
            detached: AtomicU64::new(0),
        }
    }

    fn rent(&self, min_capacity: usize) -> (Vec<u8>, bool) {
        self.rented.fetch_add(1, Ordering::Relaxed);
        match SIZE_CLASSES.iter().position(|&size| size >= min_capacity) {
            Some(idx) => {
                if let Some(mut buffer) = self.classes[idx].lock().pop() {
                    buffer.clear();
                    self.reused.fetch_add(1, Ordering::Relaxed);
                    return (buffer, true);
                }
                (Vec::with_capacity(SIZE_CLASSES[idx]), true)
            }
            None => {
                self.oversize.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                tracing::trace!(min_capacity, "oversize buffer allocated outside the pool");
                (Vec::with_capacity(min_capacity), false)
            }
        }
    }

    /// Oversize buffers never belonged to the pool and are not counted.
    fn detach(&self, pooled: bool) {
        if pooled {
            self.detached.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn return_buffer(&self, buffer: Vec<u8>) {
        let capacity = buffer.capacity();
        // A buffer belongs to the largest class it can fully serve.
        match SIZE_CLASSES.iter().rposition(|&size| size <= capacity) {
            Some(idx) if capacity <= MAX_POOLED_SIZE => {
                let mut class = self.classes[idx].lock();
                if class.len() < MAX_BUFFERS_PER_CLASS {
                    class.push(buffer);
                    self.returned.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                drop(class);
                #[cfg(feature = "tracing")]
                tracing::trace!(class = SIZE_CLASSES[idx], "size class full, buffer discarded");
                self.discarded.fetch_add(1, Ordering::Relaxed);
            }
            _ => {
                self.discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Global buffer pool.
///
/// A thread-safe singleton; rent and return are linearizable per size class.
pub struct BufferPool;

impl BufferPool {
    fn instance() -> &'static BufferPoolInner {
        static INSTANCE: OnceLock<BufferPoolInner> = OnceLock::new();
        INSTANCE.get_or_init(BufferPoolInner::new)
    }

    /// Rents a buffer with at least `min_capacity` bytes of capacity.
    ///
    /// The buffer may be larger than requested. Rentals above
    /// [`MAX_POOLED_SIZE`] are allocated exactly and never pooled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lzpack::serialization::buffer_pool::BufferPool;
    ///
    /// let buffer = BufferPool::rent(300);
    /// assert!(buffer.is_empty());
    /// assert!(buffer.capacity() >= 300);
    /// ```
    #[must_use]
    pub fn rent(min_capacity: usize) -> PooledBuffer {
        let (buffer, pooled) = Self::instance().rent(min_capacity);
        PooledBuffer { buffer, pooled }
    }

    /// Returns `(size_class, idle_buffers)` for every class.
    #[must_use]
    pub fn stats() -> Vec<(usize, usize)> {
        let pool = Self::instance();
        SIZE_CLASSES
            .iter()
            .zip(pool.classes.iter())
            .map(|(size, class)| (*size, class.lock().len()))
            .collect()
    }

    /// Snapshot of the lifetime counters.
    #[must_use]
    pub fn counters() -> PoolCounters {
        let pool = Self::instance();
        PoolCounters {
            rented: pool.rented.load(Ordering::Relaxed),
            reused: pool.reused.load(Ordering::Relaxed),
            returned: pool.returned.load(Ordering::Relaxed),
            discarded: pool.discarded.load(Ordering::Relaxed),
            oversize: pool.oversize.load(Ordering::Relaxed),
            detached: pool.detached.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_pool_basic() {
        let buffer = BufferPool::rent(1024);
        assert!(buffer.capacity() >= 1024);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_pool_reuse_starts_empty() {
        {
            let mut buffer = BufferPool::rent(4096);
            buffer.extend_from_slice(b"test data");
        }
        let buffer = BufferPool::rent(4096);
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 4096);
    }

    #[test]
    fn test_buffer_pool_size_classes() {
        for &size in SIZE_CLASSES {
            let buffer = BufferPool::rent(size);
            assert!(buffer.capacity() >= size);
        }
    }

    #[test]
    fn test_oversize_rental_is_counted() {
        let before = BufferPool::counters().oversize;
        let buffer = BufferPool::rent(2 * MAX_POOLED_SIZE);
        assert!(buffer.capacity() >= 2 * MAX_POOLED_SIZE);
        assert!(BufferPool::counters().oversize > before);
    }

    #[test]
    fn test_into_vec_detaches() {
        let before = BufferPool::counters().detached;
        let mut buffer = BufferPool::rent(256);
        buffer.extend_from_slice(b"owned");
        let owned = buffer.into_vec();
        assert_eq!(owned, b"owned");
        assert!(BufferPool::counters().detached > before);
    }

    #[test]
    fn test_detach_counts_only_pooled_buffers() {
        let oversize = BufferPool::rent(2 * MAX_POOLED_SIZE);
        assert!(!oversize.pooled);
        assert!(BufferPool::rent(256).pooled);

        let pool = BufferPoolInner::new();
        pool.detach(false);
        assert_eq!(pool.detached.load(Ordering::Relaxed), 0);
        pool.detach(true);
        assert_eq!(pool.detached.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_grown_buffer_returns_to_fitting_class() {
        let mut buffer = BufferPool::rent(256);
        buffer.resize(5000);
        let capacity = buffer.capacity();
        drop(buffer);
        let idx = SIZE_CLASSES.iter().rposition(|&s| s <= capacity).unwrap();
        let rented = BufferPool::rent(SIZE_CLASSES[idx]);
        assert!(rented.capacity() >= SIZE_CLASSES[idx]);
    }

    #[test]
    fn test_buffer_pool_stats() {
        for _ in 0..MAX_BUFFERS_PER_CLASS + 10 {
            let _ = BufferPool::rent(1024);
        }
        let stats = BufferPool::stats();
        assert_eq!(stats.len(), SIZE_CLASSES.len());
        for (_, idle) in stats {
            assert!(idle <= MAX_BUFFERS_PER_CLASS);
        }
    }

    #[test]
    fn test_buffer_pool_concurrent() {
        use std::thread;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                thread::spawn(|| {
                    for i in 0..100 {
                        let mut buffer = BufferPool::rent(1024);
                        buffer.extend_from_slice(&[i as u8; 16]);
                        assert_eq!(buffer.len(), 16);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = BufferPool::stats();
        let total_buffers: usize = stats.iter().map(|(_, count)| count).sum();
        assert!(total_buffers > 0);
    }
}
