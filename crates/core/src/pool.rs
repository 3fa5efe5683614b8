//! Bounded pool of reusable scratch objects
//!
//! Codecs borrow a scratch buffer for the duration of one read or write
//! and hand it back afterwards. `clear()` keeps the allocated capacity, so
//! after warmup the hot path does not allocate for scratch space.
//!
//! The pool holds at most `capacity` idle objects; anything released into
//! a full pool is dropped. Acquiring from an empty pool allocates.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// Objects that can be returned to a clean state for reuse
pub trait Reset {
    /// Clear all content, keeping allocated capacity where possible
    fn reset(&mut self);
}

impl Reset for String {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T> Reset for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// Thread-safe bounded object pool
pub struct Pool<T: Reset> {
    idle: Mutex<Vec<T>>,
    capacity: usize,
    factory: fn() -> T,
}

impl<T: Reset> Pool<T> {
    /// Create a pool keeping at most `capacity` idle objects
    pub fn new(capacity: usize, factory: fn() -> T) -> Self {
        Pool {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            factory,
        }
    }

    /// Borrow an object, reusing an idle one when available
    ///
    /// The object goes back to the pool, reset, when the guard drops.
    pub fn acquire(&self) -> PoolGuard<'_, T> {
        let item = self.idle.lock().pop().unwrap_or_else(self.factory);
        PoolGuard {
            pool: self,
            item: Some(item),
        }
    }

    fn release(&self, mut item: T) {
        item.reset();
        let mut idle = self.idle.lock();
        if idle.len() < self.capacity {
            idle.push(item);
        }
    }

    /// Number of idle objects currently held
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Maximum number of idle objects kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Scoped loan of a pooled object
pub struct PoolGuard<'a, T: Reset> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

impl<T: Reset> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Only taken in drop
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled object accessed after release"),
        }
    }
}

impl<T: Reset> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled object accessed after release"),
        }
    }
}

impl<T: Reset> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}
