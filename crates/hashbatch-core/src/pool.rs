//! Bounded object pools with RAII release.
//!
//! A [`Pool`] keeps at most `capacity` idle entries behind a short-held
//! mutex. [`Pool::acquire`] never waits for an entry to come back: on a miss
//! it allocates a fresh one through the pool's factory. [`Pool::release`]
//! recycles the entry and keeps it only while the pool is below capacity;
//! anything beyond that is dropped.
//!
//! Entries are handed out wrapped in [`Pooled`], which releases on drop. This
//! covers early returns, `?` propagation, unwinding and cancelled futures
//! alike, so callers never release by hand.
//!
//! # Examples
//!
//! ```
//! use hashbatch_core::pool::Pool;
//!
//! let pool = Pool::prefilled(2, || Vec::<u8>::with_capacity(1024));
//! {
//!     let mut buf = pool.acquire();
//!     buf.extend_from_slice(b"payload");
//! }
//! let buf = pool.acquire();
//! assert!(buf.is_empty());
//! assert!(buf.capacity() >= 1024);
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use hashbatch_model::PoolStats;

/// A value that can be reset to a logically empty state for reuse.
///
/// Implementations must keep allocated capacity; discarding it would defeat
/// the point of pooling.
pub trait Recycle {
    /// Reset to an empty state, keeping capacity.
    fn recycle(&mut self);
}

impl<T> Recycle for Vec<T> {
    fn recycle(&mut self) {
        self.clear();
    }
}

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Bounded, thread-safe free list of reusable values.
pub struct Pool<T: Recycle> {
    idle: Mutex<Vec<T>>,
    capacity: usize,
    factory: Factory<T>,
    hits: AtomicU64,
    misses: AtomicU64,
    returns: AtomicU64,
    drops: AtomicU64,
}

impl<T: Recycle> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity)
            .field("idle", &self.idle.lock().len())
            .finish_non_exhaustive()
    }
}

impl<T: Recycle> Pool<T> {
    /// Create an empty pool that retains at most `capacity` idle values.
    pub fn new(capacity: usize, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            factory: Box::new(factory),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
        }
    }

    /// Create a pool already holding `capacity` fresh values.
    pub fn prefilled(capacity: usize, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        let pool = Self::new(capacity, factory);
        {
            let mut idle = pool.idle.lock();
            idle.extend((0..capacity).map(|_| (pool.factory)()));
        }
        pool
    }

    /// Take an idle value, or allocate a new one if none is available.
    ///
    /// Never blocks waiting for a release.
    #[must_use]
    pub fn acquire(&self) -> Pooled<'_, T> {
        let reused = self.idle.lock().pop();
        let value = if let Some(value) = reused {
            self.hits.fetch_add(1, Ordering::Relaxed);
            value
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            (self.factory)()
        };
        Pooled {
            pool: self,
            value: Some(value),
        }
    }

    /// Recycle `value` and return it to the pool, dropping it if the pool is full.
    pub fn release(&self, mut value: T) {
        value.recycle();
        let rejected = {
            let mut idle = self.idle.lock();
            if idle.len() < self.capacity {
                idle.push(value);
                None
            } else {
                Some(value)
            }
        };
        if rejected.is_some() {
            self.drops.fetch_add(1, Ordering::Relaxed);
        } else {
            self.returns.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Maximum number of idle values retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values currently idle.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Snapshot of the pool counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.idle(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

/// A value borrowed from a [`Pool`], released back to it on drop.
pub struct Pooled<'a, T: Recycle> {
    pool: &'a Pool<T>,
    value: Option<T>,
}

impl<T: Recycle + fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&self.value).finish()
    }
}

impl<T: Recycle> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("pooled value is present until drop")
    }
}

impl<T: Recycle> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("pooled value is present until drop")
    }
}

impl<T: Recycle> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.release(value);
        }
    }
}
