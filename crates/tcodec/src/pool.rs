use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::iter::JsonIter;
use crate::DEFAULT_POOL_CAPACITY;

/// Pool of reusable scratch readers.
///
/// Borrowing hands out a [`PooledIter`] guard; the reader goes back to the
/// pool when the guard is dropped, so every exit path releases it.
#[derive(Debug)]
pub struct IterPool {
    idle: Mutex<Vec<JsonIter>>,
    max_idle: usize,
    borrowed: AtomicUsize,
}

impl IterPool {
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
            borrowed: AtomicUsize::new(0),
        }
    }

    /// Borrow a reader loaded with `raw`.
    pub fn borrow_iter(&self, raw: &[u8]) -> PooledIter<'_> {
        let mut iter = self.idle.lock().pop().unwrap_or_default();
        iter.reset_bytes(raw);
        self.borrowed.fetch_add(1, Ordering::Relaxed);
        PooledIter { iter, pool: self }
    }

    /// Readers currently checked out.
    pub fn borrowed(&self) -> usize {
        self.borrowed.load(Ordering::Relaxed)
    }

    /// Readers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    fn give_back(&self, mut iter: JsonIter) {
        self.borrowed.fetch_sub(1, Ordering::Relaxed);
        iter.clear();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(iter);
        }
    }
}

impl Default for IterPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

/// Process-wide pool used when no explicit pool is configured.
pub fn shared_pool() -> Arc<IterPool> {
    static POOL: OnceLock<Arc<IterPool>> = OnceLock::new();
    Arc::clone(POOL.get_or_init(|| Arc::new(IterPool::default())))
}

/// A reader borrowed from an [`IterPool`].
#[derive(Debug)]
pub struct PooledIter<'p> {
    iter: JsonIter,
    pool: &'p IterPool,
}

impl Deref for PooledIter<'_> {
    type Target = JsonIter;

    fn deref(&self) -> &JsonIter {
        &self.iter
    }
}

impl DerefMut for PooledIter<'_> {
    fn deref_mut(&mut self) -> &mut JsonIter {
        &mut self.iter
    }
}

impl Drop for PooledIter<'_> {
    fn drop(&mut self) {
        let iter = std::mem::take(&mut self.iter);
        self.pool.give_back(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrow_and_release() {
        let pool = IterPool::new(4);
        {
            let mut a = pool.borrow_iter(b"1");
            let _b = pool.borrow_iter(b"2");
            assert_eq!(pool.borrowed(), 2);
            assert_eq!(a.read().unwrap(), serde_json::json!(1));
        }
        assert_eq!(pool.borrowed(), 0);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_reuse_starts_from_new_bytes() {
        let pool = IterPool::new(1);
        {
            let mut it = pool.borrow_iter(br#""leftover""#);
            it.skip().unwrap();
        }
        let mut it = pool.borrow_iter(b"7");
        assert_eq!(it.read().unwrap(), serde_json::json!(7));
    }

    #[test]
    fn test_idle_is_bounded() {
        let pool = IterPool::new(1);
        {
            let _a = pool.borrow_iter(b"1");
            let _b = pool.borrow_iter(b"2");
            let _c = pool.borrow_iter(b"3");
        }
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.borrowed(), 0);
    }

    #[test]
    fn test_release_on_panic_unwind() {
        let pool = IterPool::new(2);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _it = pool.borrow_iter(b"null");
            panic!("decoder blew up");
        }));
        assert!(result.is_err());
        assert_eq!(pool.borrowed(), 0);
    }
}
