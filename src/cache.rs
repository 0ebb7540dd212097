//! Compute-once slot with explicit invalidation. Backs the settings groups and the greeter resolution.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Holds at most one computed value. Reads take a shared lock; the first computation is serialized
/// so concurrent callers never run the initializer twice. Failed computations are not stored.
pub struct Cached<T> {
    slot: RwLock<Option<Arc<T>>>,
    init: Mutex<()>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Cached {
            slot: RwLock::new(None),
            init: Mutex::new(()),
        }
    }

    /// Current value without computing it.
    pub fn peek(&self) -> Option<Arc<T>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get_or_try_init<E, F>(&self, f: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.peek() {
            return Ok(value);
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.peek() {
            return Ok(value);
        }
        let value = Arc::new(f()?);
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(value.clone());
        Ok(value)
    }

    /// Drops the cached value; the next access recomputes.
    pub fn invalidate(&self) -> Option<Arc<T>> {
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
