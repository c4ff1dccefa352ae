//! Per-theme memoization.
//!
//! [`ThemeCache`] stores one computed value per live theme. Entries hold the
//! theme weakly, so dropping a theme lets its entries be pruned, and the
//! cache itself lives inside the definition (or token set) it memoizes, so
//! dropping that owner drops the cache with it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::theme::{Theme, ThemeData};

struct CacheEntry<T> {
    theme: Weak<ThemeData>,
    value: Arc<T>,
}

pub(crate) struct ThemeCache<T> {
    entries: Mutex<HashMap<usize, CacheEntry<T>>>,
}

impl<T> ThemeCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `theme`, if one was computed.
    pub(crate) fn get(&self, theme: &Theme) -> Option<Arc<T>> {
        let entries = self.lock();
        let entry = entries.get(&theme.id())?;
        // A weak reference pins the allocation, so a matching live pointer is the same theme.
        if entry.theme.strong_count() == 0 {
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    /// Returns the cached value for `theme`, computing it on a miss.
    ///
    /// `compute` runs without the lock held. If two callers race on the same
    /// theme, the first insert wins and both observe the same value.
    pub(crate) fn get_or_try_insert_with<E>(
        &self,
        theme: &Theme,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(value) = self.get(theme) {
            return Ok(value);
        }

        let value = Arc::new(compute()?);
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.theme.strong_count() > 0);
        let entry = entries.entry(theme.id()).or_insert_with(|| CacheEntry {
            theme: theme.downgrade(),
            value,
        });
        Ok(Arc::clone(&entry.value))
    }

    /// Number of entries whose theme is still alive.
    pub(crate) fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| entry.theme.strong_count() > 0)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<usize, CacheEntry<T>>> {
        // Writes are idempotent, so a panic mid-resolution cannot leave a bad entry behind.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for ThemeCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ThemeCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeCache")
            .field("live_entries", &self.len())
            .finish()
    }
}
