use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

type Entries = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Per-key critical sections plus a store-wide gate.
///
/// `lock(key)` holds the gate shared and the key's mutex exclusively, so writers
/// on different keys run in parallel while writers on the same key queue up.
/// `lock_all()` holds the gate exclusively and waits out every key holder.
///
/// Entries are created on demand and dropped once no guard or waiter refers
/// to them.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    gate: Arc<RwLock<()>>,
    entries: Entries,
}

/// Guard for a single key; releases the key (and prunes it) on drop.
#[derive(Debug)]
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    _gate: OwnedRwLockReadGuard<()>,
    entries: Entries,
    key: String,
}

/// Exclusive guard over the whole keyspace.
pub type StoreGuard = OwnedRwLockWriteGuard<()>;

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> KeyGuard {
        let gate = Arc::clone(&self.gate).read_owned().await;
        let entry = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.to_string()).or_default())
        };
        let guard = entry.lock_owned().await;
        KeyGuard {
            guard: Some(guard),
            _gate: gate,
            entries: Arc::clone(&self.entries),
            key: key.to_string(),
        }
    }

    pub async fn lock_all(&self) -> StoreGuard {
        Arc::clone(&self.gate).write_owned().await
    }

    /// Number of keys currently held or awaited.
    pub fn tracked_keys(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl KeyGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Release the key first so the map holds the only other reference
        // when nobody else is waiting.
        self.guard.take();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries
            .get(&self.key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            entries.remove(&self.key);
        }
    }
}
