use std::collections::HashMap;
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard};

use super::cache::{KeyType, Record, SetStatus};
use super::entry::Entry;
use super::error::{CacheError, Result};
use super::lru_list::LruList;

/// Key/value store with a byte budget and least-recently-used eviction.
///
/// One mutex guards the map, the recency list and both counters. A
/// reader/writer split would not help here: `get` promotes the entry it
/// touches, so every operation writes the list. Nothing suspends or performs
/// I/O while the lock is held.
pub struct LruStore {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    map: HashMap<KeyType, Box<Entry>>,
    lru: LruList,
    cur_bytes: u64,
    max_bytes: u64,
    version: u64,
}

// Entries are heap boxes reachable only through the mutex; the raw links
// they carry move between threads together with the rest of the state.
unsafe impl Send for StoreInner {}

impl LruStore {
    pub fn new(max_bytes: u64) -> LruStore {
        LruStore {
            inner: Mutex::new(StoreInner {
                map: HashMap::new(),
                lru: LruList::default(),
                cur_bytes: 0,
                max_bytes,
                version: 0,
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store mutex poisoned")
    }

    /// Returns the record stored under `key` and promotes it to most
    /// recently used. The returned value is a refcounted view taken under
    /// the lock; later mutations of the key do not affect it.
    pub fn get(&self, key: &KeyType) -> Result<Record> {
        let mut guard = self.locked();
        let inner = &mut *guard;
        let ptr = match inner.map.get_mut(key) {
            Some(entry) => NonNull::from(&mut **entry),
            None => return Err(CacheError::NotFound),
        };
        inner.lru.erase(ptr);
        inner.lru.push_front(ptr);
        let entry = unsafe { ptr.as_ref() };
        Ok(Record::new(entry.value.clone(), entry.flags, entry.version))
    }

    /// Stores `record.value`/`record.flags` under `key`.
    ///
    /// `record.cas` carries the caller's compare-and-swap token:
    ///
    /// - zero always stores,
    /// - non-zero stores only if the key exists and bears that exact
    ///   version (`KeyExists` on mismatch, `NotFound` for an absent key).
    ///
    /// A successful store replaces any previous entry wholesale, assigns a
    /// fresh version from the store-wide counter and evicts least recently
    /// used entries until the budget holds again.
    pub fn set(&self, key: KeyType, record: Record) -> Result<SetStatus> {
        let mut guard = self.locked();
        let inner = &mut *guard;
        let existing = match inner.map.get_mut(&key) {
            Some(entry) => {
                if record.cas != 0 && record.cas != entry.version {
                    return Err(CacheError::KeyExists);
                }
                Some(NonNull::from(&mut **entry))
            }
            None => {
                if record.cas != 0 {
                    return Err(CacheError::NotFound);
                }
                None
            }
        };
        if let Some(ptr) = existing {
            inner.lru.erase(ptr);
            if let Some(old) = inner.map.remove(&key) {
                inner.cur_bytes -= old.size();
            }
        }

        inner.version += 1;
        let version = inner.version;
        let new_entry = Box::new(Entry::new(key.clone(), record.value, record.flags, version));
        inner.cur_bytes += new_entry.size();
        // Link after the box lands in the map, so the pointer stays tied to
        // the entry's final owner.
        let entry = inner.map.entry(key).or_insert(new_entry);
        inner.lru.push_front(NonNull::from(&mut **entry));
        inner.evict_overflow();
        Ok(SetStatus { cas: version })
    }

    /// Removes `key`. A non-zero `cas` must match the resident version
    /// (`KeyExists` otherwise); an absent key is `NotFound`.
    pub fn delete(&self, key: &KeyType, cas: u64) -> Result<()> {
        let mut guard = self.locked();
        let inner = &mut *guard;
        let ptr = match inner.map.get_mut(key) {
            Some(entry) => {
                if cas != 0 && cas != entry.version {
                    return Err(CacheError::KeyExists);
                }
                NonNull::from(&mut **entry)
            }
            None => return Err(CacheError::NotFound),
        };
        inner.lru.erase(ptr);
        if let Some(entry) = inner.map.remove(key) {
            inner.cur_bytes -= entry.size();
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.locked().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().map.is_empty()
    }
}

impl StoreInner {
    /// Pops the recency tail while over budget. A lone resident entry stays
    /// put even when its size alone exceeds the budget.
    fn evict_overflow(&mut self) {
        while self.cur_bytes > self.max_bytes && self.map.len() > 1 {
            let tail = match self.lru.pop_back() {
                Some(tail) => tail,
                None => break,
            };
            let key = unsafe { tail.as_ref() }.key.clone();
            if let Some(entry) = self.map.remove(&key) {
                self.cur_bytes -= entry.size();
            }
        }
    }
}

#[cfg(test)]
impl LruStore {
    pub(crate) fn resident_bytes(&self) -> u64 {
        self.locked().cur_bytes
    }

    pub(crate) fn budget_bytes(&self) -> u64 {
        self.locked().max_bytes
    }

    pub(crate) fn recomputed_bytes(&self) -> u64 {
        self.locked().map.values().map(|entry| entry.size()).sum()
    }

    pub(crate) fn lru_keys(&self) -> Vec<KeyType> {
        self.locked().lru.keys_front_to_back()
    }

    pub(crate) fn lru_keys_rev(&self) -> Vec<KeyType> {
        self.locked().lru.keys_back_to_front()
    }
}
