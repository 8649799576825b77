//! Nullable store: thread-safe in-memory governance storage for testing.
//!
//! Write transactions take an exclusive lock and stage their writes in an
//! overlay that is merged into the map only when the closure succeeds, so
//! the in-memory store has the same atomicity as the LMDB backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use quorum_store::{Entry, GovernanceStore, ReadTxn, StoreError, Table, WriteTxn};

type Key = (Table, Vec<u8>);
type Map = BTreeMap<Key, Vec<u8>>;

const NO_FAULT: usize = usize::MAX;

/// An in-memory governance store for testing.
pub struct NullStore {
    data: RwLock<Map>,
    /// Puts remaining before an injected backend failure.
    puts_until_fault: AtomicUsize,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            puts_until_fault: AtomicUsize::new(NO_FAULT),
        }
    }

    /// Make the `n`-th subsequent put (0-based) fail with a backend error.
    /// The fault fires once.
    pub fn fail_put_after(&self, n: usize) {
        self.puts_until_fault.store(n, Ordering::SeqCst);
    }

    /// Number of records held in `table`.
    pub fn len(&self, table: Table) -> usize {
        self.data
            .read()
            .unwrap()
            .keys()
            .filter(|(t, _)| *t == table)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }

    fn take_fault(&self) -> bool {
        let prev = self
            .puts_until_fault
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                NO_FAULT => None,
                0 => Some(NO_FAULT),
                n => Some(n - 1),
            });
        prev == Ok(0)
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

fn scan<'a>(map: &'a Map, table: Table, prefix: &[u8]) -> impl Iterator<Item = Entry> + 'a {
    let prefix = prefix.to_vec();
    map.range((table, prefix.clone())..)
        .take_while(move |((t, k), _)| *t == table && k.starts_with(&prefix))
        .map(|((_, k), v)| (k.clone(), v.clone()))
}

struct Snapshot<'a> {
    data: &'a Map,
}

impl ReadTxn for Snapshot<'_> {
    fn get(&self, table: Table, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.get(&(table, key.to_vec())).cloned())
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> Result<Vec<Entry>, StoreError> {
        Ok(scan(self.data, table, prefix).collect())
    }
}

struct Overlay<'a> {
    store: &'a NullStore,
    base: &'a Map,
    pending: Map,
}

impl ReadTxn for Overlay<'_> {
    fn get(&self, table: Table, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let key = (table, key.to_vec());
        Ok(self
            .pending
            .get(&key)
            .or_else(|| self.base.get(&key))
            .cloned())
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> Result<Vec<Entry>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = scan(self.base, table, prefix).collect();
        merged.extend(scan(&self.pending, table, prefix));
        Ok(merged.into_iter().collect())
    }
}

impl WriteTxn for Overlay<'_> {
    fn put(&mut self, table: Table, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        if self.store.take_fault() {
            return Err(StoreError::Backend("injected put failure".to_string()));
        }
        self.pending.insert((table, key.to_vec()), value.to_vec());
        Ok(())
    }
}

impl GovernanceStore for NullStore {
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let guard = self
            .data
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        f(&Snapshot { data: &*guard })
    }

    fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let mut overlay = Overlay {
            store: self,
            base: &*guard,
            pending: BTreeMap::new(),
        };
        let out = f(&mut overlay)?;
        let pending = overlay.pending;
        guard.extend(pending);
        Ok(out)
    }
}
