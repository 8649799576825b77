//! Abstract storage traits for the Quorum governance core.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The governance engine depends only on the traits.
//!
//! All mutation goes through [`GovernanceStore::write`], which runs a closure
//! against a [`WriteTxn`]. Backends guarantee that write transactions are
//! serialized and that nothing the closure wrote becomes visible unless it
//! returns `Ok`. Guards evaluated inside the closure therefore see exactly
//! the state they mutate.

pub mod error;
pub mod table;

pub use error::StoreError;
pub use table::Table;

/// A key/value pair returned by a prefix scan.
pub type Entry = (Vec<u8>, Vec<u8>);

/// Read access to a consistent snapshot of the store.
pub trait ReadTxn {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, table: Table, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> Result<Vec<Entry>, StoreError>;

    fn contains(&self, table: Table, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(table, key)?.is_some())
    }
}

/// Writable transaction handle (extends [`ReadTxn`]).
pub trait WriteTxn: ReadTxn {
    /// Insert or overwrite `key`.
    fn put(&mut self, table: Table, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Allocate `key` only if it is absent; otherwise fail with
    /// [`StoreError::Duplicate`]. First writer wins.
    fn insert_new(&mut self, table: Table, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        if self.contains(table, key)? {
            return Err(StoreError::Duplicate {
                table: table.name(),
                key: String::from_utf8_lossy(key).into_owned(),
            });
        }
        self.put(table, key, value)
    }
}

/// A transactional key/value store holding governance records.
pub trait GovernanceStore: Send + Sync {
    /// Run `f` against a read snapshot.
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `f` inside an exclusive write transaction. The transaction
    /// commits if `f` returns `Ok` and is discarded otherwise.
    fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>;
}
