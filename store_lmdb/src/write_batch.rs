//! Transaction handles: every governance request runs inside exactly one
//! LMDB write transaction.
//!
//! LMDB admits a single writer per environment, so write transactions are
//! serialized by the backend itself. If a [`WriteBatch`] is dropped without
//! [`WriteBatch::commit`], everything written through it is rolled back.

use heed::{RoTxn, RwTxn};

use quorum_store::{Entry, ReadTxn, StoreError, Table, WriteTxn};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

/// A read-only snapshot.
pub struct Snapshot<'a> {
    txn: RoTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env.read_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }
}

impl ReadTxn for Snapshot<'_> {
    fn get(&self, table: Table, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        get(self.env, &self.txn, table, key)
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> Result<Vec<Entry>, StoreError> {
        scan_prefix(self.env, &self.txn, table, prefix)
    }
}

/// A write transaction that groups all record changes of one request.
pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    /// Begin a new write batch. Blocks while another writer is active.
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env.write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }

    /// Commit all writes atomically.
    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl ReadTxn for WriteBatch<'_> {
    fn get(&self, table: Table, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        get(self.env, &self.txn, table, key)
    }

    fn scan_prefix(&self, table: Table, prefix: &[u8]) -> Result<Vec<Entry>, StoreError> {
        scan_prefix(self.env, &self.txn, table, prefix)
    }
}

impl WriteTxn for WriteBatch<'_> {
    fn put(&mut self, table: Table, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        tracing::trace!(%table, key_len = key.len(), value_len = value.len(), "lmdb put");
        self.env
            .db(table)
            .put(&mut self.txn, key, value)
            .map_err(LmdbError::from)?;
        Ok(())
    }
}

fn get(
    env: &LmdbEnvironment,
    txn: &RoTxn<'_>,
    table: Table,
    key: &[u8],
) -> Result<Option<Vec<u8>>, StoreError> {
    let value = env.db(table).get(txn, key).map_err(LmdbError::from)?;
    Ok(value.map(<[u8]>::to_vec))
}

fn scan_prefix(
    env: &LmdbEnvironment,
    txn: &RoTxn<'_>,
    table: Table,
    prefix: &[u8],
) -> Result<Vec<Entry>, StoreError> {
    let iter = env
        .db(table)
        .prefix_iter(txn, prefix)
        .map_err(LmdbError::from)?;
    let mut entries = Vec::new();
    for item in iter {
        let (key, value) = item.map_err(LmdbError::from)?;
        entries.push((key.to_vec(), value.to_vec()));
    }
    Ok(entries)
}
