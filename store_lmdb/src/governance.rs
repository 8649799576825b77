//! LMDB implementation of GovernanceStore.

use quorum_store::{GovernanceStore, ReadTxn, StoreError, WriteTxn};

use crate::environment::LmdbEnvironment;
use crate::write_batch::{Snapshot, WriteBatch};

impl GovernanceStore for LmdbEnvironment {
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let snapshot = Snapshot::new(self)?;
        f(&snapshot)
    }

    fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut batch = WriteBatch::new(self)?;
        let out = f(&mut batch)?;
        batch.commit()?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_store::Table;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("open env");
        (dir, env)
    }

    #[test]
    fn committed_writes_are_visible() {
        let (_dir, env) = temp_env();
        env.write(|txn| txn.put(Table::Realms, b"dao", b"record"))
            .unwrap();
        let value = env
            .read(|txn| txn.get(Table::Realms, b"dao"))
            .unwrap();
        assert_eq!(value.as_deref(), Some(&b"record"[..]));
    }

    #[test]
    fn failed_closure_rolls_back() {
        let (_dir, env) = temp_env();
        let result: Result<(), StoreError> = env.write(|txn| {
            txn.put(Table::Proposals, b"p1", b"draft")?;
            Err(StoreError::Backend("abort".into()))
        });
        assert!(result.is_err());
        let value = env.read(|txn| txn.get(Table::Proposals, b"p1")).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn insert_new_is_first_writer_wins() {
        let (_dir, env) = temp_env();
        env.write(|txn| txn.insert_new(Table::VoteRecords, b"v", b"yes"))
            .unwrap();
        let second = env.write(|txn| txn.insert_new(Table::VoteRecords, b"v", b"no"));
        assert!(matches!(second, Err(StoreError::Duplicate { .. })));
        let value = env.read(|txn| txn.get(Table::VoteRecords, b"v")).unwrap();
        assert_eq!(value.as_deref(), Some(&b"yes"[..]));
    }

    #[test]
    fn tables_are_independent_keyspaces() {
        let (_dir, env) = temp_env();
        env.write(|txn| txn.put(Table::Realms, b"k", b"realm")).unwrap();
        let other = env.read(|txn| txn.get(Table::Proposals, b"k")).unwrap();
        assert_eq!(other, None);
    }

    #[test]
    fn scan_prefix_returns_sorted_matches_only() {
        let (_dir, env) = temp_env();
        env.write(|txn| {
            txn.put(Table::Proposals, b"a\x00\x02", b"2")?;
            txn.put(Table::Proposals, b"a\x00\x01", b"1")?;
            txn.put(Table::Proposals, b"b\x00\x01", b"other")
        })
        .unwrap();
        let entries = env
            .read(|txn| txn.scan_prefix(Table::Proposals, b"a"))
            .unwrap();
        let values: Vec<_> = entries.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![b"1".to_vec(), b"2".to_vec()]);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
            env.write(|txn| txn.put(Table::Realms, b"dao", b"persisted"))
                .unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let value = env.read(|txn| txn.get(Table::Realms, b"dao")).unwrap();
        assert_eq!(value.as_deref(), Some(&b"persisted"[..]));
    }

    #[test]
    fn config_defaults_from_toml() {
        let config: crate::LmdbConfig = toml::from_str("map_size = 1048576").unwrap();
        assert_eq!(config.map_size, 1_048_576);
        assert_eq!(config.max_readers, 126);
    }
}
