//! LMDB environment setup.

use std::path::{Path, PathBuf};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use serde::{Deserialize, Serialize};

use quorum_store::Table;

use crate::LmdbError;

/// On-disk location and sizing of the LMDB environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LmdbConfig {
    /// Directory holding `data.mdb`; created if missing.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Maximum size of the memory map in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Maximum number of concurrent read transactions.
    #[serde(default = "default_max_readers")]
    pub max_readers: u32,
}

fn default_path() -> PathBuf {
    PathBuf::from("./quorum_data")
}

fn default_map_size() -> usize {
    256 * 1024 * 1024
}

fn default_max_readers() -> u32 {
    126
}

impl Default for LmdbConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            map_size: default_map_size(),
            max_readers: default_max_readers(),
        }
    }
}

/// Wraps the LMDB environment and one database handle per [`Table`].
pub struct LmdbEnvironment {
    pub(crate) env: Env,
    pub(crate) realms_db: Database<Bytes, Bytes>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) vote_records_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        Self::open_with(&LmdbConfig {
            path: path.to_path_buf(),
            map_size,
            ..LmdbConfig::default()
        })
    }

    /// Open or create an LMDB environment described by `config`.
    pub fn open_with(config: &LmdbConfig) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(&config.path)?;

        let mut options = EnvOpenOptions::new();
        options
            .map_size(config.map_size)
            .max_dbs(Table::ALL.len() as u32)
            .max_readers(config.max_readers);
        // SAFETY: each environment path is opened once per process; the
        // governance store owns the directory exclusively.
        let env = unsafe { options.open(&config.path)? };

        let mut wtxn = env.write_txn()?;
        let realms_db = env.create_database(&mut wtxn, Some(Table::Realms.name()))?;
        let proposals_db = env.create_database(&mut wtxn, Some(Table::Proposals.name()))?;
        let vote_records_db = env.create_database(&mut wtxn, Some(Table::VoteRecords.name()))?;
        wtxn.commit()?;

        tracing::debug!(
            path = %config.path.display(),
            map_size = config.map_size,
            "opened LMDB environment"
        );

        Ok(Self {
            env,
            realms_db,
            proposals_db,
            vote_records_db,
        })
    }

    pub(crate) fn db(&self, table: Table) -> Database<Bytes, Bytes> {
        match table {
            Table::Realms => self.realms_db,
            Table::Proposals => self.proposals_db,
            Table::VoteRecords => self.vote_records_db,
        }
    }
}
