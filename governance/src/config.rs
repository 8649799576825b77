//! Program-wide governance policy with TOML file support.
//!
//! These limits are fixed for a deployment and shared by every realm;
//! per-realm policy lives in [`crate::realm::RealmConfig`].

use serde::{Deserialize, Serialize};

use quorum_utils::LogFormat;

use crate::GovernanceError;

/// Policy floors/ceilings and text bounds enforced by the engine.
///
/// Can be loaded from a TOML file via [`GovernanceConfig::from_toml_file`]
/// or built programmatically (e.g. for tests). Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Shortest voting window a realm may configure.
    #[serde(default = "default_min_voting_time_secs")]
    pub min_voting_time_secs: u32,

    /// Longest voting window a realm may configure.
    #[serde(default = "default_max_voting_time_secs")]
    pub max_voting_time_secs: u32,

    /// Lowest accepted threshold percentage.
    #[serde(default = "default_min_threshold")]
    pub min_yes_vote_threshold: u8,

    /// Highest accepted threshold percentage.
    #[serde(default = "default_max_threshold")]
    pub max_yes_vote_threshold: u8,

    #[serde(default = "default_max_realm_name_len")]
    pub max_realm_name_len: usize,

    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,

    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,

    /// Maximum deferred instructions attached to one proposal.
    #[serde(default = "default_max_instructions")]
    pub max_instructions: usize,

    /// Maximum account references carried by one instruction.
    #[serde(default = "default_max_instruction_accounts")]
    pub max_instruction_accounts: usize,

    /// Maximum opaque data bytes carried by one instruction.
    #[serde(default = "default_max_instruction_data_len")]
    pub max_instruction_data_len: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_min_voting_time_secs() -> u32 {
    3_600
}

fn default_max_voting_time_secs() -> u32 {
    604_800
}

fn default_min_threshold() -> u8 {
    1
}

fn default_max_threshold() -> u8 {
    100
}

fn default_max_realm_name_len() -> usize {
    50
}

fn default_max_title_len() -> usize {
    100
}

fn default_max_description_len() -> usize {
    500
}

fn default_max_instructions() -> usize {
    10
}

fn default_max_instruction_accounts() -> usize {
    20
}

fn default_max_instruction_data_len() -> usize {
    1_000
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GovernanceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let config: Self = toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by `log_format` and
    /// `log_level`.
    pub fn init_logging(&self) -> Result<(), GovernanceError> {
        quorum_utils::try_init_logging(self.log_format, &self.log_level)
            .map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Reject limits that contradict each other.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.min_voting_time_secs > self.max_voting_time_secs {
            return Err(GovernanceError::Config(format!(
                "min_voting_time_secs {} exceeds max_voting_time_secs {}",
                self.min_voting_time_secs, self.max_voting_time_secs
            )));
        }
        if self.min_yes_vote_threshold == 0
            || self.min_yes_vote_threshold > self.max_yes_vote_threshold
            || self.max_yes_vote_threshold > 100
        {
            return Err(GovernanceError::Config(format!(
                "threshold bounds {}..={} must lie within 1..=100",
                self.min_yes_vote_threshold, self.max_yes_vote_threshold
            )));
        }
        if self.max_realm_name_len == 0
            || self.max_realm_name_len > quorum_types::RealmName::MAX_LEN
        {
            return Err(GovernanceError::Config(format!(
                "max_realm_name_len must be 1..={}",
                quorum_types::RealmName::MAX_LEN
            )));
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            min_voting_time_secs: default_min_voting_time_secs(),
            max_voting_time_secs: default_max_voting_time_secs(),
            min_yes_vote_threshold: default_min_threshold(),
            max_yes_vote_threshold: default_max_threshold(),
            max_realm_name_len: default_max_realm_name_len(),
            max_title_len: default_max_title_len(),
            max_description_len: default_max_description_len(),
            max_instructions: default_max_instructions(),
            max_instruction_accounts: default_max_instruction_accounts(),
            max_instruction_data_len: default_max_instruction_data_len(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
