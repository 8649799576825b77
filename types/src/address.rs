//! Identity types: holder/authority addresses and governance token classes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// An authenticated caller identity, always prefixed with `qrm_`.
///
/// Signature verification happens in the host before a request reaches the
/// governance core, so an `Address` is trusted to belong to the caller.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "qrm_";

    /// Create an address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `qrm_`. Use [`Address::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with qrm_");
        Self(s)
    }

    /// Parse an address, rejecting strings without the prefix or with an
    /// empty body.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let candidate = Self(s);
        if candidate.is_valid() {
            Ok(candidate)
        } else {
            Err(TypesError::InvalidAddress(candidate.0))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the token whose balance counts as governance weight in a realm
/// (the mint, in ledger terms).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenClass(String);

impl TokenClass {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
