//! Night-token identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single night token.
///
/// The id space is unbounded as far as the ledger is concerned: every id is
/// conceptually owned by the host until an explicit ownership record says
/// otherwise, so there is no mint step and no existence flag.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct TokenId(pub u128);

impl TokenId {
    pub fn new(id: u128) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    /// The next id (saturating). Used when walking inclusive bulk ranges.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for TokenId {
    fn from(id: u128) -> Self {
        Self(id)
    }
}
