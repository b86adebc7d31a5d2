//! Account address type with `stay_` prefix.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// A STAY account address, always prefixed with `stay_`.
///
/// Derived from the account's Ed25519 public key via Blake2b-256 hashing +
/// hex encoding. The all-zero digest is reserved as the zero address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// The standard prefix for all STAY account addresses.
    pub const PREFIX: &'static str = "stay_";

    /// Create a new account address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `stay_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with stay_");
        Self(s)
    }

    /// Derive an account address from an Ed25519 public key.
    pub fn from_public_key(public_key: &crate::keys::PublicKey) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(public_key.as_bytes());
        let digest = hasher.finalize();
        Self(format!("{}{}", Self::PREFIX, hex::encode(&digest)))
    }

    /// The distinguished zero address (all-zero digest).
    ///
    /// Transferring a token here returns it to the host's implicit ownership.
    pub fn zero() -> Self {
        Self(format!("{}{}", Self::PREFIX, "0".repeat(64)))
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0.len() == Self::PREFIX.len() + 64
            && self.0[Self::PREFIX.len()..].bytes().all(|b| b == b'0')
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// Inline hex encoding to avoid adding the `hex` crate as a dependency of types.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
