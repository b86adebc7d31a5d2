//! Fundamental types for the STAY night-token ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, token identifiers, key and signature types,
//! and timestamps.

pub mod address;
pub mod keys;
pub mod time;
pub mod token;

pub use address::AccountAddress;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use time::Timestamp;
pub use token::TokenId;
