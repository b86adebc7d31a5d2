//! Cryptographic primitives for the STAY ledger.
//!
//! Ed25519 for permit signatures, Blake2b-256 for digests and address
//! derivation.

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
