//! Structured-data permit digests and signing.
//!
//! Both permit kinds are domain-separated by a digest bound to this ledger
//! instance's identity and a version tag, with the signer's current nonce
//! and a deadline folded into the signed payload. Field values are hashed
//! as framed multi-part input (tag, then each field length-free in a fixed
//! order) so a digest commits to every declared field.

use stay_crypto::{blake2b_256_multi, sign_message};
use stay_types::{AccountAddress, KeyPair, PublicKey, Signature, Timestamp, TokenId};

/// Domain name bound into every permit digest.
pub const DOMAIN_NAME: &str = "StayNight";
/// Domain version tag.
pub const DOMAIN_VERSION: &str = "1";

const DOMAIN_TAG: &[u8] = b"STAY_DOMAIN(name,version,ledger)";
const PERMIT_TAG: &[u8] = b"STAY_PERMIT(spender,token_id,nonce,deadline)";
const PERMIT_FOR_ALL_TAG: &[u8] = b"STAY_PERMIT_FOR_ALL(owner,operator,approved,nonce,deadline)";
const DIGEST_PREFIX: &[u8] = b"\x19STAY";

/// A signature over a permit digest, together with the public key that
/// produced it. Ed25519 cannot recover a signer from a signature alone, so
/// the key travels with it; the ledger checks that the key derives to the
/// nominated owner's address before trusting it.
#[derive(Clone, Debug)]
pub struct PermitSignature {
    pub signer: PublicKey,
    pub signature: Signature,
}

/// The structured-data domain of one ledger instance.
#[derive(Clone, Debug)]
pub struct PermitDomain {
    ledger_account: AccountAddress,
}

impl PermitDomain {
    pub fn new(ledger_account: AccountAddress) -> Self {
        Self { ledger_account }
    }

    fn domain_hash(&self) -> [u8; 32] {
        blake2b_256_multi(&[
            DOMAIN_TAG,
            DOMAIN_NAME.as_bytes(),
            DOMAIN_VERSION.as_bytes(),
            self.ledger_account.as_str().as_bytes(),
        ])
    }

    /// Digest for `Permit(spender, token_id, nonce, deadline)`.
    pub fn permit_digest(
        &self,
        spender: &AccountAddress,
        token_id: TokenId,
        nonce: u64,
        deadline: Timestamp,
    ) -> [u8; 32] {
        let body = blake2b_256_multi(&[
            PERMIT_TAG,
            spender.as_str().as_bytes(),
            &token_id.value().to_le_bytes(),
            &nonce.to_le_bytes(),
            &deadline.as_secs().to_le_bytes(),
        ]);
        blake2b_256_multi(&[DIGEST_PREFIX, &self.domain_hash(), &body])
    }

    /// Digest for `PermitForAll(owner, operator, approved, nonce, deadline)`.
    pub fn permit_for_all_digest(
        &self,
        owner: &AccountAddress,
        operator: &AccountAddress,
        approved: bool,
        nonce: u64,
        deadline: Timestamp,
    ) -> [u8; 32] {
        let body = blake2b_256_multi(&[
            PERMIT_FOR_ALL_TAG,
            owner.as_str().as_bytes(),
            operator.as_str().as_bytes(),
            &[approved as u8],
            &nonce.to_le_bytes(),
            &deadline.as_secs().to_le_bytes(),
        ]);
        blake2b_256_multi(&[DIGEST_PREFIX, &self.domain_hash(), &body])
    }
}

/// Produce a `Permit` signature (wallet side).
pub fn sign_permit(
    domain: &PermitDomain,
    keypair: &KeyPair,
    spender: &AccountAddress,
    token_id: TokenId,
    nonce: u64,
    deadline: Timestamp,
) -> PermitSignature {
    let digest = domain.permit_digest(spender, token_id, nonce, deadline);
    PermitSignature {
        signer: keypair.public.clone(),
        signature: sign_message(&digest, &keypair.private),
    }
}

/// Produce a `PermitForAll` signature (wallet side).
pub fn sign_permit_for_all(
    domain: &PermitDomain,
    keypair: &KeyPair,
    owner: &AccountAddress,
    operator: &AccountAddress,
    approved: bool,
    nonce: u64,
    deadline: Timestamp,
) -> PermitSignature {
    let digest = domain.permit_for_all_digest(owner, operator, approved, nonce, deadline);
    PermitSignature {
        signer: keypair.public.clone(),
        signature: sign_message(&digest, &keypair.private),
    }
}
