//! Hooks for programmatic (contract-like) accounts.
//!
//! A plain account is just an address. A programmatic account additionally
//! carries executable logic, represented here as a binding registered on the
//! ledger: a [`NightReceiver`] to acknowledge safe transfers, and/or a
//! [`SignatureValidator`] to validate permit signatures on the account's
//! behalf. Presence of a binding is what distinguishes the two kinds.

use crate::engine::NightLedger;
use crate::error::LedgerError;
use stay_types::{AccountAddress, Signature, TokenId};
use std::sync::Arc;

/// Acknowledgement value a receiver must return from `on_night_received`.
pub const RECEIVER_MAGIC: [u8; 4] = *b"NTRC";

/// Marker a signature validator must return from `is_valid_signature`.
pub const VALIDATOR_MAGIC: [u8; 4] = *b"NTSV";

/// Safe-transfer acknowledgement entry point.
///
/// Invoked once per transferred token, after all ledger state for the call
/// has been committed. The receiver gets a mutable handle back into the
/// ledger and may re-enter it; any error it returns propagates and aborts
/// the outer call.
pub trait NightReceiver {
    fn on_night_received(
        &self,
        ledger: &mut NightLedger,
        operator: &AccountAddress,
        from: &AccountAddress,
        token_id: TokenId,
        data: &[u8],
    ) -> Result<[u8; 4], LedgerError>;
}

/// Delegated signature validation for programmatic signer accounts.
pub trait SignatureValidator {
    /// Return [`VALIDATOR_MAGIC`] iff `signature` is acceptable for `digest`.
    fn is_valid_signature(&self, digest: &[u8; 32], signature: &Signature) -> [u8; 4];
}

/// Executable logic bound to an account address.
#[derive(Clone, Default)]
pub struct ContractBinding {
    pub receiver: Option<Arc<dyn NightReceiver>>,
    pub validator: Option<Arc<dyn SignatureValidator>>,
}
