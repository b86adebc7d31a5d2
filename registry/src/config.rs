//! Read-only registry configuration handle.

use crate::fee_token::SharedFeeToken;
use stay_types::AccountAddress;
use std::sync::Mutex;

/// The registry collaborator as seen from a ledger instance.
///
/// All four reads are refreshed by the ledger on every fee-bearing call;
/// nothing here is cached ledger-side.
pub trait Registry: Send + Sync {
    /// The registry-wide privileged operator account (pause and approval
    /// bypass on every deployed ledger).
    fn operator(&self) -> AccountAddress;

    /// The account that receives all metered fees.
    fn treasury(&self) -> AccountAddress;

    /// Handle to the fungible token fees are denominated in.
    fn fee_token(&self) -> SharedFeeToken;

    /// Fee units charged per token moved.
    fn fee_per_transfer(&self) -> u128;
}

/// In-memory registry for tests and single-process deployments.
///
/// The fee rate sits behind a mutex so an administrator can retune it while
/// ledgers keep reading through the shared handle.
pub struct MemoryRegistry {
    operator: AccountAddress,
    treasury: AccountAddress,
    fee_token: SharedFeeToken,
    fee_per_transfer: Mutex<u128>,
}

impl MemoryRegistry {
    pub fn new(
        operator: AccountAddress,
        treasury: AccountAddress,
        fee_token: SharedFeeToken,
        fee_per_transfer: u128,
    ) -> Self {
        Self {
            operator,
            treasury,
            fee_token,
            fee_per_transfer: Mutex::new(fee_per_transfer),
        }
    }

    /// Retune the per-transfer fee rate; observed by ledgers on their next call.
    pub fn set_fee_per_transfer(&self, fee: u128) {
        *self
            .fee_per_transfer
            .lock()
            .expect("fee rate lock poisoned") = fee;
    }
}

impl Registry for MemoryRegistry {
    fn operator(&self) -> AccountAddress {
        self.operator.clone()
    }

    fn treasury(&self) -> AccountAddress {
        self.treasury.clone()
    }

    fn fee_token(&self) -> SharedFeeToken {
        self.fee_token.clone()
    }

    fn fee_per_transfer(&self) -> u128 {
        *self
            .fee_per_transfer
            .lock()
            .expect("fee rate lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee_token::MemoryFeeToken;
    use std::sync::Arc;

    fn addr(tag: u8) -> AccountAddress {
        AccountAddress::from_public_key(&stay_types::PublicKey([tag; 32]))
    }

    #[test]
    fn fee_rate_updates_are_visible() {
        let token: SharedFeeToken = Arc::new(std::sync::Mutex::new(MemoryFeeToken::new()));
        let registry = MemoryRegistry::new(addr(1), addr(2), token, 0);
        assert_eq!(registry.fee_per_transfer(), 0);
        registry.set_fee_per_transfer(200);
        assert_eq!(registry.fee_per_transfer(), 200);
    }
}
