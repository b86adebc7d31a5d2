//! Fungible fee-token interface.

use stay_types::AccountAddress;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised by the fee token itself.
///
/// These are the fee token's own conditions; the night ledger carries them
/// through transparently rather than wrapping them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeTokenError {
    #[error("insufficient balance: {account} has {available}, needs {needed}")]
    InsufficientBalance {
        account: AccountAddress,
        available: u128,
        needed: u128,
    },

    #[error("insufficient allowance: {spender} may spend {available} of {owner}'s funds, needs {needed}")]
    InsufficientAllowance {
        owner: AccountAddress,
        spender: AccountAddress,
        available: u128,
        needed: u128,
    },
}

/// A fungible accounting token the ledger meters fees in.
pub trait FeeToken: Send {
    fn balance_of(&self, account: &AccountAddress) -> u128;
    fn allowance(&self, owner: &AccountAddress, spender: &AccountAddress) -> u128;

    /// Grant `spender` the right to move up to `amount` of `owner`'s funds.
    fn approve(&mut self, owner: &AccountAddress, spender: &AccountAddress, amount: u128);

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &AccountAddress,
        to: &AccountAddress,
        amount: u128,
    ) -> Result<(), FeeTokenError>;

    /// Move `amount` from `owner` to `to` on behalf of `spender`, consuming
    /// allowance. The allowance check runs before the balance check.
    fn transfer_from(
        &mut self,
        spender: &AccountAddress,
        owner: &AccountAddress,
        to: &AccountAddress,
        amount: u128,
    ) -> Result<(), FeeTokenError>;
}

/// Shared handle to a fee token instance.
pub type SharedFeeToken = Arc<Mutex<dyn FeeToken>>;

/// In-memory fee token for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryFeeToken {
    balances: HashMap<AccountAddress, u128>,
    allowances: HashMap<(AccountAddress, AccountAddress), u128>,
}

impl MemoryFeeToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air.
    pub fn mint(&mut self, to: &AccountAddress, amount: u128) {
        *self.balances.entry(to.clone()).or_insert(0) += amount;
    }
}

impl FeeToken for MemoryFeeToken {
    fn balance_of(&self, account: &AccountAddress) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &AccountAddress, spender: &AccountAddress) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, owner: &AccountAddress, spender: &AccountAddress, amount: u128) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    fn transfer(
        &mut self,
        from: &AccountAddress,
        to: &AccountAddress,
        amount: u128,
    ) -> Result<(), FeeTokenError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(FeeTokenError::InsufficientBalance {
                account: from.clone(),
                available,
                needed: amount,
            });
        }
        *self.balances.entry(from.clone()).or_insert(0) -= amount;
        *self.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &AccountAddress,
        owner: &AccountAddress,
        to: &AccountAddress,
        amount: u128,
    ) -> Result<(), FeeTokenError> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(FeeTokenError::InsufficientAllowance {
                owner: owner.clone(),
                spender: spender.clone(),
                available: allowed,
                needed: amount,
            });
        }
        self.transfer(owner, to, amount)?;
        self.allowances
            .insert((owner.clone(), spender.clone()), allowed - amount);
        Ok(())
    }
}
