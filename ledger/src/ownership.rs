//! Ownership store with implicit host fallback.
//!
//! Most token ids have no record at all: absence means "owned by the host",
//! a defined state, not an error. Balance counters are maintained
//! incrementally on every record change; `recompute_balance` exists so tests
//! can verify the incremental counters against reality.

use crate::error::LedgerError;
use stay_types::{AccountAddress, TokenId};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct OwnershipStore {
    host: AccountAddress,
    /// Explicit ownership records. Absence of a key means the host owns the id.
    explicit: HashMap<TokenId, AccountAddress>,
    /// Count of explicit records per account, maintained incrementally.
    balances: HashMap<AccountAddress, u64>,
}

impl OwnershipStore {
    pub fn new(host: AccountAddress) -> Self {
        Self {
            host,
            explicit: HashMap::new(),
            balances: HashMap::new(),
        }
    }

    /// The controlling account for `id`. Never fails; the id space is
    /// conceptually infinite and defaults to the host.
    pub fn owner_of(&self, id: TokenId) -> AccountAddress {
        self.explicit.get(&id).cloned().unwrap_or_else(|| self.host.clone())
    }

    /// Number of explicit ownership records held by `account`.
    pub fn balance_of(&self, account: &AccountAddress) -> Result<u64, LedgerError> {
        if account.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        Ok(self.balances.get(account).copied().unwrap_or(0))
    }

    /// Reassign `id` to `to`, updating the balance counters.
    ///
    /// Reassigning to the zero address clears the record, returning the token
    /// to the host's implicit ownership with no counter increment. Flows that
    /// move a token out of implicit host-default state leave the host counter
    /// untouched; the host reassigning an implicit token to itself claims an
    /// explicit record and does increment its counter.
    pub fn reassign(&mut self, id: TokenId, to: &AccountAddress) {
        if let Some(prev) = self.explicit.remove(&id) {
            if let Some(count) = self.balances.get_mut(&prev) {
                *count = count.saturating_sub(1);
            }
        }
        if !to.is_zero() {
            self.explicit.insert(id, to.clone());
            *self.balances.entry(to.clone()).or_insert(0) += 1;
        }
    }

    /// Recount `account`'s explicit records from scratch.
    /// Useful for consistency checks against the incremental counters.
    pub fn recompute_balance(&self, account: &AccountAddress) -> u64 {
        self.explicit.values().filter(|a| *a == account).count() as u64
    }
}
