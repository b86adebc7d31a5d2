//! Per-token and operator approval state.

use stay_types::{AccountAddress, TokenId};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default)]
pub struct ApprovalStore {
    /// Per-token approved account. Absence means no approval.
    approved: HashMap<TokenId, AccountAddress>,
    /// (owner, operator) pairs with blanket transfer rights.
    operators: HashSet<(AccountAddress, AccountAddress)>,
}

impl ApprovalStore {
    pub fn approved_for(&self, id: TokenId) -> Option<&AccountAddress> {
        self.approved.get(&id)
    }

    /// Set (or, for the zero address, clear) the per-token approval.
    pub fn set(&mut self, id: TokenId, spender: AccountAddress) {
        if spender.is_zero() {
            self.approved.remove(&id);
        } else {
            self.approved.insert(id, spender);
        }
    }

    /// Clear the per-token approval. Returns whether one was present.
    pub fn clear(&mut self, id: TokenId) -> bool {
        self.approved.remove(&id).is_some()
    }

    pub fn is_operator(&self, owner: &AccountAddress, operator: &AccountAddress) -> bool {
        self.operators.contains(&(owner.clone(), operator.clone()))
    }

    pub fn set_operator(&mut self, owner: &AccountAddress, operator: &AccountAddress, approved: bool) {
        let key = (owner.clone(), operator.clone());
        if approved {
            self.operators.insert(key);
        } else {
            self.operators.remove(&key);
        }
    }
}
