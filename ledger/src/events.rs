//! Ledger notification events.
//!
//! Events accumulate in the ledger's log in emission order and are drained by
//! the integrator. A fully aborted call leaves no events behind.

use serde::{Deserialize, Serialize};
use stay_types::{AccountAddress, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Ownership of `token_id` moved from `from` to `to`.
    Transfer {
        from: AccountAddress,
        to: AccountAddress,
        token_id: TokenId,
    },
    /// Per-token approval set (or cleared, when `spender` is the zero address).
    Approval {
        owner: AccountAddress,
        spender: AccountAddress,
        token_id: TokenId,
    },
    /// Operator approval changed to `approved`.
    ApprovalForAll {
        owner: AccountAddress,
        operator: AccountAddress,
        approved: bool,
    },
    Paused { account: AccountAddress },
    Unpaused { account: AccountAddress },
    /// The host withdrew fee-token holdings from the ledger account.
    FeeTokenWithdrawal { to: AccountAddress, amount: u128 },
}
