//! Per-transfer fee metering.
//!
//! Fee configuration is read from the registry at the moment of the charge,
//! never cached, so rate changes between calls are always observed. Who pays
//! depends on who initiated the transfer: privileged callers (host, registry
//! operator) spend the ledger account's own fee-token holdings; ordinary
//! holders pay from the token owner's wallet via a pre-granted allowance.

use crate::error::LedgerError;
use stay_registry::Registry;
use stay_types::AccountAddress;

/// A completed fee movement, retained so an aborting call can reverse it.
#[derive(Clone, Debug)]
pub struct FeeCharge {
    pub payer: AccountAddress,
    pub amount: u128,
    pub via_allowance: bool,
}

/// Meter the fee for moving `count` tokens. Returns `None` when the
/// configured rate is zero (no zero-value movement is attempted).
pub fn charge_transfer_fee(
    registry: &dyn Registry,
    ledger_account: &AccountAddress,
    privileged: bool,
    owner: &AccountAddress,
    count: u128,
) -> Result<Option<FeeCharge>, LedgerError> {
    let rate = registry.fee_per_transfer();
    if rate == 0 {
        return Ok(None);
    }
    let amount = rate.checked_mul(count).ok_or(LedgerError::FeeOverflow)?;
    let treasury = registry.treasury();
    let token = registry.fee_token();
    let mut token = token.lock().expect("fee token lock poisoned");
    if privileged {
        token.transfer(ledger_account, &treasury, amount)?;
        Ok(Some(FeeCharge {
            payer: ledger_account.clone(),
            amount,
            via_allowance: false,
        }))
    } else {
        token.transfer_from(ledger_account, owner, &treasury, amount)?;
        Ok(Some(FeeCharge {
            payer: owner.clone(),
            amount,
            via_allowance: true,
        }))
    }
}

/// Reverse a fee movement as part of a full-call abort: funds return from the
/// treasury to the payer, and a consumed allowance is re-granted.
pub fn refund_transfer_fee(
    registry: &dyn Registry,
    ledger_account: &AccountAddress,
    charge: &FeeCharge,
) {
    let treasury = registry.treasury();
    let token = registry.fee_token();
    let mut token = token.lock().expect("fee token lock poisoned");
    // The treasury received exactly this amount in the same call.
    let _ = token.transfer(&treasury, &charge.payer, charge.amount);
    if charge.via_allowance {
        let remaining = token.allowance(&charge.payer, ledger_account);
        token.approve(&charge.payer, ledger_account, remaining + charge.amount);
    }
}
