//! The night ledger engine.
//!
//! One `NightLedger` is one property's ledger: every night id is implicitly
//! owned by the host until an explicit record says otherwise. The engine
//! executes the full transfer pipeline — validate, authorize, meter the fee,
//! mutate, emit, notify — with all ledger state committed before the external
//! receiver callback runs, and a checkpoint restored (fee included) if that
//! callback rejects the transfer.

use crate::approval::ApprovalStore;
use crate::booking::{Booking, BookingStore};
use crate::error::LedgerError;
use crate::events::Event;
use crate::fees;
use crate::ownership::OwnershipStore;
use crate::permit::{PermitDomain, PermitSignature};
use crate::receiver::{ContractBinding, NightReceiver, SignatureValidator, RECEIVER_MAGIC, VALIDATOR_MAGIC};
use stay_crypto::verify_signature;
use stay_registry::Registry;
use stay_types::{AccountAddress, Timestamp, TokenId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Construction-time capabilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedgerOptions {
    /// Track booking records for host-outbound transfers.
    pub track_bookings: bool,
}

/// All call-mutable state, checkpointable as one unit so an aborting call
/// can be undone wholesale.
#[derive(Clone)]
struct LedgerState {
    paused: bool,
    name: String,
    base_uri: String,
    ownership: OwnershipStore,
    approvals: ApprovalStore,
    nonces: HashMap<AccountAddress, u64>,
    bookings: BookingStore,
    events: Vec<Event>,
}

pub struct NightLedger {
    host: AccountAddress,
    /// The ledger instance's own account: holds fee-token funds and anchors
    /// the permit signing domain.
    account: AccountAddress,
    symbol: String,
    registry: Arc<dyn Registry>,
    domain: PermitDomain,
    options: LedgerOptions,
    /// Executable logic bound to account addresses. Accounts present here
    /// are programmatic; everyone else is a plain key-holder.
    contracts: HashMap<AccountAddress, ContractBinding>,
    state: LedgerState,
}

impl NightLedger {
    /// Create a ledger for `host`, paused.
    ///
    /// The registry operator (if any) starts with blanket approval over the
    /// host's tokens, mirroring its privileged role.
    pub fn new(
        host: AccountAddress,
        account: AccountAddress,
        registry: Arc<dyn Registry>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        base_uri: impl Into<String>,
        options: LedgerOptions,
    ) -> Result<Self, LedgerError> {
        if host.is_zero() || account.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let mut approvals = ApprovalStore::default();
        let operator = registry.operator();
        if !operator.is_zero() {
            approvals.set_operator(&host, &operator, true);
        }
        let domain = PermitDomain::new(account.clone());
        Ok(Self {
            host: host.clone(),
            account,
            symbol: symbol.into(),
            registry,
            domain,
            options,
            contracts: HashMap::new(),
            state: LedgerState {
                paused: true,
                name: name.into(),
                base_uri: base_uri.into(),
                ownership: OwnershipStore::new(host),
                approvals,
                nonces: HashMap::new(),
                bookings: BookingStore::default(),
                events: Vec::new(),
            },
        })
    }

    /// Bind a safe-transfer receiver to `account`, marking it programmatic.
    pub fn bind_receiver(&mut self, account: &AccountAddress, receiver: Arc<dyn NightReceiver>) {
        self.contracts.entry(account.clone()).or_default().receiver = Some(receiver);
    }

    /// Bind a signature validator to `account`, marking it programmatic.
    pub fn bind_validator(&mut self, account: &AccountAddress, validator: Arc<dyn SignatureValidator>) {
        self.contracts.entry(account.clone()).or_default().validator = Some(validator);
    }

    // ---- reads ----

    pub fn host(&self) -> &AccountAddress {
        &self.host
    }

    pub fn account(&self) -> &AccountAddress {
        &self.account
    }

    pub fn paused(&self) -> bool {
        self.state.paused
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn base_uri(&self) -> &str {
        &self.state.base_uri
    }

    /// Metadata URI for a token: base URI + decimal id, empty when no base
    /// URI is set.
    pub fn token_uri(&self, token_id: TokenId) -> String {
        if self.state.base_uri.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.state.base_uri, token_id)
        }
    }

    pub fn owner_of(&self, token_id: TokenId) -> AccountAddress {
        self.state.ownership.owner_of(token_id)
    }

    pub fn balance_of(&self, account: &AccountAddress) -> Result<u64, LedgerError> {
        self.state.ownership.balance_of(account)
    }

    pub fn get_approved(&self, token_id: TokenId) -> Option<AccountAddress> {
        self.state.approvals.approved_for(token_id).cloned()
    }

    pub fn is_approved_for_all(&self, owner: &AccountAddress, operator: &AccountAddress) -> bool {
        self.state.approvals.is_operator(owner, operator)
    }

    pub fn sig_nonces(&self, account: &AccountAddress) -> u64 {
        self.state.nonces.get(account).copied().unwrap_or(0)
    }

    pub fn booking(&self, booking_id: u64) -> Option<&Booking> {
        self.state.bookings.booking(booking_id)
    }

    pub fn booking_id_of(&self, token_id: TokenId) -> Option<u64> {
        self.state.bookings.booking_id_of(token_id)
    }

    pub fn permit_domain(&self) -> &PermitDomain {
        &self.domain
    }

    /// Events emitted so far, in order.
    pub fn events(&self) -> &[Event] {
        &self.state.events
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.state.events)
    }

    // ---- approvals ----

    pub fn approve(
        &mut self,
        caller: &AccountAddress,
        spender: &AccountAddress,
        token_id: TokenId,
    ) -> Result<(), LedgerError> {
        let owner = self.owner_of(token_id);
        if *spender == owner {
            return Err(LedgerError::ApprovalExisted { token_id });
        }
        if *caller != owner && !self.state.approvals.is_operator(&owner, caller) {
            return Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                token_id,
            });
        }
        self.state.approvals.set(token_id, spender.clone());
        self.state.events.push(Event::Approval {
            owner,
            spender: spender.clone(),
            token_id,
        });
        Ok(())
    }

    pub fn set_approval_for_all(
        &mut self,
        caller: &AccountAddress,
        operator: &AccountAddress,
        approved: bool,
    ) -> Result<(), LedgerError> {
        if operator == caller {
            return Err(LedgerError::WrongOperator);
        }
        self.state.approvals.set_operator(caller, operator, approved);
        self.state.events.push(Event::ApprovalForAll {
            owner: caller.clone(),
            operator: operator.clone(),
            approved,
        });
        Ok(())
    }

    // ---- permits ----

    /// Consume a signed `Permit`, granting `spender` the per-token approval.
    ///
    /// Anyone may submit the permit; authorization comes from the signature
    /// of the token's current owner over the declared fields and the owner's
    /// current nonce.
    pub fn permit(
        &mut self,
        spender: &AccountAddress,
        token_id: TokenId,
        deadline: Timestamp,
        sig: &PermitSignature,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let owner = self.owner_of(token_id);
        if *spender == owner {
            return Err(LedgerError::ApprovalToCurrentOwner { token_id });
        }
        if deadline.is_past(now) {
            return Err(LedgerError::PermitExpired { deadline });
        }
        let nonce = self.sig_nonces(&owner);
        let digest = self.domain.permit_digest(spender, token_id, nonce, deadline);
        self.verify_permit_signer(&owner, &digest, sig)?;

        *self.state.nonces.entry(owner.clone()).or_insert(0) += 1;
        self.state.approvals.set(token_id, spender.clone());
        self.state.events.push(Event::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            token_id,
        });
        debug!(%owner, %spender, %token_id, "permit consumed");
        Ok(())
    }

    /// Consume a signed `PermitForAll`, changing `operator`'s blanket
    /// approval for `owner`'s tokens.
    pub fn permit_for_all(
        &mut self,
        owner: &AccountAddress,
        operator: &AccountAddress,
        approved: bool,
        deadline: Timestamp,
        sig: &PermitSignature,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        if operator.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if deadline.is_past(now) {
            return Err(LedgerError::PermitExpired { deadline });
        }
        let nonce = self.sig_nonces(owner);
        let digest = self
            .domain
            .permit_for_all_digest(owner, operator, approved, nonce, deadline);
        self.verify_permit_signer(owner, &digest, sig)?;

        *self.state.nonces.entry(owner.clone()).or_insert(0) += 1;
        self.state.approvals.set_operator(owner, operator, approved);
        self.state.events.push(Event::ApprovalForAll {
            owner: owner.clone(),
            operator: operator.clone(),
            approved,
        });
        debug!(%owner, %operator, approved, "permit-for-all consumed");
        Ok(())
    }

    /// Consume a `Permit` naming the caller as spender, then safe-transfer
    /// the token to `to` — one atomic call: if the transfer half fails, the
    /// consumed nonce and approval are restored.
    pub fn transfer_with_permit(
        &mut self,
        caller: &AccountAddress,
        to: &AccountAddress,
        token_id: TokenId,
        deadline: Timestamp,
        sig: &PermitSignature,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let owner = self.owner_of(token_id);
        let checkpoint = self.state.clone();
        let result = self
            .permit(caller, token_id, deadline, sig, now)
            .and_then(|()| {
                self.execute_transfer(
                    caller.clone(),
                    owner,
                    to.clone(),
                    token_id,
                    token_id,
                    &[],
                    true,
                )
            });
        if result.is_err() {
            self.state = checkpoint;
        }
        result
    }

    fn verify_permit_signer(
        &self,
        target: &AccountAddress,
        digest: &[u8; 32],
        sig: &PermitSignature,
    ) -> Result<(), LedgerError> {
        match self.contracts.get(target) {
            // Programmatic signer: the account's own validator decides.
            Some(binding) => match &binding.validator {
                Some(validator)
                    if validator.is_valid_signature(digest, &sig.signature) == VALIDATOR_MAGIC =>
                {
                    Ok(())
                }
                _ => Err(LedgerError::InvalidPermitSignature),
            },
            // Plain account: the supplied key must derive to the target
            // address and the signature must verify against the digest.
            None => {
                if AccountAddress::from_public_key(&sig.signer) != *target
                    || !verify_signature(digest, &sig.signature, &sig.signer)
                {
                    return Err(LedgerError::InvalidPermitSignature);
                }
                Ok(())
            }
        }
    }

    // ---- transfers ----

    pub fn transfer_from(
        &mut self,
        caller: &AccountAddress,
        from: &AccountAddress,
        to: &AccountAddress,
        token_id: TokenId,
    ) -> Result<(), LedgerError> {
        self.execute_transfer(
            caller.clone(),
            from.clone(),
            to.clone(),
            token_id,
            token_id,
            &[],
            false,
        )
    }

    pub fn safe_transfer_from(
        &mut self,
        caller: &AccountAddress,
        from: &AccountAddress,
        to: &AccountAddress,
        token_id: TokenId,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.execute_transfer(
            caller.clone(),
            from.clone(),
            to.clone(),
            token_id,
            token_id,
            data,
            true,
        )
    }

    /// Transfer every token in the inclusive range `[from_id, to_id]` as one
    /// unit: one fee charge, one booking record, one acknowledgement per id.
    pub fn safe_bulk_transfer_from(
        &mut self,
        caller: &AccountAddress,
        from: &AccountAddress,
        to: &AccountAddress,
        from_id: TokenId,
        to_id: TokenId,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.execute_transfer(
            caller.clone(),
            from.clone(),
            to.clone(),
            from_id,
            to_id,
            data,
            true,
        )
    }

    fn execute_transfer(
        &mut self,
        caller: AccountAddress,
        from: AccountAddress,
        to: AccountAddress,
        from_id: TokenId,
        to_id: TokenId,
        data: &[u8],
        notify: bool,
    ) -> Result<(), LedgerError> {
        // Validate.
        if from_id > to_id {
            return Err(LedgerError::InvalidTokenId { from_id, to_id });
        }
        let operator_account = self.registry.operator();
        let privileged = caller == self.host || caller == operator_account;
        if self.state.paused && !privileged {
            return Err(LedgerError::TransferWhilePaused);
        }
        for raw in from_id.value()..=to_id.value() {
            let id = TokenId::new(raw);
            if self.owner_of(id) != from {
                return Err(LedgerError::WrongFrom {
                    from: from.clone(),
                    token_id: id,
                });
            }
        }

        // Authorize: owner, operator and privileged callers cover the whole
        // range; otherwise the caller needs the per-token approval on every id.
        if !privileged && caller != from && !self.state.approvals.is_operator(&from, &caller) {
            for raw in from_id.value()..=to_id.value() {
                let id = TokenId::new(raw);
                if self.state.approvals.approved_for(id) != Some(&caller) {
                    return Err(LedgerError::Unauthorized {
                        caller: caller.clone(),
                        token_id: id,
                    });
                }
            }
        }

        let release = if self.options.track_bookings && to.is_zero() {
            Some(self.state.bookings.validate_release(from_id, to_id)?)
        } else {
            None
        };

        // Meter the fee. Runs before any ownership mutation, so a fee-token
        // failure aborts the call with nothing to undo.
        let count = to_id.value() - from_id.value() + 1;
        let charge = fees::charge_transfer_fee(
            self.registry.as_ref(),
            &self.account,
            privileged,
            &from,
            count,
        )?;

        let checkpoint = if notify { Some(self.state.clone()) } else { None };

        // Mutate, then emit. Clearing a live approval announces the clear;
        // an already-empty slot stays silent.
        for raw in from_id.value()..=to_id.value() {
            let id = TokenId::new(raw);
            if self.state.approvals.clear(id) {
                self.state.events.push(Event::Approval {
                    owner: from.clone(),
                    spender: AccountAddress::zero(),
                    token_id: id,
                });
            }
            self.state.ownership.reassign(id, &to);
            self.state.events.push(Event::Transfer {
                from: from.clone(),
                to: to.clone(),
                token_id: id,
            });
        }
        if let Some(booking_id) = release {
            self.state.bookings.delete(booking_id);
        } else if self.options.track_bookings
            && from == self.host
            && !to.is_zero()
            && to != self.host
        {
            self.state.bookings.record(from_id, to_id, data);
        }
        debug!(%from, %to, %from_id, %to_id, count, "transfer executed");

        // Notify last: all state is committed, so a re-entrant receiver sees
        // the finished transfer. A rejection restores the checkpoint and
        // reverses the fee.
        if notify {
            if let Err(err) = self.notify_receiver(&caller, &from, &to, from_id, to_id, data) {
                self.state = checkpoint.expect("checkpoint taken for every notifying call");
                if let Some(charge) = &charge {
                    fees::refund_transfer_fee(self.registry.as_ref(), &self.account, charge);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn notify_receiver(
        &mut self,
        caller: &AccountAddress,
        from: &AccountAddress,
        to: &AccountAddress,
        from_id: TokenId,
        to_id: TokenId,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        let Some(binding) = self.contracts.get(to).cloned() else {
            // Plain account: nothing to acknowledge.
            return Ok(());
        };
        let Some(receiver) = binding.receiver else {
            return Err(LedgerError::UnsafeRecipient);
        };
        for raw in from_id.value()..=to_id.value() {
            let ack = receiver.on_night_received(self, caller, from, TokenId::new(raw), data)?;
            if ack != RECEIVER_MAGIC {
                return Err(LedgerError::UnsafeRecipient);
            }
        }
        Ok(())
    }

    // ---- administration ----

    fn require_host(&self, caller: &AccountAddress) -> Result<(), LedgerError> {
        if *caller != self.host {
            return Err(LedgerError::OnlyHost);
        }
        Ok(())
    }

    pub fn pause(&mut self, caller: &AccountAddress) -> Result<(), LedgerError> {
        self.require_host(caller)?;
        self.state.paused = true;
        self.state.events.push(Event::Paused {
            account: caller.clone(),
        });
        info!(%caller, "transfers paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountAddress) -> Result<(), LedgerError> {
        self.require_host(caller)?;
        self.state.paused = false;
        self.state.events.push(Event::Unpaused {
            account: caller.clone(),
        });
        info!(%caller, "transfers unpaused");
        Ok(())
    }

    pub fn set_name(&mut self, caller: &AccountAddress, name: impl Into<String>) -> Result<(), LedgerError> {
        self.require_host(caller)?;
        self.state.name = name.into();
        Ok(())
    }

    pub fn set_base_uri(&mut self, caller: &AccountAddress, base_uri: impl Into<String>) -> Result<(), LedgerError> {
        self.require_host(caller)?;
        self.state.base_uri = base_uri.into();
        Ok(())
    }

    /// Escape hatch: pull the ledger account's own fee-token holdings.
    pub fn withdraw_fee_token(
        &mut self,
        caller: &AccountAddress,
        to: &AccountAddress,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.require_host(caller)?;
        let token = self.registry.fee_token();
        token
            .lock()
            .expect("fee token lock poisoned")
            .transfer(&self.account, to, amount)?;
        self.state.events.push(Event::FeeTokenWithdrawal {
            to: to.clone(),
            amount,
        });
        Ok(())
    }
}
