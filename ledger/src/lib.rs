//! Night-token ledger with permit-authorized transfers and fee metering.
//!
//! A [`NightLedger`] tracks which account controls each night of a property.
//! Ownership is sparse: ids with no record belong to the host. Holders can
//! authorize transfers directly, through approvals, or off-band with signed
//! permits; every transfer meters a fee in a separate fungible token read
//! from the registry collaborator.

pub mod approval;
pub mod booking;
pub mod engine;
pub mod error;
pub mod events;
pub mod fees;
pub mod ownership;
pub mod permit;
pub mod receiver;

pub use booking::Booking;
pub use engine::{LedgerOptions, NightLedger};
pub use error::LedgerError;
pub use events::Event;
pub use permit::{sign_permit, sign_permit_for_all, PermitDomain, PermitSignature};
pub use receiver::{
    ContractBinding, NightReceiver, SignatureValidator, RECEIVER_MAGIC, VALIDATOR_MAGIC,
};
