//! External collaborator interfaces for STAY ledgers.
//!
//! A ledger instance never owns its fee configuration: the registry that
//! deployed it holds the privileged operator account, the treasury, the fee
//! token, and the per-transfer fee rate. The ledger reads all four through
//! the [`Registry`] trait at an explicit refresh point on every transfer, so
//! a rate change between calls is always observed.
//!
//! The fee token itself is a separate fungible ledger reached through the
//! [`FeeToken`] trait; its errors surface unwrapped so integrators can tell
//! ledger-level failures from fee-token-level failures.

pub mod config;
pub mod fee_token;

pub use config::{MemoryRegistry, Registry};
pub use fee_token::{FeeToken, FeeTokenError, MemoryFeeToken, SharedFeeToken};
